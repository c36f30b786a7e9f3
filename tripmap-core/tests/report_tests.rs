// Tests for build reports

use tripmap_core::builder::{BuildStats, MapContent};
use tripmap_core::report::{
    gather_report_data, generate_build_report, generate_json_report, write_json_report,
};
use tripmap_core::{Coordinate, Line, Point};

fn sample_content() -> MapContent {
    MapContent {
        points: vec![
            Point::new(
                "Himeji Castle",
                Coordinate::from_lat_lon(34.839449, 134.6939047),
                vec!["Japan".to_string(), "Day 3".to_string()],
            ),
            Point::new(
                "Hotel Granvia",
                Coordinate::from_lat_lon(34.9858, 135.7588),
                vec!["Japan".to_string(), "Bookings".to_string()],
            ),
        ],
        lines: vec![Line::new(
            "Nakasendo",
            vec![
                Coordinate::from_lat_lon(35.5315174, 137.5717516),
                Coordinate::from_lat_lon(35.5775876, 137.5956667),
            ],
            vec!["Japan".to_string()],
        )],
    }
}

fn sample_stats() -> BuildStats {
    BuildStats {
        links_seen: 6,
        recognized: 5,
        unsupported: 0,
        failed: 1,
        points: 2,
        duplicates: 1,
        lines: 1,
    }
}

#[test]
fn test_text_report_lists_groups_and_routes() {
    let report = generate_build_report(&sample_content(), &sample_stats());

    assert!(report.contains("Points:       2"));
    assert!(report.contains("Duplicates:   1"));
    assert!(report.contains("Failed:       1"));
    assert!(!report.contains("Unsupported"));

    let hotel = report.find("Hotel (1)").unwrap();
    let default = report.find("Default (1)").unwrap();
    assert!(hotel < default);
    assert!(report.contains("Himeji Castle (34.839449, 134.6939047)"));
    assert!(report.contains("Nakasendo (2 stops)"));
}

#[test]
fn test_json_report_structure() {
    let data = gather_report_data("japan.docx", &sample_content(), &sample_stats());
    let json = generate_json_report(&data).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["document"], "japan.docx");
    assert_eq!(value["stats"]["points"], 2);
    assert_eq!(value["points"][0]["name"], "Himeji Castle");
    assert_eq!(value["points"][0]["category"], "default");
    assert_eq!(value["points"][1]["category"], "hotel");
    assert_eq!(value["points"][0]["lat"], 34.839449);
    assert_eq!(value["lines"][0]["stops"][1][0], 35.5775876);
    assert_eq!(value["lines"][0]["headings"][0], "Japan");
}

#[test]
fn test_write_json_report() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("report.json");
    let data = gather_report_data("japan.docx", &sample_content(), &sample_stats());

    write_json_report(&data, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"Nakasendo\""));

    let missing_dir = temp_dir.path().join("nope").join("report.json");
    assert!(write_json_report(&data, &missing_dir).is_err());
}
