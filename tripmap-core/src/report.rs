// Build summaries: plain text for the terminal, JSON for --report

use crate::builder::{BuildStats, MapContent};
use crate::category::{Category, categorize};
use crate::error::OutputError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "────────────────────────────────────────────────────────────\n";

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub document: String,
    pub stats: BuildStats,
    pub points: Vec<PointData>,
    pub lines: Vec<LineData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointData {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub category: Category,
    pub headings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineData {
    pub name: String,
    /// `[lat, lon]` pairs in route order
    pub stops: Vec<[f64; 2]>,
    pub headings: Vec<String>,
}

pub fn gather_report_data(document: &str, content: &MapContent, stats: &BuildStats) -> ReportData {
    let points = content
        .points
        .iter()
        .map(|point| PointData {
            name: point.name().to_string(),
            lat: point.coordinate().lat(),
            lon: point.coordinate().lon(),
            category: categorize(point),
            headings: point.headings().to_vec(),
        })
        .collect();

    let lines = content
        .lines
        .iter()
        .map(|line| LineData {
            name: line.name().to_string(),
            stops: line.coordinates().iter().map(|c| [c.lat(), c.lon()]).collect(),
            headings: line.headings().to_vec(),
        })
        .collect();

    ReportData {
        document: document.to_string(),
        stats: stats.clone(),
        points,
        lines,
    }
}

pub fn generate_build_report(content: &MapContent, stats: &BuildStats) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str(&format!("Hyperlinks:   {}\n", stats.links_seen));
    report.push_str(&format!("Map links:    {}\n", stats.recognized));
    report.push_str(&format!("Points:       {}\n", stats.points));
    report.push_str(&format!("Routes:       {}\n", stats.lines));
    if stats.duplicates > 0 {
        report.push_str(&format!("Duplicates:   {}\n", stats.duplicates));
    }
    if stats.unsupported > 0 {
        report.push_str(&format!("Unsupported:  {}\n", stats.unsupported));
    }
    if stats.failed > 0 {
        report.push_str(&format!("Failed:       {}\n", stats.failed));
    }
    report.push_str(RULE);

    for (category, points) in content.by_category() {
        report.push_str(&format!("\n{} ({})\n", category, points.len()));
        for point in points {
            report.push_str(&format!("  • {} {}\n", point.name(), point.coordinate()));
        }
    }

    if !content.lines.is_empty() {
        report.push_str(&format!("\nRoutes ({})\n", content.lines.len()));
        for line in &content.lines {
            report.push_str(&format!(
                "  • {} ({} stops)\n",
                line.name(),
                line.coordinates().len()
            ));
        }
    }

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

pub fn write_json_report(data: &ReportData, path: &Path) -> Result<(), OutputError> {
    let json = generate_json_report(data)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
