// Coordinate extraction from decoded tagged data
//
// Place URLs carry their position as 3d (lat) / 4d (lon); directions URLs
// carry one 1d (lon) / 2d (lat) pair per waypoint. The two vocabularies are
// never mixed.

use crate::error::ExtractError;
use crate::links::data_segment;
use crate::model::Coordinate;
use crate::tagged::{TaggedDatum, decode};

const PLACE_LAT: &str = "3d";
const PLACE_LON: &str = "4d";
const ROUTE_LAT: &str = "2d";
const ROUTE_LON: &str = "1d";

fn parse_degrees(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The single position of a place. When a tag repeats, the last one wins.
pub fn extract_place_coordinate(data: &[TaggedDatum]) -> Result<Coordinate, ExtractError> {
    let mut lat = None;
    let mut lon = None;
    for datum in data {
        match datum.tag.as_str() {
            PLACE_LAT => lat = Some(datum.value.as_str()),
            PLACE_LON => lon = Some(datum.value.as_str()),
            _ => {}
        }
    }

    let lat = lat
        .and_then(parse_degrees)
        .ok_or(ExtractError::MissingField(PLACE_LAT))?;
    let lon = lon
        .and_then(parse_degrees)
        .ok_or(ExtractError::MissingField(PLACE_LON))?;

    Ok(Coordinate::from_lat_lon(lat, lon))
}

/// Every complete waypoint of a route, in the order the URL lists them.
/// An unpaired trailing 1d/2d is dropped.
pub fn extract_route_coordinates(data: &[TaggedDatum]) -> Vec<Coordinate> {
    let mut coordinates = Vec::new();
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for datum in data {
        match datum.tag.as_str() {
            ROUTE_LAT => lat = parse_degrees(&datum.value),
            ROUTE_LON => lon = parse_degrees(&datum.value),
            _ => continue,
        }

        if let (Some(la), Some(lo)) = (lat, lon) {
            coordinates.push(Coordinate::from_lat_lon(la, lo));
            lat = None;
            lon = None;
        }
    }

    coordinates
}

fn tagged_data_of(url: &str) -> Result<Vec<TaggedDatum>, ExtractError> {
    let segment = data_segment(url)
        .ok_or_else(|| ExtractError::Format(format!("no data segment in {}", url)))?;
    decode(&segment)
}

/// Position encoded in a place URL.
pub fn coordinate_from_url(url: &str) -> Result<Coordinate, ExtractError> {
    extract_place_coordinate(&tagged_data_of(url)?)
}

/// Waypoints encoded in a directions URL.
pub fn route_from_url(url: &str) -> Result<Vec<Coordinate>, ExtractError> {
    Ok(extract_route_coordinates(&tagged_data_of(url)?))
}
