use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A WGS84 position. Stored as (longitude, latitude), the order KML wants,
/// but always built from a decoded (latitude, longitude) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self { lon, lat }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

// Extractors never build coordinates from non-finite values, so comparing
// bit patterns gives a lawful Eq/Hash.
impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.lon.to_bits() == other.lon.to_bits() && self.lat.to_bits() == other.lat.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lon.to_bits().hash(state);
        self.lat.to_bits().hash(state);
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lon
            .total_cmp(&other.lon)
            .then_with(|| self.lat.total_cmp(&other.lat))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// A hyperlink found in the document, with the headings it sits under
/// (outermost first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub address: String,
    pub text: String,
    pub headings: Vec<String>,
}

/// A named place.
///
/// Identity is `(name, coordinate)`: the heading path is carried along for
/// output but ignored by `Eq`, `Hash` and `Ord`, so the same place linked
/// from two sections collapses to one point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    name: String,
    coordinate: Coordinate,
    headings: Vec<String>,
}

impl Point {
    pub fn new(name: impl Into<String>, coordinate: Coordinate, headings: Vec<String>) -> Self {
        Self {
            name: name.into(),
            coordinate,
            headings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn headings(&self) -> &[String] {
        &self.headings
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.coordinate == other.coordinate
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.coordinate.hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.coordinate.cmp(&other.coordinate))
    }
}

/// A named route through an ordered list of waypoints. Like [`Point`], the
/// heading path is not part of its identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    name: String,
    coordinates: Vec<Coordinate>,
    headings: Vec<String>,
}

impl Line {
    pub fn new(name: impl Into<String>, coordinates: Vec<Coordinate>, headings: Vec<String>) -> Self {
        Self {
            name: name.into(),
            coordinates,
            headings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn headings(&self) -> &[String] {
        &self.headings
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.coordinates == other.coordinates
    }
}

impl Eq for Line {}

impl Hash for Line {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.coordinates.hash(state);
    }
}
