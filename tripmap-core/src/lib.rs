pub mod builder;
pub mod cache;
pub mod category;
pub mod coords;
pub mod document;
pub mod docx;
pub mod error;
pub mod hierarchy;
pub mod kml;
pub mod links;
pub mod model;
pub mod report;
pub mod tagged;

pub use builder::{BuildStats, Feature, MapContent, MapMaker};
pub use cache::LinkCache;
pub use category::{Category, Icon, categorize};
pub use document::Document;
pub use error::{CacheError, DocumentError, ExtractError, OutputError};
pub use model::{Coordinate, Line, Link, Point};
