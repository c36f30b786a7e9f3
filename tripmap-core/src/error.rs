use thiserror::Error;
use tripmap_resolver::ResolveError;

/// Why a single map link was dropped. None of these abort a run.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Malformed tagged data: {0}")]
    Format(String),

    #[error("Tagged data is missing a usable '{0}' field")]
    MissingField(&'static str),

    #[error("Could not resolve short link: {0}")]
    Resolution(#[from] ResolveError),

    #[error("Unsupported maps URL: {0}")]
    UnsupportedUrl(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a readable document container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("Document is missing required part {0}")]
    MissingPart(&'static str),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
