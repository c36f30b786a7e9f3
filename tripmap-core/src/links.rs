// Map link classification

use url::Url;
use url::form_urlencoded;

const SHORT_LINK_PREFIXES: [&str; 2] = ["https://goo.gl/maps/", "https://maps.app.goo.gl/"];
const MAPS_PREFIX: &str = "https://www.google.com/maps/";
const PLACE_PREFIX: &str = "https://www.google.com/maps/place/";
const DIRECTIONS_PREFIX: &str = "https://www.google.com/maps/dir/";

/// What a URL looks like to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Needs one redirect hop before it can be decoded
    Short,
    Place,
    Directions,
    /// Under the maps prefix, but neither a place nor a route
    OtherMaps,
    Unrecognized,
}

pub fn is_short_link(url: &str) -> bool {
    SHORT_LINK_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

pub fn is_place_link(url: &str) -> bool {
    url.starts_with(PLACE_PREFIX)
}

pub fn is_directions_link(url: &str) -> bool {
    url.starts_with(DIRECTIONS_PREFIX)
}

pub fn is_long_link(url: &str) -> bool {
    is_place_link(url) || is_directions_link(url) || url.starts_with(MAPS_PREFIX)
}

pub fn is_recognized_link(url: &str) -> bool {
    is_short_link(url) || is_long_link(url)
}

pub fn classify(url: &str) -> LinkKind {
    if is_short_link(url) {
        LinkKind::Short
    } else if is_place_link(url) {
        LinkKind::Place
    } else if is_directions_link(url) {
        LinkKind::Directions
    } else if is_long_link(url) {
        LinkKind::OtherMaps
    } else {
        LinkKind::Unrecognized
    }
}

/// The `data=!...` path segment of a maps URL, if it has one.
///
/// Only the path is searched; the query string never carries tagged data.
pub fn data_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| segment.starts_with("data="))
        .last()
        .map(|segment| segment.to_string())
}

/// Human readable place name from `/maps/place/<name>/...`.
pub fn place_name(url: &str) -> Option<String> {
    if !is_place_link(url) {
        return None;
    }
    let parsed = Url::parse(url).ok()?;
    let raw = parsed.path_segments()?.nth(2)?;
    if raw.is_empty() || raw.starts_with('@') || raw.starts_with("data=") {
        return None;
    }

    // Path segments use form encoding here ('+' for spaces)
    let decoded: String = form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| {
            if value.is_empty() {
                key.into_owned()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&");
    let decoded = decoded.trim().to_string();

    if decoded.is_empty() { None } else { Some(decoded) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACE: &str = "https://www.google.com/maps/place/Himeji+Castle/@34.8394534,134.6913298,17z/data=!3m1!4b1!4m6!3m5!1s0x3554e003a23324b3:0x7a4f8c2f6eba81b1!8m2!3d34.839449!4d134.6939047!16zL20vMDE4bmN4?entry=ttu";
    const DIRECTIONS: &str = "https://www.google.com/maps/dir/Magome,+Nakatsugawa,+Gifu,+Japan/Tsumago-juku/@35.5541856,137.5632207,14z/data=!3m1!4b1!4m14!4m13!1m5!1m1!1s0x601cb71add823007:0x7d766e65361116fa!2m2!1d137.5717516!2d35.5315174!1m5!1m1!1s0x601cb7e4a598bb33:0x87bc2c35315036f6!2m2!1d137.5956667!2d35.5775876!3e2?entry=ttu";

    #[test]
    fn test_classify_place() {
        assert!(is_place_link(PLACE));
        assert!(is_long_link(PLACE));
        assert!(is_recognized_link(PLACE));
        assert!(!is_short_link(PLACE));
        assert_eq!(classify(PLACE), LinkKind::Place);
    }

    #[test]
    fn test_classify_directions() {
        assert!(is_directions_link(DIRECTIONS));
        assert!(!is_place_link(DIRECTIONS));
        assert_eq!(classify(DIRECTIONS), LinkKind::Directions);
    }

    #[test]
    fn test_classify_short_links() {
        assert_eq!(classify("https://goo.gl/maps/WyoUHrqEoLR3MiJa6"), LinkKind::Short);
        assert_eq!(classify("https://maps.app.goo.gl/abcdef"), LinkKind::Short);
        assert!(!is_long_link("https://goo.gl/maps/WyoUHrqEoLR3MiJa6"));
    }

    #[test]
    fn test_classify_other_maps_path() {
        let url = "https://www.google.com/maps/search/ramen/@35.6,139.7,15z";
        assert!(is_long_link(url));
        assert_eq!(classify(url), LinkKind::OtherMaps);
    }

    #[test]
    fn test_unrecognized_links() {
        for url in [
            "https://example.com/maps/place/X",
            "http://www.google.com/maps/place/X",
            "https://goo.gl/other",
            "",
        ] {
            assert!(!is_recognized_link(url), "{} should not be recognized", url);
            assert_eq!(classify(url), LinkKind::Unrecognized);
        }
    }

    #[test]
    fn test_data_segment_ignores_query() {
        let segment = data_segment(PLACE).unwrap();
        assert!(segment.starts_with("data=!3m1"));
        assert!(segment.ends_with("!16zL20vMDE4bmN4"));
    }

    #[test]
    fn test_data_segment_missing() {
        assert_eq!(
            data_segment("https://www.google.com/maps/place/Nowhere/@1,2,3z"),
            None
        );
        assert_eq!(data_segment("not a url"), None);
    }

    #[test]
    fn test_place_name_is_decoded() {
        assert_eq!(place_name(PLACE).as_deref(), Some("Himeji Castle"));
        assert_eq!(
            place_name("https://www.google.com/maps/place/Nikk%C5%8D+T%C5%8Dshog%C5%AB/@1,2,17z")
                .as_deref(),
            Some("Nikkō Tōshogū")
        );
        assert_eq!(place_name(DIRECTIONS), None);
    }
}
