use crate::model::Point;
use serde::Serialize;
use std::fmt;

/// Folder a point is filed under in the overlay.
///
/// The declaration order is the folder order in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Travel,
    Hotel,
    Default,
}

/// A marker icon from the mapping application's icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub name: &'static str,
    pub number: u32,
    /// `RRGGBB`
    pub color: &'static str,
}

impl Icon {
    /// `<number>-<RRGGBB>`, e.g. `1899-0288D1`
    pub fn code(&self) -> String {
        format!("{}-{}", self.number, self.color)
    }

    /// Style id the importer uses to pick the icon.
    pub fn style_id(&self) -> String {
        format!("icon-{}", self.code())
    }

    /// Opaque color in KML's `aabbggrr` order.
    pub fn kml_color(&self) -> String {
        let rgb = self.color;
        if rgb.len() != 6 || !rgb.is_ascii() {
            return "ffffffff".to_string();
        }
        format!("ff{}{}{}", &rgb[4..6], &rgb[2..4], &rgb[0..2]).to_ascii_lowercase()
    }
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Travel, Category::Hotel, Category::Default];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Travel => "Travel",
            Category::Hotel => "Hotel",
            Category::Default => "Default",
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            Category::Travel => Icon {
                name: "Train",
                number: 1716,
                color: "0097A7",
            },
            Category::Hotel => Icon {
                name: "Hotel",
                number: 1602,
                color: "7CB342",
            },
            Category::Default => Icon {
                name: "Pin",
                number: 1899,
                color: "0288D1",
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick a category from the point's name, then from its headings.
pub fn categorize(point: &Point) -> Category {
    if point.name().to_lowercase().contains("station") {
        return Category::Travel;
    }
    if point.headings().join(" ").to_lowercase().contains("bookings") {
        return Category::Hotel;
    }
    Category::Default
}
