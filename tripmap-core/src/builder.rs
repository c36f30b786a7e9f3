use crate::category::{Category, categorize};
use crate::coords::{coordinate_from_url, route_from_url};
use crate::document::Document;
use crate::error::ExtractError;
use crate::hierarchy::iter_links_with_headings;
use crate::links::{LinkKind, classify, is_recognized_link, place_name};
use crate::model::{Line, Link, Point};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tripmap_resolver::Resolve;

pub const DEFAULT_CONCURRENCY: usize = 4;

pub type ProgressCallback = Arc<dyn Fn(&Link) + Send + Sync>;

/// What one map link turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Point(Point),
    Line(Line),
}

/// Everything a document put on the map, in document order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MapContent {
    pub points: Vec<Point>,
    pub lines: Vec<Line>,
}

impl MapContent {
    /// Points grouped per category, in folder order. Empty categories are
    /// left out.
    pub fn by_category(&self) -> Vec<(Category, Vec<&Point>)> {
        Category::ALL
            .iter()
            .map(|category| {
                let points: Vec<&Point> = self
                    .points
                    .iter()
                    .filter(|point| categorize(point) == *category)
                    .collect();
                (*category, points)
            })
            .filter(|(_, points)| !points.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub links_seen: usize,
    pub recognized: usize,
    pub unsupported: usize,
    pub failed: usize,
    pub points: usize,
    pub duplicates: usize,
    pub lines: usize,
}

/// Turns the map links of a document into points and routes.
pub struct MapMaker<R> {
    resolver: R,
    concurrency: usize,
    progress_callback: Option<ProgressCallback>,
}

impl<R: Resolve> MapMaker<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            concurrency: DEFAULT_CONCURRENCY,
            progress_callback: None,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn into_resolver(self) -> R {
        self.resolver
    }

    /// Resolve, classify and decode one link.
    pub async fn process_link(&self, link: &Link) -> Result<Feature, ExtractError> {
        let target = match classify(&link.address) {
            LinkKind::Short => self.resolver.resolve(&link.address).await?,
            LinkKind::Unrecognized => return Err(ExtractError::UnsupportedUrl(link.address.clone())),
            LinkKind::Place | LinkKind::Directions | LinkKind::OtherMaps => link.address.clone(),
        };

        match classify(&target) {
            LinkKind::Place => {
                let coordinate = coordinate_from_url(&target)?;
                let mut name = link.text.trim().to_string();
                if name.is_empty() {
                    name = place_name(&target).unwrap_or_default();
                }
                Ok(Feature::Point(Point::new(name, coordinate, link.headings.clone())))
            }
            LinkKind::Directions => {
                let coordinates = route_from_url(&target)?;
                // A line string needs two positions.
                if coordinates.len() < 2 {
                    return Err(ExtractError::MissingField("1d"));
                }
                Ok(Feature::Line(Line::new(
                    link.text.trim(),
                    coordinates,
                    link.headings.clone(),
                )))
            }
            LinkKind::Short | LinkKind::OtherMaps | LinkKind::Unrecognized => {
                Err(ExtractError::UnsupportedUrl(target))
            }
        }
    }

    /// Walk `document` and collect its points and routes.
    ///
    /// Links are processed `concurrency` at a time, but results are gathered
    /// in document order, so the first occurrence of a duplicate point is the
    /// one that is kept. A link that fails is logged and dropped.
    pub async fn build(&self, document: &Document) -> (MapContent, BuildStats) {
        let links = iter_links_with_headings(document);
        let mut stats = BuildStats {
            links_seen: links.len(),
            ..BuildStats::default()
        };

        let recognized: Vec<Link> = links
            .into_iter()
            .filter(|link| is_recognized_link(&link.address))
            .collect();
        stats.recognized = recognized.len();
        info!(
            "Processing {} map links out of {} hyperlinks",
            stats.recognized, stats.links_seen
        );

        let results: Vec<(&Link, Result<Feature, ExtractError>)> = stream::iter(&recognized)
            .map(|link| async move {
                if let Some(callback) = &self.progress_callback {
                    callback(link);
                }
                (link, self.process_link(link).await)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut content = MapContent::default();
        let mut seen: HashSet<Point> = HashSet::new();

        for (link, result) in results {
            match result {
                Ok(Feature::Point(point)) => {
                    if seen.insert(point.clone()) {
                        debug!("Point {} at {}", point.name(), point.coordinate());
                        content.points.push(point);
                    } else {
                        debug!("Dropping duplicate point {}", point.name());
                        stats.duplicates += 1;
                    }
                }
                Ok(Feature::Line(line)) => {
                    debug!("Route {} with {} stops", line.name(), line.coordinates().len());
                    content.lines.push(line);
                }
                Err(ExtractError::UnsupportedUrl(url)) => {
                    debug!("Skipping unsupported maps URL {}", url);
                    stats.unsupported += 1;
                }
                Err(e) => {
                    warn!("Dropping link {:?} ({}): {}", link.text, link.address, e);
                    stats.failed += 1;
                }
            }
        }

        stats.points = content.points.len();
        stats.lines = content.lines.len();
        info!(
            "Built {} points and {} routes ({} duplicates, {} failed)",
            stats.points, stats.lines, stats.duplicates, stats.failed
        );

        (content, stats)
    }
}
