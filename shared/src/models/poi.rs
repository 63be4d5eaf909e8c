//! Point of Interest Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type PoiId = String;

/// Parse error for enum-valued columns
#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Storable POI category
///
/// `ALL` is a filter-only sentinel and intentionally has no variant here;
/// the query layer uses its own `CategoryFilter` type instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Attraction,
    Toilet,
    Restaurant,
    Foodtruck,
    Locker,
    Shop,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Attraction => "ATTRACTION",
            Category::Toilet => "TOILET",
            Category::Restaurant => "RESTAURANT",
            Category::Foodtruck => "FOODTRUCK",
            Category::Locker => "LOCKER",
            Category::Shop => "SHOP",
            Category::Other => "OTHER",
        }
    }

    /// Only attractions may hold related-POI links
    pub fn supports_relations(&self) -> bool {
        matches!(self, Category::Attraction)
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ATTRACTION" => Ok(Category::Attraction),
            "TOILET" => Ok(Category::Toilet),
            "RESTAURANT" => Ok(Category::Restaurant),
            "FOODTRUCK" => Ok(Category::Foodtruck),
            "LOCKER" => Ok(Category::Locker),
            "SHOP" => Ok(Category::Shop),
            "OTHER" => Ok(Category::Other),
            _ => Err(ParseEnumError {
                kind: "category",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storable target group
///
/// `NO_FILTER` is a filter-only sentinel; see `TargetGroupFilter` in the
/// query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetGroup {
    Preschoolers,
    Teens,
    Adults,
    All,
}

impl TargetGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetGroup::Preschoolers => "PRESCHOOLERS",
            TargetGroup::Teens => "TEENS",
            TargetGroup::Adults => "ADULTS",
            TargetGroup::All => "ALL",
        }
    }
}

impl FromStr for TargetGroup {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRESCHOOLERS" => Ok(TargetGroup::Preschoolers),
            "TEENS" => Ok(TargetGroup::Teens),
            "ADULTS" => Ok(TargetGroup::Adults),
            "ALL" => Ok(TargetGroup::All),
            _ => Err(ParseEnumError {
                kind: "target group",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map coordinate pair
///
/// Owned exclusively by one ring of one POI; replaced wholesale on edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub poi_x_coordinate: f64,
    pub poi_y_coordinate: f64,
}

/// Point of Interest record
///
/// `coordinates` holds ordered rings: a single-point ring is a map marker,
/// a ring of three or more points is a zone boundary polygon.
///
/// The two relation views (`related_poi` forward, `relating_to_poi`
/// reverse) are populated on detail fetches only; list queries leave them
/// empty. Nested records carry their own coordinates but no further
/// relation expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub id: PoiId,
    pub name: String,
    pub category: Category,
    pub image: String,
    pub description: String,
    pub tags: Vec<String>,
    pub target_group: TargetGroup,
    pub required_min_length: i64,
    pub poi_opens_doors_at: String,
    pub poi_closes_doors_at: String,
    pub current_queue_length: i64,
    #[serde(default)]
    pub coordinates: Vec<Vec<Coordinate>>,
    #[serde(default)]
    pub related_poi: Vec<PointOfInterest>,
    #[serde(default)]
    pub relating_to_poi: Vec<PointOfInterest>,
}

/// Create/edit request body (admin form wire format)
///
/// `tags` is a comma-separated string and `required_min_length` arrives as
/// text, exactly as the form submits them; the API layer validates and
/// converts into [`PoiData`] before anything touches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiInput {
    pub name: String,
    pub category: Category,
    pub image: String,
    pub description: String,
    pub tags: String,
    pub target_group: TargetGroup,
    pub required_min_length: String,
    pub poi_opens_doors_at: String,
    pub poi_closes_doors_at: String,
    #[serde(default)]
    pub coordinates: Vec<Vec<Coordinate>>,
    #[serde(default)]
    pub related_to_attraction_ids: Vec<String>,
}

/// Validated POI payload consumed by the repository
///
/// Used by both create and edit; edits are full replacements of scalars
/// and coordinate rings, plus a relation delta derived from
/// `related_poi_ids`.
#[derive(Debug, Clone)]
pub struct PoiData {
    pub name: String,
    pub category: Category,
    pub image: String,
    pub description: String,
    pub tags: Vec<String>,
    pub target_group: TargetGroup,
    pub required_min_length: i64,
    pub poi_opens_doors_at: String,
    pub poi_closes_doors_at: String,
    pub coordinates: Vec<Vec<Coordinate>>,
    pub related_poi_ids: Vec<String>,
}
