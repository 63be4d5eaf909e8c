//! Filter Translator
//!
//! Converts the map client's filter criteria into a pure predicate that
//! the repository applies when listing POIs. All fields are optional and
//! combine with logical AND; the no-filter sentinels (`ALL`, `NO_FILTER`)
//! are expressed as dedicated filter types instead of extra enum variants
//! on the storable types.

use shared::models::{Category, PointOfInterest, TargetGroup};

/// Category criterion; `All` imposes no constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// Target group criterion; `NoFilter` imposes no constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetGroupFilter {
    #[default]
    NoFilter,
    Only(TargetGroup),
}

/// Opening-hours criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenFilter {
    #[default]
    Any,
    /// Currently within opening hours (inclusive both ends, same day)
    Open,
    /// Not currently within opening hours
    Closed,
}

/// Combined filter criteria for the POI list query
#[derive(Debug, Clone, Default)]
pub struct PoiFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
    pub category: CategoryFilter,
    pub target_group: TargetGroupFilter,
    /// Lower bound on the required minimum visitor length
    pub min_length: Option<i64>,
    /// Upper bound on the current queue length
    pub max_current_queue_length: Option<i64>,
    pub is_open: OpenFilter,
    /// Match POIs whose tag set intersects this one (hasSome, not hasAll);
    /// empty means no constraint
    pub tags: Vec<String>,
}

impl PoiFilter {
    /// Evaluate the predicate against one POI at wall-clock time `now`
    /// ("HH:MM"). Absent criteria impose no constraint; present ones AND.
    pub fn matches(&self, poi: &PointOfInterest, now: &str) -> bool {
        if let Some(name) = &self.name {
            if !poi.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let CategoryFilter::Only(category) = self.category {
            if poi.category != category {
                return false;
            }
        }
        if let TargetGroupFilter::Only(group) = self.target_group {
            if poi.target_group != group {
                return false;
            }
        }
        if let Some(min) = self.min_length {
            if poi.required_min_length < min {
                return false;
            }
        }
        if let Some(max) = self.max_current_queue_length {
            if poi.current_queue_length > max {
                return false;
            }
        }
        match self.is_open {
            OpenFilter::Any => {}
            OpenFilter::Open => {
                if !is_open_at(poi, now) {
                    return false;
                }
            }
            OpenFilter::Closed => {
                if is_open_at(poi, now) {
                    return false;
                }
            }
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|tag| poi.tags.contains(tag)) {
            return false;
        }
        true
    }
}

/// Inclusive same-day window: `opens <= now <= closes`. Zero-padded
/// "HH:MM" strings compare lexicographically in clock order.
fn is_open_at(poi: &PointOfInterest, now: &str) -> bool {
    poi.poi_opens_doors_at.as_str() <= now && now <= poi.poi_closes_doors_at.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_poi() -> PointOfInterest {
        PointOfInterest {
            id: "poi-1".to_string(),
            name: "Thunder Coaster".to_string(),
            category: Category::Attraction,
            image: "thunder.jpg".to_string(),
            description: "Fast".to_string(),
            tags: vec!["family".to_string(), "thrill".to_string()],
            target_group: TargetGroup::Teens,
            required_min_length: 120,
            poi_opens_doors_at: "09:00".to_string(),
            poi_closes_doors_at: "18:00".to_string(),
            current_queue_length: 15,
            coordinates: Vec::new(),
            related_poi: Vec::new(),
            relating_to_poi: Vec::new(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(PoiFilter::default().matches(&sample_poi(), "12:00"));
    }

    #[test]
    fn test_name_substring_case_insensitive() {
        let filter = PoiFilter {
            name: Some("thunder".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&sample_poi(), "12:00"));

        let filter = PoiFilter {
            name: Some("splash".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&sample_poi(), "12:00"));
    }

    #[test]
    fn test_category_filter() {
        let filter = PoiFilter {
            category: CategoryFilter::Only(Category::Attraction),
            ..Default::default()
        };
        assert!(filter.matches(&sample_poi(), "12:00"));

        let filter = PoiFilter {
            category: CategoryFilter::Only(Category::Toilet),
            ..Default::default()
        };
        assert!(!filter.matches(&sample_poi(), "12:00"));
    }

    #[test]
    fn test_target_group_filter() {
        let filter = PoiFilter {
            target_group: TargetGroupFilter::Only(TargetGroup::Teens),
            ..Default::default()
        };
        assert!(filter.matches(&sample_poi(), "12:00"));

        let filter = PoiFilter {
            target_group: TargetGroupFilter::Only(TargetGroup::Preschoolers),
            ..Default::default()
        };
        assert!(!filter.matches(&sample_poi(), "12:00"));
    }

    #[test]
    fn test_min_length_is_lower_bound() {
        let filter = PoiFilter {
            min_length: Some(100),
            ..Default::default()
        };
        assert!(filter.matches(&sample_poi(), "12:00"));

        let filter = PoiFilter {
            min_length: Some(140),
            ..Default::default()
        };
        assert!(!filter.matches(&sample_poi(), "12:00"));
    }

    #[test]
    fn test_max_queue_is_upper_bound() {
        let filter = PoiFilter {
            max_current_queue_length: Some(15),
            ..Default::default()
        };
        assert!(filter.matches(&sample_poi(), "12:00"));

        let filter = PoiFilter {
            max_current_queue_length: Some(10),
            ..Default::default()
        };
        assert!(!filter.matches(&sample_poi(), "12:00"));
    }

    #[test]
    fn test_open_window_is_inclusive() {
        let filter = PoiFilter {
            is_open: OpenFilter::Open,
            ..Default::default()
        };
        let poi = sample_poi();
        assert!(filter.matches(&poi, "12:00"));
        assert!(filter.matches(&poi, "09:00"));
        assert!(filter.matches(&poi, "18:00"));
        assert!(!filter.matches(&poi, "08:59"));
        assert!(!filter.matches(&poi, "20:00"));
    }

    #[test]
    fn test_closed_is_negation_of_open() {
        let filter = PoiFilter {
            is_open: OpenFilter::Closed,
            ..Default::default()
        };
        let poi = sample_poi();
        assert!(!filter.matches(&poi, "12:00"));
        assert!(filter.matches(&poi, "20:00"));
        assert!(filter.matches(&poi, "08:00"));
    }

    #[test]
    fn test_tags_has_some_semantics() {
        let filter = PoiFilter {
            tags: vec!["thrill".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&sample_poi(), "12:00"));

        // one overlapping tag is enough, the rest may be missing
        let filter = PoiFilter {
            tags: vec!["thrill".to_string(), "water".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&sample_poi(), "12:00"));

        let filter = PoiFilter {
            tags: vec!["water".to_string()],
            ..Default::default()
        };
        assert!(!filter.matches(&sample_poi(), "12:00"));
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let filter = PoiFilter {
            name: Some("thunder".to_string()),
            category: CategoryFilter::Only(Category::Attraction),
            max_current_queue_length: Some(20),
            is_open: OpenFilter::Open,
            tags: vec!["thrill".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&sample_poi(), "12:00"));

        // one failing criterion sinks the whole conjunction
        let filter = PoiFilter {
            max_current_queue_length: Some(5),
            ..filter
        };
        assert!(!filter.matches(&sample_poi(), "12:00"));
    }
}
