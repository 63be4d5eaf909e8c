//! Point of Interest API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{PoiInput, PointOfInterest};

use crate::api::convert;
use crate::core::ServerState;
use crate::db::repository::poi as poi_repo;
use crate::poi::filter::{CategoryFilter, OpenFilter, PoiFilter, TargetGroupFilter};
use crate::utils::{AppError, AppResult};

/// Query string for the list endpoint. `typeCategory=ALL` and
/// `targetGroup=NO_FILTER` are explicit no-filter sentinels, `isOpen`
/// is the tri-state "" / "1" (open) / "0" (closed), and `tags` is a
/// comma-separated list matched with hasSome semantics.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiQuery {
    pub name: Option<String>,
    pub type_category: Option<String>,
    pub target_group: Option<String>,
    pub min_length: Option<String>,
    pub max_current_queue_length: Option<String>,
    pub is_open: Option<String>,
    pub tags: Option<String>,
}

impl PoiQuery {
    /// Translate the raw query parameters into filter criteria.
    pub fn into_filter(self) -> AppResult<PoiFilter> {
        let mut filter = PoiFilter {
            name: self.name.filter(|n| !n.is_empty()),
            ..Default::default()
        };

        if let Some(category) = self.type_category.filter(|c| !c.is_empty()) {
            if category != "ALL" {
                let category = category.parse().map_err(|_| {
                    AppError::validation(format!("unknown typeCategory '{category}'"))
                })?;
                filter.category = CategoryFilter::Only(category);
            }
        }

        if let Some(group) = self.target_group.filter(|g| !g.is_empty()) {
            if group != "NO_FILTER" {
                let group = group.parse().map_err(|_| {
                    AppError::validation(format!("unknown targetGroup '{group}'"))
                })?;
                filter.target_group = TargetGroupFilter::Only(group);
            }
        }

        if let Some(min) = self.min_length.filter(|v| !v.is_empty()) {
            filter.min_length = Some(min.parse().map_err(|_| {
                AppError::validation(format!("minLength must be a number, got '{min}'"))
            })?);
        }

        if let Some(max) = self.max_current_queue_length.filter(|v| !v.is_empty()) {
            filter.max_current_queue_length = Some(max.parse().map_err(|_| {
                AppError::validation(format!(
                    "maxCurrentQueueLength must be a number, got '{max}'"
                ))
            })?);
        }

        match self.is_open.as_deref() {
            Some("1") => filter.is_open = OpenFilter::Open,
            Some("0") => filter.is_open = OpenFilter::Closed,
            _ => {}
        }

        if let Some(tags) = self.tags {
            filter.tags = tags
                .split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect();
        }

        Ok(filter)
    }
}

/// GET /pointOfInterest - 条件过滤列表 (含各自坐标环)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PoiQuery>,
) -> AppResult<Json<Vec<PointOfInterest>>> {
    let filter = query.into_filter()?;
    let pois = poi_repo::find_all(&state.pool, &filter).await?;
    Ok(Json(pois))
}

/// GET /pointOfInterest/{id} - 单个 POI，展开双向关联视图
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PointOfInterest>> {
    let poi = poi_repo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Point of Interest {id} not found")))?;
    Ok(Json(poi))
}

/// POST /pointOfInterest - 创建 (queue length starts at 0)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PoiInput>,
) -> AppResult<Json<PointOfInterest>> {
    let data = convert::poi_input_to_data(payload)?;
    let poi = poi_repo::create(&state.pool, data).await?;
    Ok(Json(poi))
}

/// PUT /pointOfInterest/{id} - 全量替换 + 关联 delta
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PoiInput>,
) -> AppResult<Json<PointOfInterest>> {
    let data = convert::poi_input_to_data(payload)?;
    let poi = poi_repo::update(&state.pool, &id, data).await?;
    Ok(Json(poi))
}

/// DELETE /pointOfInterest/{id} - 级联删除 (坐标与双向关联一并清除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    poi_repo::delete(&state.pool, &id).await?;
    Ok(Json(serde_json::json!({
        "message": "Point of Interest deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Category, TargetGroup};

    #[test]
    fn test_empty_query_is_unconstrained() {
        let filter = PoiQuery::default().into_filter().unwrap();
        assert!(filter.name.is_none());
        assert_eq!(filter.category, CategoryFilter::All);
        assert_eq!(filter.target_group, TargetGroupFilter::NoFilter);
        assert_eq!(filter.is_open, OpenFilter::Any);
        assert!(filter.tags.is_empty());
    }

    #[test]
    fn test_sentinels_mean_no_filter() {
        let query = PoiQuery {
            type_category: Some("ALL".to_string()),
            target_group: Some("NO_FILTER".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.category, CategoryFilter::All);
        assert_eq!(filter.target_group, TargetGroupFilter::NoFilter);
    }

    #[test]
    fn test_concrete_criteria_parse() {
        let query = PoiQuery {
            type_category: Some("ATTRACTION".to_string()),
            target_group: Some("TEENS".to_string()),
            min_length: Some("120".to_string()),
            max_current_queue_length: Some("20".to_string()),
            is_open: Some("1".to_string()),
            tags: Some("thrill, water".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(
            filter.category,
            CategoryFilter::Only(Category::Attraction)
        );
        assert_eq!(
            filter.target_group,
            TargetGroupFilter::Only(TargetGroup::Teens)
        );
        assert_eq!(filter.min_length, Some(120));
        assert_eq!(filter.max_current_queue_length, Some(20));
        assert_eq!(filter.is_open, OpenFilter::Open);
        assert_eq!(filter.tags, vec!["thrill", "water"]);
    }

    #[test]
    fn test_closed_sentinel() {
        let query = PoiQuery {
            is_open: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(query.into_filter().unwrap().is_open, OpenFilter::Closed);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let query = PoiQuery {
            type_category: Some("CASTLE".to_string()),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }

    #[test]
    fn test_malformed_number_rejected() {
        let query = PoiQuery {
            min_length: Some("tall".to_string()),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }
}
