//! Tags API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::poi as poi_repo;
use crate::utils::AppResult;

/// GET /tags - 去重后的标签集合 (用于过滤界面)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let tags = poi_repo::list_distinct_tags(&state.pool).await?;
    Ok(Json(tags))
}
