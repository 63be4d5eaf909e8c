//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录接口 (签发管理员 JWT)
//! - [`poi`] - Point of Interest 管理接口
//! - [`tags`] - 标签列表接口
//!
//! The WebSocket push channel endpoint lives in [`crate::message::ws`]
//! and is merged here alongside the REST routes.

pub mod convert;

pub mod auth;
pub mod health;
pub mod poi;
pub mod tags;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;
use crate::message::ws;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn app(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(poi::router(&state))
        .merge(tags::router())
        .merge(ws::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
