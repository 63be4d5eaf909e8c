//! Point of Interest API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/pointOfInterest", get(handler::list))
        .route("/pointOfInterest/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/pointOfInterest", axum::routing::post(handler::create))
        .route(
            "/pointOfInterest/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    read_routes.merge(manage_routes)
}
