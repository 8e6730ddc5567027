pub mod auth;
pub mod handlers;

use axum::routing::get;
use axum::{middleware, Router};

use self::auth::admin_auth_middleware;
use self::handlers::{get_settings, get_status, put_setting};
use crate::http::server::AppState;

pub fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/settings", get(get_settings).put(put_setting))
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
