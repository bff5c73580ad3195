use crate::http::handlers::{ops, vnpay};
use crate::AppState;
use axum::routing::get;
use axum::Router;

pub fn router(state: AppState) -> Router {
    let vnpay_routes = Router::new()
        .route("/create-payment", get(vnpay::create_payment))
        .route("/return", get(vnpay::vnpay_return))
        .route("/ipn", get(vnpay::vnpay_ipn));

    Router::new()
        .route("/health", get(ops::health))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .nest("/vnpay", vnpay_routes)
        .with_state(state)
}
