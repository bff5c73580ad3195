use crate::http::client_ip::resolve_client_ip;
use crate::service::vnpay_service::{with_error, CheckoutError};
use crate::vnpay::params::parse_query;
use crate::AppState;
use axum::extract::{ConnectInfo, Query, RawQuery, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentQuery {
    #[serde(rename = "orderId")]
    pub order_id: String,
}

pub async fn create_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Query(query): Query<CreatePaymentQuery>,
) -> impl IntoResponse {
    let client_ip = resolve_client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    match state
        .vnpay_service
        .create_payment_url(&query.order_id, client_ip.as_deref())
        .await
    {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            match &e {
                CheckoutError::Internal(_) | CheckoutError::Gateway(_) => {
                    tracing::error!("vnpay create payment failed for {}: {}", query.order_id, e)
                }
                _ => tracing::warn!("vnpay create payment rejected for {}: {}", query.order_id, e),
            }
            Redirect::to(&with_error("/cart", e.user_message())).into_response()
        }
    }
}

pub async fn vnpay_return(State(state): State<AppState>, RawQuery(raw): RawQuery) -> impl IntoResponse {
    let params = parse_query(raw.as_deref().unwrap_or_default());
    match state.vnpay_service.handle_return(&params).await {
        Ok(outcome) => Redirect::to(&outcome.redirect_target()).into_response(),
        Err(e) => {
            tracing::error!("vnpay return error: {}", e);
            Redirect::to(&with_error("/", "Có lỗi xảy ra")).into_response()
        }
    }
}

// Always 200: the gateway only looks at RspCode.
pub async fn vnpay_ipn(State(state): State<AppState>, RawQuery(raw): RawQuery) -> impl IntoResponse {
    let params = parse_query(raw.as_deref().unwrap_or_default());
    let ack = state.vnpay_service.handle_ipn(&params).await;
    (axum::http::StatusCode::OK, Json(ack.to_response()))
}
