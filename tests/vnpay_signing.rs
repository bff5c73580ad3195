mod common;

use chrono::{NaiveDateTime, TimeZone, Utc};
use common::{config, SECRET};
use vnpay_checkout::vnpay::params::{AMOUNT, CREATE_DATE, EXPIRE_DATE, ORDER_INFO, SECURE_HASH};
use vnpay_checkout::vnpay::{build_payment_request, build_payment_request_at, sign, verify_signature, ParameterMap, VnpayError};

fn query_params(url: &str) -> ParameterMap {
    let parsed = url::Url::parse(url).unwrap();
    parsed.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}

#[test]
fn redirect_url_round_trips_through_verification() {
    let url = build_payment_request(
        "WS250101ABCDEF",
        150000.0,
        "Thanh toán đơn hàng WS250101ABCDEF",
        Some("203.0.113.7"),
        &config(),
    )
    .unwrap();

    assert!(url.starts_with("https://sandbox.vnpayment.vn/paymentv2/vpcpay.html?"));
    let params = query_params(&url);
    assert!(verify_signature(&params, SECRET));
    assert_eq!(params[ORDER_INFO], "Thanh toán đơn hàng WS250101ABCDEF");
}

#[test]
fn display_amount_is_scaled_by_one_hundred() {
    let url = build_payment_request("WS250101ABCDEF", 150000.0, "order", None, &config()).unwrap();
    assert_eq!(query_params(&url)[AMOUNT], "15000000");
}

#[test]
fn expiry_is_fifteen_minutes_after_creation() {
    let now = Utc.with_ymd_and_hms(2025, 12, 31, 16, 50, 0).unwrap();
    let url = build_payment_request_at("WS1", 1000.0, "order", None, &config(), now).unwrap();
    let params = query_params(&url);

    assert_eq!(params[CREATE_DATE], "20251231235000");
    assert_eq!(params[EXPIRE_DATE], "20260101000500");

    let created = NaiveDateTime::parse_from_str(&params[CREATE_DATE], "%Y%m%d%H%M%S").unwrap();
    let expires = NaiveDateTime::parse_from_str(&params[EXPIRE_DATE], "%Y%m%d%H%M%S").unwrap();
    assert_eq!(expires - created, chrono::Duration::minutes(15));
}

#[test]
fn any_value_mutation_breaks_the_signature() {
    let url = build_payment_request("WS1", 1000.0, "Thanh toán", None, &config()).unwrap();
    let params = query_params(&url);

    for key in params.keys().filter(|k| k.as_str() != SECURE_HASH) {
        let mut tampered = params.clone();
        tampered.get_mut(key).unwrap().push('0');
        assert!(!verify_signature(&tampered, SECRET), "{key} mutation verified");
    }
}

#[test]
fn signature_ignores_input_order() {
    let pairs = vec![
        ("vnp_TxnRef", "WS1"),
        ("vnp_Amount", "100000"),
        ("vnp_Command", "pay"),
        ("vnp_OrderInfo", "Thanh toán"),
    ];
    let forward: ParameterMap = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let backward: ParameterMap = pairs.iter().rev().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    assert_eq!(sign(&forward, SECRET).unwrap(), sign(&backward, SECRET).unwrap());
}

#[test]
fn merchants_with_different_secrets_do_not_cross_verify() {
    let other = vnpay_checkout::config::VnpayConfig::new(
        "OTHER001",
        "ANOTHERSECRET",
        vnpay_checkout::config::DEFAULT_VNP_URL,
        vnpay_checkout::config::DEFAULT_VNP_RETURN_URL,
    )
    .unwrap();
    let url = build_payment_request("WS1", 1000.0, "order", None, &other).unwrap();
    let params = query_params(&url);

    assert!(verify_signature(&params, "ANOTHERSECRET"));
    assert!(!verify_signature(&params, SECRET));
}

#[test]
fn invalid_amount_is_rejected_before_building() {
    let err = build_payment_request("WS1", 0.0, "order", None, &config()).unwrap_err();
    assert!(matches!(err, VnpayError::InvalidAmount(_)));
}

#[test]
fn blank_secret_is_a_configuration_error() {
    let mut cfg = config();
    cfg.hash_secret.clear();
    let err = build_payment_request("WS1", 1000.0, "order", None, &cfg).unwrap_err();
    assert!(matches!(err, VnpayError::Configuration(_)));
}
