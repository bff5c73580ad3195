use crate::config::VnpayConfig;
use crate::vnpay::error::VnpayError;
use crate::vnpay::params::{self, encode_query, ParameterMap};
use crate::vnpay::signer::sign_envelope;
use chrono::{DateTime, Duration, FixedOffset, Utc};

pub const API_VERSION: &str = "2.1.0";
pub const PAY_COMMAND: &str = "pay";
pub const LOCALE_VN: &str = "vn";
pub const CURRENCY_VND: &str = "VND";
pub const ORDER_TYPE_OTHER: &str = "other";
pub const PAYMENT_TTL_MINUTES: i64 = 15;
pub const DEFAULT_CLIENT_IP: &str = "127.0.0.1";

const VNP_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub reference_id: String,
    // gateway units, display amount x 100
    pub amount: i64,
    pub description: String,
    pub client_ip: String,
    pub created_at: DateTime<FixedOffset>,
    pub expires_at: DateTime<FixedOffset>,
}

impl PaymentRequest {
    pub fn new(
        reference_id: &str,
        amount_major_units: f64,
        description: &str,
        client_ip: Option<&str>,
        now: DateTime<Utc>,
        config: &VnpayConfig,
    ) -> Result<Self, VnpayError> {
        validate_reference(reference_id)?;
        let amount = scale_amount(amount_major_units)?;
        let created_at = now.with_timezone(&config.utc_offset);
        let client_ip = client_ip
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .unwrap_or(DEFAULT_CLIENT_IP);

        Ok(Self {
            reference_id: reference_id.to_string(),
            amount,
            description: description.to_string(),
            client_ip: client_ip.to_string(),
            created_at,
            expires_at: created_at + Duration::minutes(PAYMENT_TTL_MINUTES),
        })
    }

    pub fn to_params(&self, config: &VnpayConfig) -> ParameterMap {
        [
            (params::VERSION, API_VERSION.to_string()),
            (params::COMMAND, PAY_COMMAND.to_string()),
            (params::TMN_CODE, config.tmn_code.clone()),
            (params::LOCALE, LOCALE_VN.to_string()),
            (params::CURR_CODE, CURRENCY_VND.to_string()),
            (params::TXN_REF, self.reference_id.clone()),
            (params::ORDER_INFO, self.description.clone()),
            (params::ORDER_TYPE, ORDER_TYPE_OTHER.to_string()),
            (params::AMOUNT, self.amount.to_string()),
            (params::RETURN_URL, config.return_url.clone()),
            (params::IP_ADDR, self.client_ip.clone()),
            (params::CREATE_DATE, format_vnp_date(&self.created_at)),
            (params::EXPIRE_DATE, format_vnp_date(&self.expires_at)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    pub fn signed_params(&self, config: &VnpayConfig) -> Result<ParameterMap, VnpayError> {
        sign_envelope(self.to_params(config), &config.hash_secret)
    }

    pub fn redirect_url(&self, config: &VnpayConfig) -> Result<String, VnpayError> {
        Ok(format!("{}?{}", config.pay_url, encode_query(&self.signed_params(config)?)))
    }
}

pub fn build_payment_request(
    reference_id: &str,
    amount_major_units: f64,
    description: &str,
    client_ip: Option<&str>,
    config: &VnpayConfig,
) -> Result<String, VnpayError> {
    build_payment_request_at(reference_id, amount_major_units, description, client_ip, config, Utc::now())
}

pub fn build_payment_request_at(
    reference_id: &str,
    amount_major_units: f64,
    description: &str,
    client_ip: Option<&str>,
    config: &VnpayConfig,
    now: DateTime<Utc>,
) -> Result<String, VnpayError> {
    config.validate()?;
    let request = PaymentRequest::new(reference_id, amount_major_units, description, client_ip, now, config)?;
    tracing::info!(
        "vnpay payment url created for {} (amount {})",
        request.reference_id,
        request.amount
    );
    request.redirect_url(config)
}

pub fn format_vnp_date(at: &DateTime<FixedOffset>) -> String {
    at.format(VNP_DATE_FORMAT).to_string()
}

pub fn scale_amount(amount_major_units: f64) -> Result<i64, VnpayError> {
    if !amount_major_units.is_finite() || amount_major_units <= 0.0 {
        return Err(VnpayError::InvalidAmount(format!(
            "amount must be a positive number, got {amount_major_units}"
        )));
    }

    // Shortest round-trip rendering, never rounded: 19.99 -> 1999, 19.9999999 -> 1999.
    let rendered = amount_major_units.to_string();
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let cents: String = fraction.chars().chain(std::iter::repeat('0')).take(2).collect();

    let scaled = format!("{whole}{cents}")
        .parse::<i64>()
        .map_err(|_| VnpayError::InvalidAmount(format!("amount out of range: {amount_major_units}")))?;
    if scaled <= 0 {
        return Err(VnpayError::InvalidAmount(format!(
            "amount {amount_major_units} is below the smallest gateway unit"
        )));
    }
    Ok(scaled)
}

fn validate_reference(reference_id: &str) -> Result<(), VnpayError> {
    if reference_id.is_empty() {
        return Err(VnpayError::InvalidReference("reference id is empty".to_string()));
    }
    if !reference_id.chars().all(|c| c.is_ascii_graphic()) {
        return Err(VnpayError::InvalidReference(format!(
            "reference id must be printable ascii without spaces: {reference_id:?}"
        )));
    }
    Ok(())
}
