use crate::config::VnpayConfig;
use crate::domain::order::{GatewayPayment, Order};
use crate::domain::payment::{IpnAck, PaymentStatus};
use crate::repo::orders_repo::OrderStore;
use crate::vnpay::params::{ParameterMap, TXN_REF};
use crate::vnpay::request::build_payment_request;
use crate::vnpay::response::verify_and_interpret;
use crate::vnpay::VnpayError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("order {0} not found")]
    OrderNotFound(String),
    #[error("order {0} is already paid")]
    AlreadyPaid(String),
    #[error("order {0} was refunded")]
    Refunded(String),
    #[error(transparent)]
    Gateway(#[from] VnpayError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CheckoutError::OrderNotFound(_) => "Không tìm thấy đơn hàng",
            CheckoutError::AlreadyPaid(_) => "Đơn hàng đã được thanh toán",
            CheckoutError::Refunded(_) => REFUNDED_MESSAGE,
            CheckoutError::Gateway(_) | CheckoutError::Internal(_) => "Có lỗi xảy ra khi tạo thanh toán",
        }
    }
}

const REFUNDED_MESSAGE: &str = "Đơn hàng đã được hoàn tiền";
pub const AMOUNT_MISMATCH_MESSAGE: &str = "Số tiền thanh toán không khớp với đơn hàng";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    Paid { order_number: String },
    Failed { order_number: String, reason: String },
    Refunded { order_number: String },
    InvalidSignature,
    OrderNotFound,
}

impl ReturnOutcome {
    pub fn redirect_target(&self) -> String {
        match self {
            ReturnOutcome::Paid { order_number } => format!("/orders/success/{}", order_number),
            ReturnOutcome::Failed { reason, .. } => {
                with_error("/cart", &format!("Thanh toán thất bại: {}", reason))
            }
            ReturnOutcome::Refunded { .. } => with_error("/", REFUNDED_MESSAGE),
            ReturnOutcome::InvalidSignature => with_error("/", "Chữ ký không hợp lệ"),
            ReturnOutcome::OrderNotFound => with_error("/", "Không tìm thấy đơn hàng"),
        }
    }
}

pub fn with_error(path: &str, message: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("error", message)
        .finish();
    format!("{}?{}", path, query)
}

#[derive(Clone)]
pub struct VnpayService {
    pub config: VnpayConfig,
    pub orders: Arc<dyn OrderStore>,
}

impl VnpayService {
    pub async fn create_payment_url(&self, order_number: &str, client_ip: Option<&str>) -> Result<String, CheckoutError> {
        let order = self
            .orders
            .find_by_order_number(order_number)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_number.to_string()))?;

        match order.payment_status {
            PaymentStatus::Paid => return Err(CheckoutError::AlreadyPaid(order.order_number)),
            PaymentStatus::Refunded => return Err(CheckoutError::Refunded(order.order_number)),
            PaymentStatus::Pending | PaymentStatus::Failed => {}
        }

        let url = build_payment_request(
            &order.order_number,
            order.total_amount as f64,
            &order.payment_description(),
            client_ip,
            &self.config,
        )?;

        self.orders.mark_awaiting_vnpay(&order.order_number).await?;
        Ok(url)
    }

    pub async fn handle_return(&self, params: &ParameterMap) -> anyhow::Result<ReturnOutcome> {
        let result = verify_and_interpret(params, &self.config.hash_secret);
        if !result.signature_valid {
            tracing::warn!("vnpay return with invalid signature for {:?}", params.get(TXN_REF));
            return Ok(ReturnOutcome::InvalidSignature);
        }

        let Some(order_number) = params.get(TXN_REF) else {
            return Ok(ReturnOutcome::OrderNotFound);
        };
        let Some(order) = self.orders.find_by_order_number(order_number).await? else {
            return Ok(ReturnOutcome::OrderNotFound);
        };

        let payment = GatewayPayment::from_params(params);
        if !amount_matches(&order, &payment) {
            return Ok(ReturnOutcome::Failed {
                order_number: order.order_number,
                reason: AMOUNT_MISMATCH_MESSAGE.to_string(),
            });
        }

        // A callback for an order that already settled reports the settled state.
        if order.payment_status.is_final() {
            return Ok(settled_outcome(order));
        }

        if result.success {
            if self.orders.confirm_paid(&order.order_number, &payment).await? {
                tracing::info!("vnpay return confirmed payment for {}", order.order_number);
                return Ok(ReturnOutcome::Paid {
                    order_number: order.order_number,
                });
            }
            // The IPN got there first; report whatever it settled on.
            let current = self.orders.find_by_order_number(&order.order_number).await?;
            return Ok(settled_outcome(current.unwrap_or(order)));
        }

        self.orders.mark_failed(&order.order_number, &result.message).await?;
        tracing::info!(
            "vnpay return for {}: failed with code {}",
            order.order_number,
            result.response_code
        );
        Ok(ReturnOutcome::Failed {
            order_number: order.order_number,
            reason: result.message,
        })
    }

    // Never fails: infrastructure errors are reported to the gateway as 99.
    pub async fn handle_ipn(&self, params: &ParameterMap) -> IpnAck {
        match self.process_ipn(params).await {
            Ok(ack) => ack,
            Err(e) => {
                tracing::error!("vnpay ipn error: {}", e);
                IpnAck::UnknownError
            }
        }
    }

    async fn process_ipn(&self, params: &ParameterMap) -> anyhow::Result<IpnAck> {
        let result = verify_and_interpret(params, &self.config.hash_secret);
        if !result.signature_valid {
            tracing::warn!("vnpay ipn with invalid signature for {:?}", params.get(TXN_REF));
            return Ok(IpnAck::ChecksumFailed);
        }

        let Some(order_number) = params.get(TXN_REF) else {
            return Ok(IpnAck::OrderNotFound);
        };
        let Some(order) = self.orders.find_by_order_number(order_number).await? else {
            return Ok(IpnAck::OrderNotFound);
        };

        let payment = GatewayPayment::from_params(params);
        if !amount_matches(&order, &payment) {
            return Ok(IpnAck::InvalidAmount);
        }

        if order.payment_status.is_final() {
            return Ok(IpnAck::AlreadyConfirmed);
        }

        if result.success {
            if !self.orders.confirm_paid(&order.order_number, &payment).await? {
                // Lost the race against the return redirect.
                return Ok(IpnAck::AlreadyConfirmed);
            }
            tracing::info!("vnpay ipn confirmed payment for {}", order.order_number);
            return Ok(IpnAck::Success);
        }

        self.orders.mark_failed(&order.order_number, &result.message).await?;
        tracing::info!(
            "vnpay ipn recorded failure for {}: code {}",
            order.order_number,
            result.response_code
        );
        Ok(IpnAck::PaymentFailed)
    }
}

fn amount_matches(order: &Order, payment: &GatewayPayment) -> bool {
    let expected = order.gateway_amount();
    let ok = payment.amount.is_some() && payment.amount == expected;
    if !ok {
        tracing::warn!(
            "vnpay amount mismatch for {}: got {:?}, expected {:?}",
            order.order_number,
            payment.amount,
            expected
        );
    }
    ok
}

fn settled_outcome(order: Order) -> ReturnOutcome {
    match order.payment_status {
        PaymentStatus::Refunded => ReturnOutcome::Refunded {
            order_number: order.order_number,
        },
        PaymentStatus::Failed => ReturnOutcome::Failed {
            reason: order.payment_fail_reason.unwrap_or_default(),
            order_number: order.order_number,
        },
        PaymentStatus::Paid | PaymentStatus::Pending => ReturnOutcome::Paid {
            order_number: order.order_number,
        },
    }
}
