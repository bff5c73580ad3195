#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use vnpay_checkout::config::{VnpayConfig, DEFAULT_VNP_RETURN_URL, DEFAULT_VNP_URL};
use vnpay_checkout::domain::order::{GatewayPayment, Order};
use vnpay_checkout::domain::payment::PaymentStatus;
use vnpay_checkout::repo::orders_repo::{OrderStore, VNPAY_METHOD};
use vnpay_checkout::service::vnpay_service::VnpayService;
use vnpay_checkout::vnpay::{sign_envelope, ParameterMap};

pub const SECRET: &str = "SECRETKEY123";
pub const TMN_CODE: &str = "DEMO0001";

pub fn config() -> VnpayConfig {
    VnpayConfig::new(TMN_CODE, SECRET, DEFAULT_VNP_URL, DEFAULT_VNP_RETURN_URL).unwrap()
}

#[derive(Default)]
pub struct InMemoryOrders {
    orders: Mutex<HashMap<String, Order>>,
    paid_events: Mutex<Vec<String>>,
}

impl InMemoryOrders {
    pub fn with_order(order_number: &str, total_amount: i64) -> Arc<Self> {
        let store = Self::default();
        store.orders.lock().unwrap().insert(
            order_number.to_string(),
            Order {
                order_number: order_number.to_string(),
                total_amount,
                payment_method: "cod".to_string(),
                payment_status: PaymentStatus::Pending,
                paid_at: None,
                vnpay_transaction_no: None,
                vnpay_bank_code: None,
                vnpay_pay_date: None,
                payment_fail_reason: None,
            },
        );
        Arc::new(store)
    }

    pub fn set_status(&self, order_number: &str, status: PaymentStatus) {
        if let Some(order) = self.orders.lock().unwrap().get_mut(order_number) {
            order.payment_status = status;
        }
    }

    pub fn get(&self, order_number: &str) -> Option<Order> {
        self.orders.lock().unwrap().get(order_number).cloned()
    }

    pub fn paid_events(&self) -> Vec<String> {
        self.paid_events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryOrders {
    async fn find_by_order_number(&self, order_number: &str) -> anyhow::Result<Option<Order>> {
        Ok(self.get(order_number))
    }

    async fn mark_awaiting_vnpay(&self, order_number: &str) -> anyhow::Result<()> {
        if let Some(order) = self.orders.lock().unwrap().get_mut(order_number) {
            if !order.payment_status.is_final() {
                order.payment_method = VNPAY_METHOD.to_string();
                order.payment_status = PaymentStatus::Pending;
            }
        }
        Ok(())
    }

    async fn confirm_paid(&self, order_number: &str, payment: &GatewayPayment) -> anyhow::Result<bool> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.get_mut(order_number) else {
            return Ok(false);
        };
        if order.payment_status.is_final() {
            return Ok(false);
        }
        order.payment_status = PaymentStatus::Paid;
        order.paid_at = Some(chrono::Utc::now());
        order.vnpay_transaction_no = payment.transaction_no.clone();
        order.vnpay_bank_code = payment.bank_code.clone();
        order.vnpay_pay_date = payment.pay_date.clone();
        order.payment_fail_reason = None;
        self.paid_events.lock().unwrap().push(order_number.to_string());
        Ok(true)
    }

    async fn mark_failed(&self, order_number: &str, reason: &str) -> anyhow::Result<bool> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(order_number) {
            Some(order) if !order.payment_status.is_final() => {
                order.payment_status = PaymentStatus::Failed;
                order.payment_fail_reason = Some(reason.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub fn service(store: Arc<InMemoryOrders>) -> VnpayService {
    VnpayService {
        config: config(),
        orders: store,
    }
}

/// Callback parameters as the gateway would send them, signed with `SECRET`.
pub fn signed_callback(order_number: &str, amount: i64, response_code: &str, status: &str) -> ParameterMap {
    let params: ParameterMap = [
        ("vnp_Amount", amount.to_string()),
        ("vnp_BankCode", "NCB".to_string()),
        ("vnp_BankTranNo", "VNP14226112".to_string()),
        ("vnp_CardType", "ATM".to_string()),
        ("vnp_OrderInfo", format!("Thanh toán đơn hàng {}", order_number)),
        ("vnp_PayDate", "20250101103000".to_string()),
        ("vnp_ResponseCode", response_code.to_string()),
        ("vnp_TmnCode", TMN_CODE.to_string()),
        ("vnp_TransactionNo", "14226112".to_string()),
        ("vnp_TransactionStatus", status.to_string()),
        ("vnp_TxnRef", order_number.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    sign_envelope(params, SECRET).unwrap()
}
