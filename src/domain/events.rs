use crate::domain::order::GatewayPayment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ORDER_PAID: &str = "order.paid";

// Consumers decrement inventory and send the confirmation email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPaidEvent {
    pub event_id: Uuid,
    pub order_number: String,
    pub total_amount: i64,
    pub payment_method: String,
    pub gateway_transaction_no: Option<String>,
    pub bank_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl OrderPaidEvent {
    pub fn new(order_number: &str, total_amount: i64, payment_method: &str, payment: &GatewayPayment) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            order_number: order_number.to_string(),
            total_amount,
            payment_method: payment_method.to_string(),
            gateway_transaction_no: payment.transaction_no.clone(),
            bank_code: payment.bank_code.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        ORDER_PAID
    }
}
