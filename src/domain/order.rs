use crate::domain::payment::PaymentStatus;
use crate::vnpay::params::{ParameterMap, AMOUNT, BANK_CODE, PAY_DATE, TRANSACTION_NO};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub order_number: String,
    // whole VND
    pub total_amount: i64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub vnpay_transaction_no: Option<String>,
    pub vnpay_bank_code: Option<String>,
    pub vnpay_pay_date: Option<String>,
    pub payment_fail_reason: Option<String>,
}

impl Order {
    pub fn payment_description(&self) -> String {
        format!("Thanh toan don hang {}", self.order_number)
    }

    pub fn gateway_amount(&self) -> Option<i64> {
        self.total_amount.checked_mul(100)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatewayPayment {
    pub transaction_no: Option<String>,
    pub bank_code: Option<String>,
    pub pay_date: Option<String>,
    pub amount: Option<i64>,
}

impl GatewayPayment {
    pub fn from_params(params: &ParameterMap) -> Self {
        Self {
            transaction_no: params.get(TRANSACTION_NO).cloned(),
            bank_code: params.get(BANK_CODE).cloned(),
            pay_date: params.get(PAY_DATE).cloned(),
            amount: params.get(AMOUNT).and_then(|a| a.parse::<i64>().ok()),
        }
    }
}
