use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "paid" => PaymentStatus::Paid,
            "failed" => PaymentStatus::Failed,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Refunded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpnAck {
    Success,
    OrderNotFound,
    AlreadyConfirmed,
    InvalidAmount,
    ChecksumFailed,
    PaymentFailed,
    UnknownError,
}

impl IpnAck {
    pub fn code(&self) -> &'static str {
        match self {
            IpnAck::Success => "00",
            IpnAck::OrderNotFound => "01",
            IpnAck::AlreadyConfirmed => "02",
            IpnAck::InvalidAmount => "04",
            IpnAck::ChecksumFailed => "97",
            IpnAck::PaymentFailed | IpnAck::UnknownError => "99",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            IpnAck::Success => "Success",
            IpnAck::OrderNotFound => "Order not found",
            IpnAck::AlreadyConfirmed => "Order already confirmed",
            IpnAck::InvalidAmount => "Invalid amount",
            IpnAck::ChecksumFailed => "Checksum failed",
            IpnAck::PaymentFailed => "Payment failed",
            IpnAck::UnknownError => "Unknown error",
        }
    }

    pub fn to_response(self) -> IpnResponse {
        IpnResponse {
            rsp_code: self.code().to_string(),
            message: self.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpnResponse {
    #[serde(rename = "RspCode")]
    pub rsp_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}
