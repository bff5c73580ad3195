use thiserror::Error;

// Bad signatures and unknown response codes are data on VerificationResult, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VnpayError {
    #[error("vnpay configuration error: {0}")]
    Configuration(String),
    #[error("invalid payment amount: {0}")]
    InvalidAmount(String),
    #[error("invalid payment reference: {0}")]
    InvalidReference(String),
}
