pub mod error;
pub mod params;
pub mod request;
pub mod response;
pub mod signer;

pub use error::VnpayError;
pub use params::ParameterMap;
pub use request::{build_payment_request, build_payment_request_at, PaymentRequest};
pub use response::{interpret_response, verify_and_interpret, VerificationResult};
pub use signer::{sign, sign_envelope, verify_signature};
