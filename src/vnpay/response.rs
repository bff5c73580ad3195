use crate::vnpay::params::{ParameterMap, RESPONSE_CODE, TRANSACTION_STATUS};
use crate::vnpay::signer::verify_signature;
use serde::Serialize;

pub const APPROVED: &str = "00";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Lỗi không xác định";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub signature_valid: bool,
    pub response_code: String,
    pub transaction_status: String,
    pub success: bool,
    pub message: String,
}

impl VerificationResult {
    pub fn is_accepted(&self) -> bool {
        self.signature_valid && self.success
    }
}

pub fn response_message(code: &str) -> Option<&'static str> {
    let message = match code {
        "00" => "Giao dịch thành công",
        "07" => "Trừ tiền thành công. Giao dịch bị nghi ngờ (liên quan tới lừa đảo, giao dịch bất thường).",
        "09" => "Giao dịch không thành công do: Thẻ/Tài khoản của khách hàng chưa đăng ký dịch vụ InternetBanking tại ngân hàng.",
        "10" => "Giao dịch không thành công do: Khách hàng xác thực thông tin thẻ/tài khoản không đúng quá 3 lần",
        "11" => "Giao dịch không thành công do: Đã hết hạn chờ thanh toán. Xin quý khách vui lòng thực hiện lại giao dịch.",
        "12" => "Giao dịch không thành công do: Thẻ/Tài khoản của khách hàng bị khóa.",
        "13" => "Giao dịch không thành công do Quý khách nhập sai mật khẩu xác thực giao dịch (OTP).",
        "24" => "Giao dịch không thành công do: Khách hàng hủy giao dịch",
        "51" => "Giao dịch không thành công do: Tài khoản của quý khách không đủ số dư để thực hiện giao dịch.",
        "65" => "Giao dịch không thành công do: Tài khoản của Quý khách đã vượt quá hạn mức giao dịch trong ngày.",
        "75" => "Ngân hàng thanh toán đang bảo trì.",
        "79" => "Giao dịch không thành công do: KH nhập sai mật khẩu thanh toán quá số lần quy định.",
        "99" => "Các lỗi khác",
        _ => return None,
    };
    Some(message)
}

// Codes only: signature_valid stays false until verify_and_interpret fills it.
pub fn interpret_response(received: &ParameterMap) -> VerificationResult {
    let response_code = received.get(RESPONSE_CODE).cloned().unwrap_or_default();
    let transaction_status = received.get(TRANSACTION_STATUS).cloned().unwrap_or_default();

    let message = match response_message(&response_code) {
        Some(m) => m,
        None => {
            tracing::warn!("unknown vnpay response code {:?}", response_code);
            UNKNOWN_ERROR_MESSAGE
        }
    };

    VerificationResult {
        signature_valid: false,
        success: response_code == APPROVED && transaction_status == APPROVED,
        response_code,
        transaction_status,
        message: message.to_string(),
    }
}

pub fn verify_and_interpret(received: &ParameterMap, secret: &str) -> VerificationResult {
    VerificationResult {
        signature_valid: verify_signature(received, secret),
        ..interpret_response(received)
    }
}
