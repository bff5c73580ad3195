use std::collections::BTreeMap;
use url::form_urlencoded;

// BTreeMap keeps keys in byte order, the order the gateway signs in.
pub type ParameterMap = BTreeMap<String, String>;

pub const VERSION: &str = "vnp_Version";
pub const COMMAND: &str = "vnp_Command";
pub const TMN_CODE: &str = "vnp_TmnCode";
pub const LOCALE: &str = "vnp_Locale";
pub const CURR_CODE: &str = "vnp_CurrCode";
pub const TXN_REF: &str = "vnp_TxnRef";
pub const AMOUNT: &str = "vnp_Amount";
pub const ORDER_INFO: &str = "vnp_OrderInfo";
pub const ORDER_TYPE: &str = "vnp_OrderType";
pub const RETURN_URL: &str = "vnp_ReturnUrl";
pub const IP_ADDR: &str = "vnp_IpAddr";
pub const CREATE_DATE: &str = "vnp_CreateDate";
pub const EXPIRE_DATE: &str = "vnp_ExpireDate";

pub const RESPONSE_CODE: &str = "vnp_ResponseCode";
pub const TRANSACTION_STATUS: &str = "vnp_TransactionStatus";
pub const TRANSACTION_NO: &str = "vnp_TransactionNo";
pub const BANK_CODE: &str = "vnp_BankCode";
pub const PAY_DATE: &str = "vnp_PayDate";

pub const SECURE_HASH: &str = "vnp_SecureHash";
pub const SECURE_HASH_TYPE: &str = "vnp_SecureHashType";

pub fn strip_signature(params: &ParameterMap) -> ParameterMap {
    params
        .iter()
        .filter(|(k, _)| k.as_str() != SECURE_HASH && k.as_str() != SECURE_HASH_TYPE)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// Values are not URL-encoded in the sign string.
pub fn sign_data(params: &ParameterMap) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn encode_query(params: &ParameterMap) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

// First occurrence of a repeated key wins.
pub fn parse_query(raw: &str) -> ParameterMap {
    let mut params = ParameterMap::new();
    for (k, v) in form_urlencoded::parse(raw.as_bytes()) {
        params.entry(k.into_owned()).or_insert_with(|| v.into_owned());
    }
    params
}
