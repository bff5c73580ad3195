use crate::vnpay::error::VnpayError;
use crate::vnpay::params::{sign_data, strip_signature, ParameterMap, SECURE_HASH};
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

fn mac_over(params: &ParameterMap, secret: &str) -> Result<HmacSha512, VnpayError> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| VnpayError::Configuration(format!("hash secret rejected: {}", e)))?;
    mac.update(sign_data(&strip_signature(params)).as_bytes());
    Ok(mac)
}

// Signature fields already present in `params` are left out of the digest.
pub fn sign(params: &ParameterMap, secret: &str) -> Result<String, VnpayError> {
    Ok(hex::encode(mac_over(params, secret)?.finalize().into_bytes()))
}

pub fn sign_envelope(mut params: ParameterMap, secret: &str) -> Result<ParameterMap, VnpayError> {
    let digest = sign(&params, secret)?;
    params.insert(SECURE_HASH.to_string(), digest);
    Ok(params)
}

// Hex case is ignored and the digest comparison is constant time.
pub fn verify_signature(received: &ParameterMap, secret: &str) -> bool {
    let Some(received_hash) = received.get(SECURE_HASH) else {
        return false;
    };
    let Ok(expected) = hex::decode(received_hash) else {
        return false;
    };
    let Ok(mac) = mac_over(received, secret) else {
        return false;
    };
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnpay::params::SECURE_HASH_TYPE;

    const SECRET: &str = "SECRETKEY123";

    fn sample() -> ParameterMap {
        [
            ("vnp_Amount", "15000000"),
            ("vnp_Command", "pay"),
            ("vnp_OrderInfo", "Thanh toán đơn hàng WS250101ABCDEF"),
            ("vnp_TmnCode", "DEMO0001"),
            ("vnp_TxnRef", "WS250101ABCDEF"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn digest_is_lowercase_sha512_hex() {
        let digest = sign(&sample(), SECRET).unwrap();
        assert_eq!(digest.len(), 128);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn any_key_length_is_accepted() {
        assert!(sign(&sample(), "").is_ok());
        assert!(sign(&sample(), &"k".repeat(300)).is_ok());
    }

    #[test]
    fn signed_envelope_verifies() {
        let signed = sign_envelope(sample(), SECRET).unwrap();
        assert!(verify_signature(&signed, SECRET));
    }

    #[test]
    fn wrong_secret_fails() {
        let signed = sign_envelope(sample(), SECRET).unwrap();
        assert!(!verify_signature(&signed, "OTHERSECRET"));
    }

    #[test]
    fn hash_type_field_is_not_signed() {
        let mut signed = sign_envelope(sample(), SECRET).unwrap();
        signed.insert(SECURE_HASH_TYPE.to_string(), "HmacSHA512".to_string());
        assert!(verify_signature(&signed, SECRET));
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let mut signed = sign_envelope(sample(), SECRET).unwrap();
        let upper = signed[SECURE_HASH].to_uppercase();
        signed.insert(SECURE_HASH.to_string(), upper);
        assert!(verify_signature(&signed, SECRET));
    }

    #[test]
    fn missing_or_garbage_hash_is_invalid() {
        assert!(!verify_signature(&sample(), SECRET));

        let mut garbage = sample();
        garbage.insert(SECURE_HASH.to_string(), "not-hex".to_string());
        assert!(!verify_signature(&garbage, SECRET));
    }

    #[test]
    fn every_single_character_mutation_is_detected() {
        let signed = sign_envelope(sample(), SECRET).unwrap();
        for key in sample().keys() {
            let mut tampered = signed.clone();
            let value = tampered.get_mut(key).unwrap();
            let mut chars: Vec<char> = value.chars().collect();
            chars[0] = if chars[0] == 'X' { 'Y' } else { 'X' };
            *value = chars.into_iter().collect();
            assert!(!verify_signature(&tampered, SECRET), "mutation of {key} went unnoticed");
        }
    }

    #[test]
    fn insertion_order_does_not_change_signature() {
        let forward = sample();
        let reversed: ParameterMap = sample().into_iter().rev().collect();
        assert_eq!(sign(&forward, SECRET).unwrap(), sign(&reversed, SECRET).unwrap());
    }
}
