//! TC3-HMAC-SHA256 request signing for Tencent Cloud APIs

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

pub struct SigningInput<'a> {
    pub secret_id: &'a str,
    pub secret_key: &'a str,
    pub service: &'a str,
    pub host: &'a str,
    pub action: &'a str,
    pub payload: &'a str,
    pub timestamp: i64,
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// UTC date of the request, as used in the credential scope
fn scope_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}

pub fn canonical_request(input: &SigningInput<'_>) -> String {
    let canonical_headers = format!(
        "content-type:{}\nhost:{}\nx-tc-action:{}\n",
        CONTENT_TYPE,
        input.host,
        input.action.to_lowercase()
    );
    format!(
        "POST\n/\n\n{}\n{}\n{}",
        canonical_headers,
        SIGNED_HEADERS,
        sha256_hex(input.payload.as_bytes())
    )
}

/// Value of the `Authorization` header for `input`
pub fn authorization(input: &SigningInput<'_>) -> String {
    let date = scope_date(input.timestamp);
    let credential_scope = format!("{}/{}/tc3_request", date, input.service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        input.timestamp,
        credential_scope,
        sha256_hex(canonical_request(input).as_bytes())
    );

    let secret_date = hmac_sha256(format!("TC3{}", input.secret_key).as_bytes(), date.as_bytes());
    let secret_service = hmac_sha256(&secret_date, input.service.as_bytes());
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
    let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

    format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, input.secret_id, credential_scope, SIGNED_HEADERS, signature
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(payload: &str) -> SigningInput<'_> {
        SigningInput {
            secret_id: "AKIDEXAMPLE",
            secret_key: "secret",
            service: "ocr",
            host: "ocr.tencentcloudapi.com",
            action: "RecognizeGeneralInvoice",
            payload,
            timestamp: 1_764_417_600,
        }
    }

    #[test]
    fn hmac_matches_rfc4231_case_1() {
        let mac = hmac_sha256(&[0x0b; 20], b"Hi There");
        assert_eq!(
            hex::encode(mac),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn sha256_of_empty_payload() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn canonical_request_lowercases_action() {
        let canonical = canonical_request(&input("{}"));
        let lines: Vec<_> = canonical.lines().collect();
        assert_eq!(lines[0], "POST");
        assert_eq!(lines[1], "/");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "content-type:application/json; charset=utf-8");
        assert_eq!(lines[4], "host:ocr.tencentcloudapi.com");
        assert_eq!(lines[5], "x-tc-action:recognizegeneralinvoice");
        assert_eq!(lines[7], SIGNED_HEADERS);
    }

    #[test]
    fn authorization_is_deterministic_and_scoped() {
        let a = authorization(&input("{\"ImageUrl\":\"u\"}"));
        let b = authorization(&input("{\"ImageUrl\":\"u\"}"));
        assert_eq!(a, b);
        assert!(a.starts_with(
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2025-11-29/ocr/tc3_request, SignedHeaders=content-type;host;x-tc-action, Signature="
        ));
        let signature = a.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn payload_changes_signature() {
        assert_ne!(
            authorization(&input("{\"ImageUrl\":\"a\"}")),
            authorization(&input("{\"ImageUrl\":\"b\"}"))
        );
    }
}
