//! Telegram WebApp init-data verification.
//!
//! Every API request carries the raw `initData` query string from the
//! Telegram WebApp in the `X-Telegram-Init-Data` header. The `hash` field
//! is an HMAC-SHA256 over the remaining fields (sorted, newline-joined)
//! keyed with HMAC-SHA256("WebAppData", bot_token).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify the `hash` signature of a raw init-data query string.
pub fn validate_init_data(init_data: &str, bot_token: &str) -> bool {
    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(init_data.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let received_hash = match pairs.iter().position(|(k, _)| k == "hash") {
        Some(idx) => pairs.remove(idx).1,
        None => return false,
    };
    let received_hash = match hex::decode(received_hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    pairs.sort();
    let data_check_string = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n");

    let mut secret = match HmacSha256::new_from_slice(b"WebAppData") {
        Ok(m) => m,
        Err(_) => return false,
    };
    secret.update(bot_token.as_bytes());
    let secret_key = secret.finalize().into_bytes();

    let mut mac = match HmacSha256::new_from_slice(&secret_key) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(data_check_string.as_bytes());

    // Constant-time comparison
    mac.verify_slice(&received_hash).is_ok()
}

/// Extract the Telegram user id from the `user` JSON field of init data.
pub fn extract_user_id(init_data: &str) -> Option<i64> {
    let user_json = url::form_urlencoded::parse(init_data.as_bytes())
        .find(|(k, _)| k == "user")
        .map(|(_, v)| v.into_owned())?;

    let user: serde_json::Value = serde_json::from_str(&user_json).ok()?;
    user.get("id").and_then(|id| id.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_TOKEN: &str = "123456:test-bot-token";

    /// Build a correctly signed init-data string from unsorted fields.
    fn signed_init_data(fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<_> = fields.to_vec();
        sorted.sort();
        let data_check_string = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("\n");

        let mut secret = HmacSha256::new_from_slice(b"WebAppData").unwrap();
        secret.update(BOT_TOKEN.as_bytes());
        let secret_key = secret.finalize().into_bytes();

        let mut mac = HmacSha256::new_from_slice(&secret_key).unwrap();
        mac.update(data_check_string.as_bytes());
        let hash = hex::encode(mac.finalize().into_bytes());

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in fields {
            serializer.append_pair(k, v);
        }
        serializer.append_pair("hash", &hash);
        serializer.finish()
    }

    #[test]
    fn accepts_correctly_signed_data() {
        let init_data = signed_init_data(&[
            ("user", r#"{"id":42,"first_name":"Ann"}"#),
            ("auth_date", "1700000000"),
            ("query_id", "AAA"),
        ]);
        assert!(validate_init_data(&init_data, BOT_TOKEN));
        assert_eq!(extract_user_id(&init_data), Some(42));
    }

    #[test]
    fn rejects_tampered_data() {
        let init_data = signed_init_data(&[
            ("user", r#"{"id":42}"#),
            ("auth_date", "1700000000"),
        ]);
        let tampered = init_data.replace("1700000000", "1700000001");
        assert!(!validate_init_data(&tampered, BOT_TOKEN));
    }

    #[test]
    fn rejects_wrong_token_and_missing_hash() {
        let init_data = signed_init_data(&[("user", r#"{"id":42}"#)]);
        assert!(!validate_init_data(&init_data, "other-token"));
        assert!(!validate_init_data("user=%7B%22id%22%3A42%7D", BOT_TOKEN));
    }

    #[test]
    fn extract_user_id_handles_malformed_user() {
        assert_eq!(extract_user_id("user=not-json"), None);
        assert_eq!(extract_user_id("auth_date=1"), None);
    }
}
