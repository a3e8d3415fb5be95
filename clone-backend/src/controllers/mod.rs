pub mod clone;
pub mod diaries;
pub mod health;
pub mod onboarding;
pub mod profile;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::models::User;
use crate::security;

pub(crate) const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// Verify the Telegram init-data header and return the caller's Telegram id.
pub(crate) fn authed_telegram_id(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<i64, HttpResponse> {
    let init_data = match req.headers().get(INIT_DATA_HEADER).and_then(|h| h.to_str().ok()) {
        Some(data) => data,
        None => {
            return Err(HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Missing X-Telegram-Init-Data header"
            })));
        }
    };

    if !security::validate_init_data(init_data, &state.config.telegram_bot_token) {
        return Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid Telegram init data"
        })));
    }

    security::extract_user_id(init_data).ok_or_else(|| {
        HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Could not extract user ID"
        }))
    })
}

/// Like `authed_telegram_id`, but also requires an existing user record.
pub(crate) fn authed_user(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<User, HttpResponse> {
    let telegram_id = authed_telegram_id(state, req)?;
    match state.db.get_user_by_telegram_id(telegram_id) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": "User not found"
        }))),
        Err(e) => {
            log::error!("User lookup failed: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })))
        }
    }
}
