use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};

use super::authed_telegram_id;
use crate::AppState;
use crate::models::{OnboardingAnswer, UpdateUserRequest};

#[derive(Debug, Serialize)]
struct OnboardingStatusResponse {
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_step: Option<&'static str>,
}

/// GET /api/onboarding/status
async fn get_status(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let telegram_id = match authed_telegram_id(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let user = match data.db.get_user_by_telegram_id(telegram_id) {
        Ok(user) => user,
        Err(e) => {
            log::error!("User lookup failed: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    match user {
        None => HttpResponse::Ok().json(OnboardingStatusResponse {
            completed: false,
            current_step: Some("welcome"),
        }),
        Some(user) => HttpResponse::Ok().json(OnboardingStatusResponse {
            completed: user.onboarding_completed,
            current_step: if user.onboarding_completed { None } else { Some("name") },
        }),
    }
}

/// POST /api/onboarding/answer - save one onboarding answer and report the
/// next question. The user row is created lazily on the first answer.
async fn save_answer(
    data: web::Data<AppState>,
    req: HttpRequest,
    answer: web::Json<OnboardingAnswer>,
) -> impl Responder {
    let telegram_id = match authed_telegram_id(&data, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let user = match data.db.get_or_create_user(telegram_id) {
        Ok(user) => user,
        Err(e) => {
            log::error!("Failed to get or create user: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    let mut update = UpdateUserRequest::default();
    match answer.field.as_str() {
        "name" => update.first_name = Some(answer.value.clone()),
        "age" => match answer.value.parse::<i64>() {
            Ok(age) => update.age = Some(age),
            Err(_) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Invalid age"
                }));
            }
        },
        "city" => update.city = Some(answer.value.clone()),
        "gender" => update.gender = Some(answer.value.clone()),
        other => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Unknown onboarding field: {}", other)
            }));
        }
    }

    let user = match data.db.update_user(user.id, &update) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "User not found"
            }));
        }
        Err(e) => {
            log::error!("Failed to update user: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    let next_field = user.next_onboarding_field();
    let completed = next_field.is_none();
    if completed && !user.onboarding_completed {
        if let Err(e) = data.db.set_onboarding_completed(user.id) {
            log::error!("Failed to mark onboarding complete: {}", e);
        }
    }

    HttpResponse::Ok().json(serde_json::json!({
        "status": "saved",
        "next_field": next_field,
        "completed": completed
    }))
}

#[derive(Debug, Deserialize)]
struct GuessGenderQuery {
    name: String,
}

/// GET /api/onboarding/guess-gender?name= - completion-backed utility used
/// by the onboarding flow to pre-fill the gender question.
async fn guess_gender(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<GuessGenderQuery>,
) -> impl Responder {
    if let Err(resp) = authed_telegram_id(&data, &req) {
        return resp;
    }

    match data.ai.guess_gender(&query.name).await {
        Ok(gender) => HttpResponse::Ok().json(serde_json::json!({ "gender": gender })),
        Err(e) => {
            log::error!("Gender guess failed: {}", e);
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Upstream service failure"
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/onboarding")
            .route("/status", web::get().to(get_status))
            .route("/answer", web::post().to(save_answer))
            .route("/guess-gender", web::get().to(guess_gender)),
    );
}
