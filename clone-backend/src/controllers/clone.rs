use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;

use super::authed_user;
use crate::AppState;
use crate::models::CloneResponse;

/// GET /api/clone - the caller's clone, if one exists yet
async fn get_clone(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match authed_user(&data, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match data.db.get_clone_for_user(user.id) {
        Ok(Some(clone)) => HttpResponse::Ok().json(CloneResponse::from(&clone)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Clone not found. Create your first diary to create a clone."
        })),
        Err(e) => {
            log::error!("Clone lookup failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
}

/// POST /api/clone/ask - answer a question as the caller's clone
async fn ask_clone(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<AskRequest>,
) -> impl Responder {
    let user = match authed_user(&data, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let clone = match data.db.get_clone_for_user(user.id) {
        Ok(Some(clone)) => clone,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Clone not found"
            }));
        }
        Err(e) => {
            log::error!("Clone lookup failed: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    match data.query.ask(clone.id, &body.question).await {
        Ok(answer) => HttpResponse::Ok().json(serde_json::json!({ "answer": answer })),
        Err(e) => e.http_response(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/clone")
            .route("", web::get().to(get_clone))
            .route("/ask", web::post().to(ask_clone)),
    );
}
