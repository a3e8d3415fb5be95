use actix_web::{HttpRequest, HttpResponse, Responder, web};

use super::authed_user;
use crate::AppState;
use crate::models::ProfileResponse;

/// GET /api/profile - the caller's user record
async fn get_profile(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match authed_user(&data, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(ProfileResponse::from(&user))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/profile").route("", web::get().to(get_profile)));
}
