use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use futures_util::StreamExt as _;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt as _;

use super::authed_user;
use crate::AppState;
use crate::models::DiaryResponse;
use crate::pipeline::NewDiary;

/// POST /api/diaries - create a diary from a multipart form carrying
/// either a `text` field or an `audio` file (not both).
async fn create_diary(
    data: web::Data<AppState>,
    req: HttpRequest,
    mut payload: Multipart,
) -> impl Responder {
    let user = match authed_user(&data, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let mut input = NewDiary::default();
    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Malformed multipart payload: {}", e)
                }));
            }
        };

        match field.name() {
            "text" => {
                let mut buf = Vec::new();
                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(bytes) => buf.extend_from_slice(&bytes),
                        Err(e) => {
                            return HttpResponse::BadRequest().json(serde_json::json!({
                                "error": format!("Failed to read text field: {}", e)
                            }));
                        }
                    }
                }
                match String::from_utf8(buf) {
                    Ok(text) => input.text = Some(text),
                    Err(_) => {
                        return HttpResponse::BadRequest().json(serde_json::json!({
                            "error": "Text field must be valid UTF-8"
                        }));
                    }
                }
            }
            "audio" => {
                let file_name = field
                    .content_disposition()
                    .get_filename()
                    .map(sanitize_filename)
                    .unwrap_or_else(|| "recording.ogg".to_string());
                match save_upload(&data.config.upload_dir, user.id, &file_name, &mut field).await {
                    Ok(path) => input.audio_path = Some(path),
                    Err(e) => {
                        log::error!("Failed to store audio upload: {}", e);
                        return HttpResponse::InternalServerError().json(serde_json::json!({
                            "error": "Failed to store audio upload"
                        }));
                    }
                }
            }
            // Unknown fields are drained and ignored
            _ => while field.next().await.is_some() {},
        }
    }

    match data.ingestor.ingest(user.id, input).await {
        Ok(diary) => HttpResponse::Ok().json(DiaryResponse::from(&diary)),
        Err(e) => e.http_response(),
    }
}

/// GET /api/diaries - the caller's diaries, newest first
async fn list_diaries(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match authed_user(&data, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match data.db.list_user_diaries(user.id) {
        Ok(diaries) => {
            let response: Vec<DiaryResponse> = diaries.iter().map(DiaryResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::error!("Failed to list diaries: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

/// Strip any path components from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "recording.ogg".to_string())
}

async fn save_upload(
    upload_dir: &str,
    user_id: i64,
    file_name: &str,
    field: &mut actix_multipart::Field,
) -> Result<PathBuf, String> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| format!("create upload dir: {}", e))?;

    let path = Path::new(upload_dir).join(format!("{}_{}", user_id, file_name));
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| format!("create file: {}", e))?;

    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| format!("read upload: {}", e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| format!("write upload: {}", e))?;
    }
    file.flush().await.map_err(|e| format!("flush upload: {}", e))?;

    Ok(path)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/diaries")
            .route("", web::post().to(create_diary))
            .route("", web::get().to(list_diaries)),
    );
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn filenames_lose_path_components() {
        assert_eq!(sanitize_filename("voice.ogg"), "voice.ogg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/tmp/x.ogg"), "x.ogg");
    }
}
