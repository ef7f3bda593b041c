use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use serde_json::json;

use super::error::Res;

/// Builders for the `{"success": true, ...}` response envelope every
/// endpoint uses. Failures go through `AppError` instead.
pub struct Success;
impl Success {
    pub fn created<T: Serialize>(message: &str, data: T) -> Res<impl Responder> {
        Result::Ok(
            HttpResponse::Created()
                .json(json!({ "success": true, "message": message, "data": data })),
        )
    }
    pub fn ok<T: Serialize>(message: &str, data: T) -> Res<impl Responder> {
        Result::Ok(
            HttpResponse::Ok().json(json!({ "success": true, "message": message, "data": data })),
        )
    }
    pub fn data<T: Serialize>(data: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
    }
    pub fn message(message: &str) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(json!({ "success": true, "message": message })))
    }
}
