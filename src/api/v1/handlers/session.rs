/*
 * Responsibility
 * - GET /login (anonymous only; the gate answers 409 to authenticated callers)
 * - GET /me    (authenticated only)
 */
use axum::Json;

use crate::api::v1::{
    dto::session::{LoginHintResponse, WhoAmIResponse},
    extractors::AuthCtxExtractor,
};

pub async fn login() -> Json<LoginHintResponse> {
    Json(LoginHintResponse {
        scheme: "Bearer",
        header: "Authorization",
    })
}

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        subject: ctx.subject,
        roles: ctx.roles,
    })
}
