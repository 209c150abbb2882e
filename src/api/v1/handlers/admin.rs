/*
 * Responsibility
 * - GET /admin (requires the `admin` role; the gate has already checked it)
 */
use axum::Json;

use crate::api::v1::{dto::session::AdminOverviewResponse, extractors::AuthCtxExtractor};

pub async fn admin_overview(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<AdminOverviewResponse> {
    Json(AdminOverviewResponse {
        subject: ctx.subject,
        granted_by: "admin",
    })
}
