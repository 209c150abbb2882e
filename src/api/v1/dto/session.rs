/*
 * Responsibility
 * - Response bodies for the session-related endpoints (/login, /me, /admin)
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginHintResponse {
    pub scheme: &'static str,
    pub header: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub subject: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminOverviewResponse {
    pub subject: String,
    pub granted_by: &'static str,
}
