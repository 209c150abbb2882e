/*
 * Responsibility
 * - middleware public surface
 *   - auth::access (bearer token → AuthCtx), auth::gate (access gate per route)
 *   - cors, http (request id / trace / limits), security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
