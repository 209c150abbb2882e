/*
 * Responsibility
 * - v1 URL layout
 * - Which access requirement guards which route:
 *   - /health  public
 *   - /login   unauthenticated only
 *   - /me      authenticated
 *   - /admin   role `admin`
 * - A misconfigured gate surfaces here, while the router is built at startup
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    admin::admin_overview,
    health::health,
    session::{login, me},
};
use crate::gate::{GateError, Requirement};
use crate::middleware::auth::gate;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Result<Router<AppState>, GateError> {
    let access = &state.gate;

    let guest = gate::apply(
        Router::new().route("/login", get(login)),
        access.guard(Requirement::Unauthenticated)?,
    );

    let member = gate::apply(
        Router::new().route("/me", get(me)),
        access.guard(Requirement::Authenticated)?,
    );

    let admin = gate::apply(
        Router::new().route("/admin", get(admin_overview)),
        access.guard(Requirement::capabilities(["admin"]))?,
    );

    Ok(Router::new()
        .route("/health", get(health))
        .merge(guest)
        .merge(member)
        .merge(admin))
}
