//! Factory: build the HTTP access gate from application `Config`.
//!
//! The predicates only read the `AuthCtx` that `middleware::auth::access`
//! placed in request extensions. The failure handlers overwrite the response
//! sink with the matching `AppError`.

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::AuthCtx;
use crate::config::NotAuthorizedMode;
use crate::error::AppError;
use crate::gate::{Capability, Gate, GateError, Guard};

pub type HttpGate = Gate<Response, Request<Body>>;
pub type HttpGuard = Guard<Response, Request<Body>>;

pub fn build_access_gate(mode: NotAuthorizedMode) -> Result<HttpGate, GateError> {
    let builder = HttpGate::builder(is_authenticated, auth_required, auth_prohibited)
        .has_capability(has_roles)
        .require_capability_gating();

    let builder = match mode {
        NotAuthorizedMode::Dedicated => builder.on_not_authorized(not_authorized),
        NotAuthorizedMode::Fallback => builder,
    };

    builder.build()
}

fn is_authenticated(req: &Request<Body>) -> bool {
    req.extensions().get::<AuthCtx>().is_some()
}

/// Every listed role must be held.
fn has_roles(req: &Request<Body>, capabilities: &[Capability]) -> bool {
    req.extensions()
        .get::<AuthCtx>()
        .is_some_and(|ctx| capabilities.iter().all(|cap| ctx.has_role(cap.as_str())))
}

fn auth_required(res: &mut Response, _req: &Request<Body>) {
    *res = AppError::Unauthorized.into_response();
}

fn not_authorized(res: &mut Response, req: &Request<Body>) {
    if let Some(ctx) = req.extensions().get::<AuthCtx>() {
        tracing::info!(subject = %ctx.subject, path = %req.uri().path(), "missing role");
    }
    *res = AppError::Forbidden.into_response();
}

fn auth_prohibited(res: &mut Response, _req: &Request<Body>) {
    *res = AppError::AlreadyAuthenticated.into_response();
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::gate::{Decision, DenialPolicy, Requirement};

    fn request(ctx: Option<AuthCtx>) -> Request<Body> {
        let mut req = Request::builder()
            .uri("/admin")
            .body(Body::empty())
            .unwrap();
        if let Some(ctx) = ctx {
            req.extensions_mut().insert(ctx);
        }
        req
    }

    fn denied_status(guard: &HttpGuard, req: &Request<Body>) -> Option<StatusCode> {
        match guard.evaluate(req) {
            Decision::Allow => None,
            Decision::Deny(denial) => {
                let mut res = Response::default();
                guard.deny(denial, &mut res, req);
                Some(res.status())
            }
        }
    }

    #[test]
    fn mode_selects_denial_policy() {
        let dedicated = build_access_gate(NotAuthorizedMode::Dedicated).unwrap();
        let fallback = build_access_gate(NotAuthorizedMode::Fallback).unwrap();

        assert_eq!(dedicated.denial_policy(), DenialPolicy::Dedicated);
        assert_eq!(
            fallback.denial_policy(),
            DenialPolicy::FallbackToAuthRequired
        );
    }

    #[test]
    fn role_check_requires_every_listed_role() {
        let gate = build_access_gate(NotAuthorizedMode::Dedicated).unwrap();
        let guard = gate
            .guard(Requirement::capabilities(["admin", "ops"]))
            .unwrap();

        let admin_only = AuthCtx::new("alice", vec!["admin".into()]);
        let both = AuthCtx::new("alice", vec!["ops".into(), "admin".into()]);

        assert_eq!(
            denied_status(&guard, &request(Some(admin_only))),
            Some(StatusCode::FORBIDDEN)
        );
        assert_eq!(denied_status(&guard, &request(Some(both))), None);
        assert_eq!(
            denied_status(&guard, &request(None)),
            Some(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn fallback_mode_answers_missing_role_with_401() {
        let gate = build_access_gate(NotAuthorizedMode::Fallback).unwrap();
        let guard = gate.guard(Requirement::capabilities(["admin"])).unwrap();

        let member = AuthCtx::new("bob", Vec::new());
        assert_eq!(
            denied_status(&guard, &request(Some(member))),
            Some(StatusCode::UNAUTHORIZED)
        );
    }
}
