//! Bearer token → AuthCtx in request extensions.
//!
//! Never rejects: an anonymous request simply carries no AuthCtx, and the
//! access gate on each route decides what that means.
//!
//! Example:
//! ```ignore
//! let v1 = api::v1::routes(&state)?;
//! let v1 = middleware::auth::access::apply(v1, state.clone());
//! app = app.nest("/api/v1", v1);
//! ```

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn can't take a State extractor in axum 0.8, so hand the state over explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let principal = bearer_token(req.headers()).map(|token| state.tokens.lookup(token));

    match principal {
        Some(Some(principal)) => {
            tracing::debug!(subject = %principal.subject, "bearer token accepted");
            req.extensions_mut().insert(AuthCtx::from(principal));
        }
        Some(None) => tracing::warn!("unknown bearer token"),
        None => {}
    }

    next.run(req).await
}

/// Auth scheme names are case-insensitive (`bearer`, `BEARER` are accepted too).
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer s3cret")), Some("s3cret"));
    }

    #[test]
    fn scheme_name_is_case_insensitive() {
        assert_eq!(bearer_token(&headers("bearer s3cret")), Some("s3cret"));
        assert_eq!(bearer_token(&headers("BEARER s3cret")), Some("s3cret"));
    }

    #[test]
    fn ignores_other_schemes_and_blank_tokens() {
        assert_eq!(bearer_token(&headers("Basic YWxpY2U6cHc=")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&headers("Bearers3cret")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
