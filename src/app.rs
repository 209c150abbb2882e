/*
 * Responsibility
 * - Config → access gate → Router
 * - Middleware order (outermost first): http, cors, security headers,
 *   access (bearer → AuthCtx), gate (per route)
 * - axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::gate::GateError;
use crate::services::build_access_gate;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,access_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash so the panic is noticed
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        tokens = config.auth_tokens.len(),
        not_authorized_mode = ?config.not_authorized_mode,
        "starting access gate API"
    );

    // a misconfigured gate stops startup here
    let state = build_state(&config)?;
    let app = build_router(state, &config)?;

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState, GateError> {
    let gate = build_access_gate(config.not_authorized_mode)?;
    Ok(AppState::new(gate, Arc::new(config.auth_tokens.clone())))
}

pub fn build_router(state: AppState, config: &Config) -> Result<Router, GateError> {
    let v1 = api::v1::routes(&state)?;
    let v1 = middleware::auth::access::apply(v1, state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);

    Ok(middleware::http::apply(router))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    const TOKENS: &str = "root-token=alice:admin|ops,member-token=bob";

    fn app(mode: &str) -> Router {
        let vars: HashMap<&str, &str> =
            HashMap::from([("AUTH_TOKENS", TOKENS), ("NOT_AUTHORIZED_MODE", mode)]);
        let config = Config::from_vars(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        let state = build_state(&config).unwrap();
        build_router(state, &config).unwrap()
    }

    async fn get(app: Router, path: &str, token: Option<&str>) -> Response {
        let mut req = Request::builder().uri(path);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn json(res: Response) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let res = get(app("dedicated"), "/api/v1/health", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn me_requires_authentication() {
        let res = get(app("dedicated"), "/api/v1/me", None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(json(res).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn unknown_token_counts_as_anonymous() {
        let res = get(app("dedicated"), "/api/v1/me", Some("nope")).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_the_authenticated_subject() {
        let res = get(app("dedicated"), "/api/v1/me", Some("member-token")).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = json(res).await;
        assert_eq!(body["subject"], "bob");
        assert_eq!(body["roles"], Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn login_is_for_anonymous_callers_only() {
        let res = get(app("dedicated"), "/api/v1/login", None).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = get(app("dedicated"), "/api/v1/login", Some("member-token")).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(json(res).await["error"]["code"], "ALREADY_AUTHENTICATED");
    }

    #[tokio::test]
    async fn lowercase_bearer_scheme_still_authenticates() {
        let req = Request::builder()
            .uri("/api/v1/login")
            .header(header::AUTHORIZATION, "bearer member-token")
            .body(Body::empty())
            .unwrap();
        let res = app("dedicated").oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn admin_checks_identity_before_role() {
        let res = get(app("dedicated"), "/api/v1/admin", None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = get(app("dedicated"), "/api/v1/admin", Some("member-token")).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = get(app("dedicated"), "/api/v1/admin", Some("root-token")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json(res).await["subject"], "alice");
    }

    #[tokio::test]
    async fn fallback_mode_answers_missing_role_like_anonymous() {
        let res = get(app("fallback"), "/api/v1/admin", Some("member-token")).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn unmatched_paths_are_not_gated() {
        let res = get(app("dedicated"), "/api/v1/nowhere", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
