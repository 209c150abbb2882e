//! Access gate as an axum middleware.
//!
//! axum handlers are async and owned by the router, so the gate cannot call
//! them itself. Instead the guard decides first, then either the request
//! continues to the inner service or the gate's failure handler writes the
//! response.
//!
//! Example:
//! ```ignore
//! let me = Router::new().route("/me", get(me));
//! let me = middleware::auth::gate::apply(me, state.gate.guard(Requirement::Authenticated)?);
//! ```

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::gate::Decision;
use crate::services::HttpGuard;

/// Guard every route of `router` with `guard`.
///
/// Uses `route_layer`, so unmatched paths still answer 404 instead of going
/// through the gate.
pub fn apply<S>(router: Router<S>, guard: HttpGuard) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(guard, gate_middleware))
}

async fn gate_middleware(
    State(guard): State<HttpGuard>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // decide in its own statement: `&Request<Body>` is not Send and must not live across the await
    let decision = guard.evaluate(&req);

    match decision {
        Decision::Allow => next.run(req).await,
        Decision::Deny(denial) => {
            let mut res = Response::default();
            guard.deny(denial, &mut res, &req);
            res
        }
    }
}
