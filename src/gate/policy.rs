use std::fmt;
use std::sync::Arc;

use super::error::GateError;
use super::traits::{AuthPredicate, CapabilityPredicate, FailureHandler, Handler};
use super::types::{
    Capability, Decision, Denial, DenialPolicy, Requirement, write_capabilities,
};

struct Collaborators<Sink, Req> {
    is_authenticated: Arc<dyn AuthPredicate<Req>>,
    has_capability: Option<Arc<dyn CapabilityPredicate<Req>>>,
    on_auth_required: Arc<dyn FailureHandler<Sink, Req>>,
    on_not_authorized: Option<Arc<dyn FailureHandler<Sink, Req>>>,
    on_auth_prohibited: Arc<dyn FailureHandler<Sink, Req>>,
}

/// Policy object: a fixed set of predicates and failure handlers used to wrap
/// request handlers.
///
/// Immutable once built. Cloning shares the same collaborators, and the gate is
/// `Send + Sync` so one instance serves every request concurrently.
pub struct Gate<Sink, Req> {
    inner: Arc<Collaborators<Sink, Req>>,
}

impl<Sink, Req> Clone for Gate<Sink, Req> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Sink, Req> fmt::Debug for Gate<Sink, Req> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("capability_gating", &self.capability_gating())
            .field("denial_policy", &self.denial_policy())
            .finish_non_exhaustive()
    }
}

impl<Sink, Req> Gate<Sink, Req> {
    /// Start building a gate from the three collaborators every gate needs.
    ///
    /// Closures must annotate their parameter types (`|req: &Req| ...`) so
    /// they are accepted for any borrow lifetime.
    pub fn builder<A, R, P>(
        is_authenticated: A,
        on_auth_required: R,
        on_auth_prohibited: P,
    ) -> GateBuilder<Sink, Req>
    where
        A: AuthPredicate<Req> + 'static,
        R: FailureHandler<Sink, Req> + 'static,
        P: FailureHandler<Sink, Req> + 'static,
    {
        GateBuilder {
            is_authenticated: Arc::new(is_authenticated),
            on_auth_required: Arc::new(on_auth_required),
            on_auth_prohibited: Arc::new(on_auth_prohibited),
            has_capability: None,
            on_not_authorized: None,
            capability_gating_required: false,
        }
    }

    /// Whether capability requirements can be registered on this gate.
    pub fn capability_gating(&self) -> bool {
        self.inner.has_capability.is_some()
    }

    pub fn denial_policy(&self) -> DenialPolicy {
        if self.inner.on_not_authorized.is_some() {
            DenialPolicy::Dedicated
        } else {
            DenialPolicy::FallbackToAuthRequired
        }
    }

    /// Bind a requirement to this gate, validating it against the configured
    /// collaborators.
    pub fn guard(&self, requirement: Requirement) -> Result<Guard<Sink, Req>, GateError> {
        let check = match requirement {
            Requirement::Authenticated => Check::Authenticated,
            Requirement::Unauthenticated => Check::Unauthenticated,
            Requirement::Capability(capabilities) => {
                let predicate = self
                    .inner
                    .has_capability
                    .clone()
                    .ok_or(GateError::CapabilityGatingNotConfigured)?;
                if capabilities.is_empty() {
                    return Err(GateError::EmptyCapabilities);
                }
                Check::Capability {
                    predicate,
                    capabilities,
                }
            }
        };

        Ok(Guard {
            gate: self.clone(),
            check,
        })
    }

    pub fn wrap<H>(
        &self,
        handler: H,
        requirement: Requirement,
    ) -> Result<WrappedHandler<Sink, Req>, GateError>
    where
        H: Handler<Sink, Req> + 'static,
    {
        let guard = self.guard(requirement)?;
        Ok(WrappedHandler {
            guard,
            handler: Arc::new(handler),
        })
    }

    /// Only authenticated callers reach `handler`; others get `auth_required`.
    pub fn require_authenticated<H>(&self, handler: H) -> WrappedHandler<Sink, Req>
    where
        H: Handler<Sink, Req> + 'static,
    {
        self.wrap_infallible(handler, Check::Authenticated)
    }

    /// Only anonymous callers reach `handler`; others get `auth_prohibited`.
    pub fn require_unauthenticated<H>(&self, handler: H) -> WrappedHandler<Sink, Req>
    where
        H: Handler<Sink, Req> + 'static,
    {
        self.wrap_infallible(handler, Check::Unauthenticated)
    }

    /// Authenticated callers passing the capability predicate reach `handler`.
    ///
    /// Anonymous callers get `auth_required` without the capability predicate
    /// being consulted. Authenticated callers failing it get `not_authorized`,
    /// or `auth_required` under `DenialPolicy::FallbackToAuthRequired`.
    pub fn require_capability<H, I, C>(
        &self,
        handler: H,
        capabilities: I,
    ) -> Result<WrappedHandler<Sink, Req>, GateError>
    where
        H: Handler<Sink, Req> + 'static,
        I: IntoIterator<Item = C>,
        C: Into<Capability>,
    {
        self.wrap(handler, Requirement::capabilities(capabilities))
    }

    /// Run the failure handler for `denial`.
    pub fn deny(&self, denial: Denial, sink: &mut Sink, req: &Req) {
        let handler = match denial {
            Denial::AuthRequired => &self.inner.on_auth_required,
            Denial::NotAuthorized => self
                .inner
                .on_not_authorized
                .as_ref()
                .unwrap_or(&self.inner.on_auth_required),
            Denial::AuthProhibited => &self.inner.on_auth_prohibited,
        };
        handler.handle(sink, req);
    }

    fn wrap_infallible<H>(&self, handler: H, check: Check<Req>) -> WrappedHandler<Sink, Req>
    where
        H: Handler<Sink, Req> + 'static,
    {
        WrappedHandler {
            guard: Guard {
                gate: self.clone(),
                check,
            },
            handler: Arc::new(handler),
        }
    }

    fn not_capable(&self) -> Denial {
        match self.denial_policy() {
            DenialPolicy::Dedicated => Denial::NotAuthorized,
            DenialPolicy::FallbackToAuthRequired => Denial::AuthRequired,
        }
    }
}

pub struct GateBuilder<Sink, Req> {
    is_authenticated: Arc<dyn AuthPredicate<Req>>,
    on_auth_required: Arc<dyn FailureHandler<Sink, Req>>,
    on_auth_prohibited: Arc<dyn FailureHandler<Sink, Req>>,
    has_capability: Option<Arc<dyn CapabilityPredicate<Req>>>,
    on_not_authorized: Option<Arc<dyn FailureHandler<Sink, Req>>>,
    capability_gating_required: bool,
}

impl<Sink, Req> GateBuilder<Sink, Req> {
    pub fn has_capability<C>(mut self, predicate: C) -> Self
    where
        C: CapabilityPredicate<Req> + 'static,
    {
        self.has_capability = Some(Arc::new(predicate));
        self
    }

    /// Dedicated handler for "authenticated but not capable". Without one,
    /// those callers are sent to the auth-required handler.
    pub fn on_not_authorized<H>(mut self, handler: H) -> Self
    where
        H: FailureHandler<Sink, Req> + 'static,
    {
        self.on_not_authorized = Some(Arc::new(handler));
        self
    }

    /// Declare up front that capability requirements will be registered, so a
    /// missing capability predicate fails `build()` instead of registration.
    pub fn require_capability_gating(mut self) -> Self {
        self.capability_gating_required = true;
        self
    }

    pub fn build(self) -> Result<Gate<Sink, Req>, GateError> {
        if self.on_not_authorized.is_some() && self.has_capability.is_none() {
            return Err(GateError::NotAuthorizedWithoutCapability);
        }
        if self.capability_gating_required && self.has_capability.is_none() {
            return Err(GateError::CapabilityGatingNotConfigured);
        }

        let gate = Gate {
            inner: Arc::new(Collaborators {
                is_authenticated: self.is_authenticated,
                has_capability: self.has_capability,
                on_auth_required: self.on_auth_required,
                on_not_authorized: self.on_not_authorized,
                on_auth_prohibited: self.on_auth_prohibited,
            }),
        };

        tracing::debug!(
            capability_gating = gate.capability_gating(),
            denial_policy = ?gate.denial_policy(),
            "access gate constructed"
        );

        Ok(gate)
    }
}

enum Check<Req> {
    Authenticated,
    Unauthenticated,
    Capability {
        predicate: Arc<dyn CapabilityPredicate<Req>>,
        capabilities: Vec<Capability>,
    },
}

impl<Req> Clone for Check<Req> {
    fn clone(&self) -> Self {
        match self {
            Check::Authenticated => Check::Authenticated,
            Check::Unauthenticated => Check::Unauthenticated,
            Check::Capability {
                predicate,
                capabilities,
            } => Check::Capability {
                predicate: Arc::clone(predicate),
                capabilities: capabilities.clone(),
            },
        }
    }
}

impl<Req> fmt::Display for Check<Req> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Authenticated => f.write_str("authenticated"),
            Check::Unauthenticated => f.write_str("unauthenticated"),
            Check::Capability { capabilities, .. } => write_capabilities(f, capabilities),
        }
    }
}

/// A requirement validated against a gate.
///
/// `WrappedHandler` is built on top of this. Transport adapters that cannot
/// hand the protected handler to the gate (async routers) use it directly:
/// `evaluate`, then either continue or `deny`.
pub struct Guard<Sink, Req> {
    gate: Gate<Sink, Req>,
    check: Check<Req>,
}

impl<Sink, Req> Clone for Guard<Sink, Req> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            check: self.check.clone(),
        }
    }
}

impl<Sink, Req> fmt::Debug for Guard<Sink, Req> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("requirement", &self.check.to_string())
            .finish_non_exhaustive()
    }
}

impl<Sink, Req> Guard<Sink, Req> {
    pub fn requirement(&self) -> Requirement {
        match &self.check {
            Check::Authenticated => Requirement::Authenticated,
            Check::Unauthenticated => Requirement::Unauthenticated,
            Check::Capability { capabilities, .. } => {
                Requirement::Capability(capabilities.clone())
            }
        }
    }

    /// Decide the fate of one request. Pure with respect to the gate: no state
    /// is kept between calls.
    pub fn evaluate(&self, req: &Req) -> Decision {
        let authenticated = self.gate.inner.is_authenticated.is_authenticated(req);

        let decision = match &self.check {
            Check::Authenticated if authenticated => Decision::Allow,
            Check::Authenticated => Decision::Deny(Denial::AuthRequired),
            Check::Unauthenticated if authenticated => Decision::Deny(Denial::AuthProhibited),
            Check::Unauthenticated => Decision::Allow,
            // identity first: the capability predicate may assume an authenticated caller
            Check::Capability { .. } if !authenticated => Decision::Deny(Denial::AuthRequired),
            Check::Capability {
                predicate,
                capabilities,
            } => {
                if predicate.has_capability(req, capabilities) {
                    Decision::Allow
                } else {
                    Decision::Deny(self.gate.not_capable())
                }
            }
        };

        tracing::debug!(
            requirement = %self.check,
            authenticated,
            decision = %decision,
            "access gate decision"
        );

        decision
    }

    pub fn deny(&self, denial: Denial, sink: &mut Sink, req: &Req) {
        self.gate.deny(denial, sink, req);
    }
}

/// A handler guarded by a requirement. Same call shape as the handler it wraps.
pub struct WrappedHandler<Sink, Req> {
    guard: Guard<Sink, Req>,
    handler: Arc<dyn Handler<Sink, Req>>,
}

impl<Sink, Req> Clone for WrappedHandler<Sink, Req> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<Sink, Req> fmt::Debug for WrappedHandler<Sink, Req> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedHandler")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl<Sink, Req> WrappedHandler<Sink, Req> {
    pub fn guard(&self) -> &Guard<Sink, Req> {
        &self.guard
    }
}

impl<Sink, Req> Handler<Sink, Req> for WrappedHandler<Sink, Req> {
    fn call(&self, sink: &mut Sink, req: &Req) {
        match self.guard.evaluate(req) {
            Decision::Allow => self.handler.call(sink, req),
            Decision::Deny(denial) => self.guard.deny(denial, sink, req),
        }
    }
}
