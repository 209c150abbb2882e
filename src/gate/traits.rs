//! Collaborator contracts.
//!
//! Each collaborator is a single-method trait with a blanket impl for plain
//! closures, so both `|req| ...` and a dedicated struct can be plugged in.

use super::types::Capability;

/// "Is this caller authenticated?"
pub trait AuthPredicate<Req>: Send + Sync {
    fn is_authenticated(&self, req: &Req) -> bool;
}

impl<Req, F> AuthPredicate<Req> for F
where
    F: Fn(&Req) -> bool + Send + Sync,
{
    fn is_authenticated(&self, req: &Req) -> bool {
        self(req)
    }
}

/// "Does this caller hold the required capabilities?"
///
/// Whether *all* or *any* of `capabilities` must be held is up to the
/// implementation. The gate passes the list through in declaration order.
pub trait CapabilityPredicate<Req>: Send + Sync {
    fn has_capability(&self, req: &Req, capabilities: &[Capability]) -> bool;
}

impl<Req, F> CapabilityPredicate<Req> for F
where
    F: Fn(&Req, &[Capability]) -> bool + Send + Sync,
{
    fn has_capability(&self, req: &Req, capabilities: &[Capability]) -> bool {
        self(req, capabilities)
    }
}

/// Invoked in place of the protected handler when a check fails.
/// Responsible for producing the denial response.
pub trait FailureHandler<Sink, Req>: Send + Sync {
    fn handle(&self, sink: &mut Sink, req: &Req);
}

impl<Sink, Req, F> FailureHandler<Sink, Req> for F
where
    F: Fn(&mut Sink, &Req) + Send + Sync,
{
    fn handle(&self, sink: &mut Sink, req: &Req) {
        self(sink, req)
    }
}

/// A request handler. `WrappedHandler` implements this too, so wrapped
/// handlers can be registered (or wrapped again) like any other.
pub trait Handler<Sink, Req>: Send + Sync {
    fn call(&self, sink: &mut Sink, req: &Req);
}

impl<Sink, Req, F> Handler<Sink, Req> for F
where
    F: Fn(&mut Sink, &Req) + Send + Sync,
{
    fn call(&self, sink: &mut Sink, req: &Req) {
        self(sink, req)
    }
}
