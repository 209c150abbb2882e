use thiserror::Error;

/// Gate misconfiguration. Always a programming error, surfaced at
/// construction or when a rule is registered, never on the request path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("capability gating requested but no capability predicate was configured")]
    CapabilityGatingNotConfigured,

    #[error("a not-authorized handler was configured without a capability predicate")]
    NotAuthorizedWithoutCapability,

    #[error("a capability requirement must name at least one capability")]
    EmptyCapabilities,
}
