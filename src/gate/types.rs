use std::fmt;

/// Opaque capability identifier (a role or a privilege).
///
/// Matching semantics belong to the `CapabilityPredicate`; the gate only
/// carries the names through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability(String);

impl Capability {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Capability {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Capability {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access requirement attached to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Caller must be authenticated.
    Authenticated,
    /// Caller must NOT be authenticated (e.g. a login page).
    Unauthenticated,
    /// Caller must be authenticated and pass the capability predicate.
    Capability(Vec<Capability>),
}

impl Requirement {
    pub fn capabilities<I, C>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Capability>,
    {
        Self::Capability(capabilities.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Authenticated => f.write_str("authenticated"),
            Requirement::Unauthenticated => f.write_str("unauthenticated"),
            Requirement::Capability(caps) => write_capabilities(f, caps),
        }
    }
}

pub(super) fn write_capabilities(f: &mut fmt::Formatter<'_>, caps: &[Capability]) -> fmt::Result {
    f.write_str("capability(")?;
    for (i, cap) in caps.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        f.write_str(cap.as_str())?;
    }
    f.write_str(")")
}

/// Which failure path a denied request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Caller must authenticate first.
    AuthRequired,
    /// Caller is authenticated but lacks a required capability.
    NotAuthorized,
    /// Caller must not be authenticated.
    AuthProhibited,
}

impl Denial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Denial::AuthRequired => "auth_required",
            Denial::NotAuthorized => "not_authorized",
            Denial::AuthProhibited => "auth_prohibited",
        }
    }
}

/// Terminal decision for one request: exactly one of these is acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Deny(denial) => f.write_str(denial.as_str()),
        }
    }
}

/// How an authenticated caller without the required capability is answered.
///
/// Selected at construction by whether a not-authorized handler was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialPolicy {
    /// Routed to the dedicated not-authorized handler.
    Dedicated,
    /// Routed to the auth-required handler, same as an anonymous caller.
    FallbackToAuthRequired,
}
