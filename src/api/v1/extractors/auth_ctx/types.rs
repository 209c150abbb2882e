/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - middleware::auth::access puts it into request extensions; the access gate
 *   and handlers only read it
 *
 * Notes
 * - Its presence is what "authenticated" means to the gate
 * - `roles` feed the capability check; their meaning is defined by whoever
 *   issued the token
 */

use crate::services::tokens::Principal;

/// Context attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub subject: String,
    pub roles: Vec<String>,
}

impl AuthCtx {
    pub fn new(subject: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<&Principal> for AuthCtx {
    fn from(p: &Principal) -> Self {
        Self::new(p.subject.clone(), p.roles.clone())
    }
}
