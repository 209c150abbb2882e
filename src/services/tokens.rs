/*
 * Responsibility
 * - Static bearer token table (token -> subject + roles), read from AUTH_TOKENS
 * - Only feeds the "is authenticated" / "has role" predicates of the demo server.
 *   Issuing, rotating or persisting credentials is out of scope.
 *
 * Format: `token=subject[:role|role...]`, entries separated by `,`
 *   AUTH_TOKENS="s3cret=alice:admin|ops,t0ken=bob"
 */
use std::collections::HashMap;
use std::{error::Error, fmt};

pub type Result<T> = std::result::Result<T, TokenTableError>;

/// Errors name the entry position, never the token itself.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenTableError {
    MissingSeparator { entry: usize },
    EmptyToken { entry: usize },
    EmptySubject { entry: usize },
    DuplicateToken { entry: usize },
}

impl fmt::Display for TokenTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenTableError::MissingSeparator { entry } => {
                write!(f, "entry #{} is not of the form token=subject", entry)
            }
            TokenTableError::EmptyToken { entry } => write!(f, "entry #{} has an empty token", entry),
            TokenTableError::EmptySubject { entry } => {
                write!(f, "entry #{} has an empty subject", entry)
            }
            TokenTableError::DuplicateToken { entry } => {
                write!(f, "entry #{} repeats an earlier token", entry)
            }
        }
    }
}

impl Error for TokenTableError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<String>,
}

#[derive(Clone, Default)]
pub struct TokenTable {
    entries: HashMap<String, Principal>,
}

// tokens stay out of logs
impl fmt::Debug for TokenTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl TokenTable {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        let items = raw.split(',').map(str::trim).filter(|s| !s.is_empty());
        for (entry, item) in items.enumerate() {
            let (token, principal) = item
                .split_once('=')
                .ok_or(TokenTableError::MissingSeparator { entry })?;

            let token = token.trim();
            if token.is_empty() {
                return Err(TokenTableError::EmptyToken { entry });
            }

            let (subject, roles) = principal.split_once(':').unwrap_or((principal, ""));
            let subject = subject.trim();
            if subject.is_empty() {
                return Err(TokenTableError::EmptySubject { entry });
            }

            let roles = roles
                .split('|')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();

            let principal = Principal {
                subject: subject.to_string(),
                roles,
            };
            if entries.insert(token.to_string(), principal).is_some() {
                return Err(TokenTableError::DuplicateToken { entry });
            }
        }

        Ok(Self { entries })
    }

    pub fn lookup(&self, token: &str) -> Option<&Principal> {
        self.entries.get(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subjects_and_roles() {
        let table = TokenTable::parse("s3cret=alice:admin|ops, t0ken=bob").unwrap();

        let alice = table.lookup("s3cret").unwrap();
        assert_eq!(alice.subject, "alice");
        assert_eq!(alice.roles, vec!["admin", "ops"]);

        let bob = table.lookup("t0ken").unwrap();
        assert_eq!(bob.subject, "bob");
        assert!(bob.roles.is_empty());

        assert!(table.lookup("alice").is_none());
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        assert!(TokenTable::parse(" , ").unwrap().is_empty());
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert_eq!(
            TokenTable::parse("a=alice,broken").unwrap_err(),
            TokenTableError::MissingSeparator { entry: 1 }
        );
        assert_eq!(
            TokenTable::parse("=alice").unwrap_err(),
            TokenTableError::EmptyToken { entry: 0 }
        );
        assert_eq!(
            TokenTable::parse("a=:admin").unwrap_err(),
            TokenTableError::EmptySubject { entry: 0 }
        );
        assert_eq!(
            TokenTable::parse("a=alice,a=bob").unwrap_err(),
            TokenTableError::DuplicateToken { entry: 1 }
        );
    }

    #[test]
    fn debug_output_hides_tokens() {
        let table = TokenTable::parse("s3cret=alice").unwrap();
        assert!(!format!("{table:?}").contains("s3cret"));
    }
}
