pub mod access_policy;
pub mod tokens;

pub use access_policy::{HttpGate, HttpGuard, build_access_gate};
pub use tokens::TokenTable;
