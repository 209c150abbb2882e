/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - gate: the access gate every protected route is wrapped with
 *   - tokens: bearer token table consulted by the access middleware
 * - Cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::services::{HttpGate, TokenTable};

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: HttpGate,
    pub tokens: Arc<TokenTable>,
}

impl AppState {
    pub fn new(gate: HttpGate, tokens: Arc<TokenTable>) -> Self {
        Self { gate, tokens }
    }
}
