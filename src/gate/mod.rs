/*!
 * Access gate
 *
 * Responsibility:
 * - Wrap request handlers with an access requirement (authenticated-only,
 *   unauthenticated-only, capability-gated)
 * - Decide, per request, whether the protected handler or one of the failure
 *   handlers runs
 *
 * Notes:
 * - "Is authenticated" / "has capability" are computed by the caller-supplied
 *   predicates. The gate never looks inside the request itself.
 * - Transport-agnostic: `Sink` is whatever the handler writes its response into,
 *   `Req` is whatever the predicates read from.
 *
 * Public API:
 * - Gate / GateBuilder / Guard / WrappedHandler
 * - AuthPredicate / CapabilityPredicate / FailureHandler / Handler
 * - Requirement / Capability / Decision / Denial / DenialPolicy
 * - GateError
 */

mod error;
mod policy;
mod traits;
mod types;

pub use error::GateError;
pub use policy::{Gate, GateBuilder, Guard, WrappedHandler};
pub use traits::{AuthPredicate, CapabilityPredicate, FailureHandler, Handler};
pub use types::{Capability, Decision, Denial, DenialPolicy, Requirement};
