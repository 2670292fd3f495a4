//! Readiness signals and generation-tagged request coalescing.
//!
//! Invariants:
//! - A node owns exactly one `Coalesced` state object. Its generation tag only
//!   grows, and `apply` mutates the node state only for the current tag.
//! - Every issued operation keeps a slot until the node is dropped. A slot is
//!   resolved on success, failure, staleness, cancellation, or when its ticket
//!   is dropped, so aggregate waits cannot hang on a lost operation.
//! - After `detach`, running operations stop awaiting their work and no result
//!   is ever applied again.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); operations are spawned
//! with `tokio::task::spawn_local` and must run inside a `LocalSet`.

mod abort;
mod coalescer;
mod signal;

pub use abort::{AbortController, AbortSignal};
pub use coalescer::{Coalesced, OperationRecord, Outcome, Ticket};
pub use signal::{ReadinessError, Readiness, ReadySignal};
