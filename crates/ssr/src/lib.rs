//! Asynchronous, readiness-aware HTML serialization.
//!
//! Invariants:
//! - Output is a pure function of node states at the instant each node is
//!   emitted. The same tree in the same states always yields the same bytes.
//! - Emission is pre-order; children are visited after their parent's start
//!   tag, so a late-resolving child is observed in its resolved state.
//! - Each node's readiness wait is bounded by `RenderConfig::per_node_timeout`.
//!   A timeout or an abandoned wait is logged and the node is emitted as it
//!   stands; only broken markup fails a render.
//! - The serializer never mutates nodes.

mod assembler;
mod config;
mod error;
mod report;
mod serializer;
mod session;

pub use crate::assembler::{Rendered, render_document, render_with_report};
pub use crate::config::{DEFAULT_DOCTYPE, DEFAULT_NODE_TIMEOUT, RenderConfig};
pub use crate::error::RenderError;
pub use crate::report::{NodeReport, ReadinessOutcome, RenderReport};
pub use crate::serializer::{FragmentSink, Serializer, VecFragmentSink, VisitState};
pub use crate::session::Session;
