//! Node model for server-rendered documents.
//!
//! Invariants:
//! - Attribute names are unique per element (`dom_utils::set_attr` replaces
//!   in place); emission order comes from `AttributeMap`, never from
//!   insertion order.
//! - Static nodes are plain values. Stateful elements are
//!   `Node::Component`s, which produce their attributes and children only
//!   when the serializer asks for a snapshot.

pub mod attributes;
pub mod component;
pub mod dom_utils;
pub mod traverse;

mod types;
mod void;

pub use crate::attributes::AttributeMap;
pub use crate::component::{Component, ElementSnapshot, MarkupError};
pub use crate::types::{Attribute, Node};
pub use crate::void::{VOID_ELEMENTS, is_void_element};

pub use readiness::Readiness;
