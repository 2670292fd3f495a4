//! Shared helpers for serializer and component tests.

mod fetch;
mod fixtures;
mod markup;
mod stub;

pub use crate::fetch::ManualFetcher;
pub use crate::fixtures::{drain, location, reading};
pub use crate::markup::{assert_html_eq, diff_lines, escape_text, markup_lines};
pub use crate::stub::StubComponent;
