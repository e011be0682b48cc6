//! Stage 4: style mapping.

mod mapper;
mod rules;

pub use mapper::{StyleMapper, StyleOptions};
pub use rules::{match_style, rules_from_catalog, StyleRule};
