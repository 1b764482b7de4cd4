//! Embedded registry data.
//!
//! The canonical field catalog and tag vocabulary are compiled into the
//! binary with `include_str!()`. Edits to these files are deployment-time
//! configuration; an alternative catalog can be loaded from disk with
//! [`crate::Registry::load_from_path`].

/// Canonical mortgage intake fields.
pub const FIELDS_JSON: &str = include_str!("../data/fields.json");

/// Allowed topic tags, grouped by theme.
pub const TAGS_JSON: &str = include_str!("../data/tags.json");
