//! Deterministic JSON serialization for the files Marquee writes.

mod json;

pub use json::{SerializationError, from_json, to_json_stable};
