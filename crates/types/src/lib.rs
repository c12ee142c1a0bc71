//! Shared value model for tether.
//!
//! [`Value`] is what expressions produce and data sources store;
//! [`ResolvedPath`] is how a location inside a data source is addressed.

pub mod path;
pub mod value;

pub use path::{ResolvedPath, Segment};
pub use value::{Map, Pattern, Value};
