//! Data-access abstractions for the binding core.
//!
//! This crate provides the `DataSource` trait, the single capability the
//! expression engine needs from wherever bound data lives, and two
//! interchangeable implementations of it.
//!
//! ## Available Sources
//!
//! - `ObjectModel`: Plain reader over an in-memory `serde_json::Value`
//! - `LiveStore`: Mutable store that records every change it applies
//! - `Snapshot`: Frozen view of a `LiveStore` at one version
//!
//! ## Example
//!
//! ```
//! use tether_source::{DataSource, ObjectModel};
//! use tether_types::{path, Value};
//! use serde_json::json;
//!
//! let model = ObjectModel::new(json!({ "_page": { "nums": [2, 11] } }));
//! assert_eq!(model.get(&path!["_page", "nums", 1]), Value::Number(11.0));
//! assert_eq!(model.get(&path!["_page", "missing", 0]), Value::Undefined);
//! ```

pub mod error;
pub mod live;
pub mod object;
mod traverse;

pub use error::SourceError;
pub use live::{LiveStore, LiveStoreConfig, Mutation, MutationKind, Snapshot};
pub use object::ObjectModel;

use std::fmt::Debug;
use std::sync::Arc;
use tether_types::{Segment, Value};

/// A source of values addressable by resolved path.
///
/// Implementations descend through objects by key and through arrays by
/// index. A path that leads nowhere, including one that passes through an
/// absent or scalar value, yields `Value::Undefined`; reads never fail.
pub trait DataSource: Send + Sync + Debug {
    /// Returns the value stored at `path`, or `Value::Undefined`.
    fn get(&self, path: &[Segment]) -> Value;

    /// Returns a human-readable name for this source (for logging/debugging).
    fn name(&self) -> &'static str {
        "data-source"
    }
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn get(&self, path: &[Segment]) -> Value {
        (**self).get(path)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    fn get(&self, path: &[Segment]) -> Value {
        (**self).get(path)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
