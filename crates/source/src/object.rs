//! A plain, read-only data source over in-memory JSON.

use crate::DataSource;
use crate::traverse;
use tether_types::{Segment, Value};

/// Reads values out of a `serde_json::Value` tree.
///
/// This is the simplest source, useful for rendering static data or testing.
#[derive(Debug, Clone, Default)]
pub struct ObjectModel {
    data: serde_json::Value,
}

impl ObjectModel {
    pub fn new(data: serde_json::Value) -> Self {
        Self { data }
    }

    /// The underlying JSON document.
    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.data
    }
}

impl From<serde_json::Value> for ObjectModel {
    fn from(data: serde_json::Value) -> Self {
        Self::new(data)
    }
}

impl DataSource for ObjectModel {
    fn get(&self, path: &[Segment]) -> Value {
        traverse::lookup(&self.data, path).into_value()
    }

    fn name(&self) -> &'static str {
        "object-model"
    }
}
