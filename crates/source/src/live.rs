//! A live, mutation-tracking data store.
//!
//! `LiveStore` holds a mutable value tree and a bounded log of the paths
//! each mutation touched. Reads use the same traversal as `ObjectModel`, so
//! the two are interchangeable behind `DataSource`. The tree is shared
//! copy-on-write with any outstanding `Snapshot`, which lets an evaluation
//! read a consistent version while writers keep going.

use crate::error::SourceError;
use crate::traverse;
use crate::DataSource;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tether_types::{Map, ResolvedPath, Segment, Value};

/// Settings for a `LiveStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LiveStoreConfig {
    /// How many mutations `changes_since` can look back over.
    pub change_log_capacity: usize,
    /// Largest array `set` will grow by writing past its end.
    pub max_array_length: usize,
}

impl Default for LiveStoreConfig {
    fn default() -> Self {
        Self {
            change_log_capacity: 1024,
            max_array_length: 1 << 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Set,
    Delete,
}

/// One applied change, as recorded in the change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// Store version after this mutation was applied.
    pub version: u64,
    pub path: ResolvedPath,
    pub kind: MutationKind,
}

#[derive(Debug)]
struct State {
    root: Arc<Value>,
    version: u64,
    log: VecDeque<Mutation>,
}

#[derive(Debug)]
pub struct LiveStore {
    state: RwLock<State>,
    config: LiveStoreConfig,
}

impl Default for LiveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveStore {
    /// Creates an empty store whose root is an empty object.
    pub fn new() -> Self {
        Self::with_config(Value::Object(Map::new()), LiveStoreConfig::default())
    }

    pub fn from_json(data: serde_json::Value) -> Self {
        Self::with_config(Value::from(data), LiveStoreConfig::default())
    }

    pub fn with_config(root: Value, config: LiveStoreConfig) -> Self {
        Self {
            state: RwLock::new(State {
                root: Arc::new(root),
                version: 0,
                log: VecDeque::new(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &LiveStoreConfig {
        &self.config
    }

    /// Current version; starts at 0 and increases by one per recorded mutation.
    pub fn version(&self) -> u64 {
        self.read().version
    }

    /// Stores `value` at `path`, creating missing intermediate containers,
    /// and returns the value previously there.
    ///
    /// A missing container is created as an array when it is addressed by an
    /// index segment and as an object otherwise.
    pub fn set(&self, path: &[Segment], value: impl Into<Value>) -> Result<Value, SourceError> {
        if path.is_empty() {
            return Err(SourceError::EmptyPath);
        }
        let mut state = self.state.write().map_err(|_| SourceError::LockPoisoned)?;
        check_growth(&state.root, path, self.config.max_array_length)?;
        let root = Arc::make_mut(&mut state.root);
        let slot = slot_mut(root, path, self.config.max_array_length)?;
        let previous = std::mem::replace(slot, value.into());
        self.record(&mut state, path, MutationKind::Set);
        Ok(previous)
    }

    /// Sets every member of `object` beneath `path`, one mutation per member.
    /// Non-object values are stored at `path` directly.
    pub fn set_each(&self, path: &[Segment], object: impl Into<Value>) -> Result<(), SourceError> {
        match object.into() {
            Value::Object(members) => {
                for (key, value) in members {
                    let mut child = ResolvedPath::from(path);
                    child.push(key);
                    self.set(&child, value)?;
                }
                Ok(())
            }
            other => self.set(path, other).map(|_| ()),
        }
    }

    /// Removes the value at `path` and returns it.
    ///
    /// Object members are removed; array elements are left as holes
    /// (`Undefined`) so sibling indices stay stable. Deleting something that
    /// does not exist is not recorded.
    pub fn del(&self, path: &[Segment]) -> Result<Value, SourceError> {
        let Some((last, parent_path)) = path.split_last() else {
            return Err(SourceError::EmptyPath);
        };
        let mut state = self.state.write().map_err(|_| SourceError::LockPoisoned)?;
        if traverse::lookup(state.root.as_ref(), path).into_value().is_undefined() {
            return Ok(Value::Undefined);
        }
        let root = Arc::make_mut(&mut state.root);
        let previous = match existing_mut(root, parent_path) {
            Some(Value::Object(map)) => map.shift_remove(&last.to_string()),
            Some(Value::Array(items)) => last
                .as_index()
                .and_then(|i| items.get_mut(i))
                .map(|slot| std::mem::take(slot)),
            _ => None,
        };
        match previous {
            Some(previous) => {
                self.record(&mut state, path, MutationKind::Delete);
                Ok(previous)
            }
            None => Ok(Value::Undefined),
        }
    }

    /// Mutations applied after `version`, oldest first.
    ///
    /// Returns `None` when the change log no longer reaches back that far and
    /// the caller must treat everything as changed.
    pub fn changes_since(&self, version: u64) -> Option<Vec<Mutation>> {
        let state = self.read();
        if version >= state.version {
            return Some(Vec::new());
        }
        match state.log.front() {
            Some(oldest) if oldest.version <= version + 1 => Some(
                state
                    .log
                    .iter()
                    .filter(|m| m.version > version)
                    .cloned()
                    .collect(),
            ),
            _ => None,
        }
    }

    /// A frozen view of the current data.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.read();
        Snapshot {
            root: Arc::clone(&state.root),
            version: state.version,
        }
    }

    fn record(&self, state: &mut State, path: &[Segment], kind: MutationKind) {
        state.version += 1;
        log::debug!("live store v{}: {:?} {}", state.version, kind, ResolvedPath::from(path));
        if self.config.change_log_capacity == 0 {
            return;
        }
        if state.log.len() == self.config.change_log_capacity {
            state.log.pop_front();
        }
        state.log.push_back(Mutation {
            version: state.version,
            path: ResolvedPath::from(path),
            kind,
        });
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned: PoisonError<_>| {
            log::warn!("live store lock poisoned; reading last written state");
            poisoned.into_inner()
        })
    }
}

impl DataSource for LiveStore {
    fn get(&self, path: &[Segment]) -> Value {
        let state = self.read();
        traverse::lookup(state.root.as_ref(), path).into_value()
    }

    fn name(&self) -> &'static str {
        "live-store"
    }
}

/// A read-only view of a `LiveStore` at a single version.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: Arc<Value>,
    version: u64,
}

impl Snapshot {
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl DataSource for Snapshot {
    fn get(&self, path: &[Segment]) -> Value {
        traverse::lookup(self.root.as_ref(), path).into_value()
    }

    fn name(&self) -> &'static str {
        "live-store-snapshot"
    }
}

/// Fails if writing at `path` would pad an array past `max_array_length`.
/// Runs before any container is created, so a rejected write leaves no trace.
fn check_growth(root: &Value, path: &[Segment], max_array_length: usize) -> Result<(), SourceError> {
    let mut current = Some(root);
    for (depth, segment) in path.iter().enumerate() {
        let padded = match current {
            Some(Value::Array(items)) => segment.as_index().filter(|i| *i >= items.len()),
            Some(Value::Undefined | Value::Null) | None => match segment {
                Segment::Index(i) => Some(*i),
                Segment::Key(_) => None,
            },
            Some(_) => None,
        };
        if padded.is_some_and(|i| i >= max_array_length) {
            return Err(out_of_range(&path[..=depth], max_array_length));
        }
        current = match current {
            Some(Value::Object(map)) => map.get(&segment.to_string()),
            Some(Value::Array(items)) => segment.as_index().and_then(|i| items.get(i)),
            _ => None,
        };
    }
    Ok(())
}

fn slot_mut<'a>(
    root: &'a mut Value,
    path: &[Segment],
    max_array_length: usize,
) -> Result<&'a mut Value, SourceError> {
    let mut current = root;
    for (depth, segment) in path.iter().enumerate() {
        if matches!(current, Value::Undefined | Value::Null) {
            *current = match segment {
                Segment::Index(_) => Value::Array(Vec::new()),
                Segment::Key(_) => Value::Object(Map::new()),
            };
        }
        current = match current {
            Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Undefined),
            Value::Array(items) => {
                let index = segment.as_index().ok_or_else(|| not_container(&path[..=depth]))?;
                if items.len() <= index {
                    let len = index
                        .checked_add(1)
                        .filter(|len| *len <= max_array_length)
                        .ok_or_else(|| out_of_range(&path[..=depth], max_array_length))?;
                    items.resize(len, Value::Undefined);
                }
                &mut items[index]
            }
            _ => return Err(not_container(&path[..depth])),
        };
    }
    Ok(current)
}

fn existing_mut<'a>(root: &'a mut Value, path: &[Segment]) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get_mut(&segment.to_string())?,
            Value::Array(items) => items.get_mut(segment.as_index()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn out_of_range(path: &[Segment], limit: usize) -> SourceError {
    SourceError::IndexOutOfRange {
        path: ResolvedPath::from(path).to_string(),
        limit,
    }
}

fn not_container(path: &[Segment]) -> SourceError {
    SourceError::NotContainer {
        path: ResolvedPath::from(path).to_string(),
    }
}
