//! Data-binding core for templates.
//!
//! Templates bind to data through small expressions such as
//! `_page.colors[_page.key].name` or `plus(#nums[1], #nums[2])`. This crate
//! ties together the pieces needed to evaluate them:
//!
//! - [`types`]: the value model and resolved paths.
//! - [`source`]: the [`DataSource`] capability, a plain [`ObjectModel`] and a
//!   mutation-tracking [`LiveStore`].
//! - [`expr`]: expression trees, lexical [`Context`] scopes, evaluation and
//!   dependency extraction.

pub use tether_expr as expr;
pub use tether_source as source;
pub use tether_types as types;

pub use tether_expr::{
    Context, ContextMeta, ContextMetaBuilder, Dependency, Expression, ExpressionError, Function,
    FunctionRegistry, Literal, PathExpression, PathSegment, UnaryOperator,
};
pub use tether_source::{
    DataSource, LiveStore, LiveStoreConfig, Mutation, MutationKind, ObjectModel, Snapshot,
    SourceError,
};
pub use tether_types::{ResolvedPath, Segment, Value, path};

use thiserror::Error;

/// Any error raised by the binding core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Re-evaluates an expression only when one of its dependencies changed.
///
/// A `Binding` remembers the value and dependencies from its last evaluation
/// together with the store version they were read at. [`Binding::refresh`]
/// consults the store's change log and re-evaluates when a mutation since
/// then touched a dependency, or when the log no longer covers that range.
#[derive(Debug)]
pub struct Binding {
    expression: Expression,
    value: Value,
    dependencies: Vec<Dependency>,
    version: u64,
}

impl Binding {
    /// Evaluates `expression` against a snapshot of `store`.
    pub fn new(expression: Expression, ctx: &Context<'_>, store: &LiveStore) -> Result<Self, Error> {
        let mut binding = Self {
            expression,
            value: Value::Undefined,
            dependencies: Vec::new(),
            version: 0,
        };
        binding.evaluate(ctx, store)?;
        Ok(binding)
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// The store version the current value was read at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Brings the binding up to date with `store`. Returns `true` when the
    /// expression was re-evaluated.
    ///
    /// `ctx` must be rooted at the same store; its data source is replaced by
    /// a snapshot for the duration of the evaluation.
    pub fn refresh(&mut self, ctx: &Context<'_>, store: &LiveStore) -> Result<bool, Error> {
        if let Some(changes) = store.changes_since(self.version) {
            let touched = changes.iter().any(|change| {
                self.dependencies
                    .iter()
                    .any(|dep| dep.is_affected_by(&change.path))
            });
            if !touched {
                if let Some(last) = changes.last() {
                    self.version = last.version;
                }
                return Ok(false);
            }
        }
        log::debug!("binding '{}' is stale at version {}", self.expression, store.version());
        self.evaluate(ctx, store)?;
        Ok(true)
    }

    fn evaluate(&mut self, ctx: &Context<'_>, store: &LiveStore) -> Result<(), Error> {
        let snapshot = store.snapshot();
        let pinned = ctx.with_source(&snapshot);
        self.value = self.expression.get(&pinned)?;
        self.dependencies = self.expression.dependencies(&pinned)?;
        self.version = snapshot.version();
        Ok(())
    }
}
