//! Static dependency extraction.
//!
//! A binding must be re-evaluated when any of the paths its expression reads
//! changes. For a path expression that is the resolved path itself plus
//! whatever its bracket sub-expressions read. Function arguments are opaque:
//! a function may look at any part of the value it receives, so a path passed
//! as an argument depends on its whole subtree and is marked deep.
use crate::ast::{Expression, PathExpression};
use crate::context::Context;
use crate::error::ExpressionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tether_types::path::is_prefix;
use tether_types::{ResolvedPath, Segment};

/// The key that marks a deep dependency in segment form.
pub const DEEP_MARKER: &str = "*";

/// A path an expression's value depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub path: ResolvedPath,
    /// When set, any change at or below `path` affects the value.
    #[serde(default)]
    pub deep: bool,
}

impl Dependency {
    pub fn exact(path: ResolvedPath) -> Self {
        Self { path, deep: false }
    }

    pub fn deep(path: ResolvedPath) -> Self {
        Self { path, deep: true }
    }

    /// The path with a trailing `*` key when deep, e.g. `_page.nums.2.*`.
    pub fn to_segments(&self) -> Vec<Segment> {
        let mut segments = self.path.segments().to_vec();
        if self.deep {
            segments.push(Segment::Key(DEEP_MARKER.to_string()));
        }
        segments
    }

    /// Whether a write at `changed` can alter the value this dependency tracks.
    ///
    /// Writes to the path or any of its ancestors always do. Writes below the
    /// path only count for deep dependencies. An index and its canonical key
    /// form (`1` and `"1"`) count as the same segment.
    pub fn is_affected_by(&self, changed: &[Segment]) -> bool {
        is_prefix(changed, &self.path) || (self.deep && self.path.is_prefix_of(changed))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.path.is_empty(), self.deep) {
            (true, true) => f.write_str(DEEP_MARKER),
            (false, true) => write!(f, "{}.{}", self.path, DEEP_MARKER),
            (_, false) => write!(f, "{}", self.path),
        }
    }
}

impl Expression {
    /// Lists the paths this expression's value depends on, in a stable order.
    ///
    /// Literals have none. A unary expression depends on what its operand
    /// depends on. A path lists its own resolved path first, then the
    /// dependencies of its bracket sub-expressions from last to first. A call
    /// lists the dependencies of each argument left to right, with path
    /// arguments marked deep.
    pub fn dependencies(&self, ctx: &Context<'_>) -> Result<Vec<Dependency>, ExpressionError> {
        let mut found = Vec::new();
        self.collect_dependencies(ctx, &mut found)?;
        log::debug!(
            "'{}' depends on [{}]",
            self,
            found.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        );
        Ok(found)
    }

    fn collect_dependencies(
        &self,
        ctx: &Context<'_>,
        found: &mut Vec<Dependency>,
    ) -> Result<(), ExpressionError> {
        match self {
            Expression::Literal(_) => Ok(()),
            Expression::Unary { operand, .. } => operand.collect_dependencies(ctx, found),
            Expression::Path(path) => {
                found.push(Dependency::exact(path.resolve(ctx)?));
                path.collect_bracket_dependencies(ctx, found)
            }
            Expression::Call { args, .. } => args
                .iter()
                .try_for_each(|arg| arg.collect_argument_dependencies(ctx, found)),
        }
    }

    fn collect_argument_dependencies(
        &self,
        ctx: &Context<'_>,
        found: &mut Vec<Dependency>,
    ) -> Result<(), ExpressionError> {
        match self {
            Expression::Literal(_) => Ok(()),
            Expression::Unary { operand, .. } => operand.collect_argument_dependencies(ctx, found),
            Expression::Path(path) => {
                found.push(Dependency::deep(path.resolve(ctx)?));
                path.collect_bracket_dependencies(ctx, found)
            }
            Expression::Call { .. } => self.collect_dependencies(ctx, found),
        }
    }
}

impl PathExpression {
    pub fn dependencies(&self, ctx: &Context<'_>) -> Result<Vec<Dependency>, ExpressionError> {
        let mut found = vec![Dependency::exact(self.resolve(ctx)?)];
        self.collect_bracket_dependencies(ctx, &mut found)?;
        Ok(found)
    }

    fn collect_bracket_dependencies(
        &self,
        ctx: &Context<'_>,
        found: &mut Vec<Dependency>,
    ) -> Result<(), ExpressionError> {
        self.brackets()
            .rev()
            .try_for_each(|expr| expr.collect_dependencies(ctx, found))
    }
}
