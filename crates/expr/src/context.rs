//! Lexical scopes that expressions are evaluated in.
use crate::ast::Expression;
use crate::error::ExpressionError;
use crate::functions::ContextMeta;
use tether_source::DataSource;
use tether_types::ResolvedPath;

/// One lexical scope.
///
/// Contexts form a chain from the innermost scope to the root. A child is
/// created by [`Context::child`] from a path expression resolved in its
/// parent: that path becomes the child's base (what `this` refers to), and
/// the expression's `as` name, if any, becomes an alias visible to every
/// descendant. Contexts only borrow their parent, so any number of children
/// can share one parent, including across threads.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    meta: &'a ContextMeta,
    source: Option<&'a dyn DataSource>,
    parent: Option<&'a Context<'a>>,
    base: Option<ResolvedPath>,
    alias: Option<String>,
}

impl<'a> Context<'a> {
    /// Creates a root context reading from `source`.
    pub fn new(meta: &'a ContextMeta, source: &'a dyn DataSource) -> Self {
        Self {
            meta,
            source: Some(source),
            parent: None,
            base: None,
            alias: None,
        }
    }

    /// Creates a root context with no data source. Paths evaluate to
    /// `Undefined`; literals, operators and functions work normally.
    pub fn detached(meta: &'a ContextMeta) -> Self {
        Self {
            meta,
            source: None,
            parent: None,
            base: None,
            alias: None,
        }
    }

    /// A copy of this scope that reads from `source` instead of the chain's
    /// data source. Base path, alias and parents are unchanged; used to pin
    /// an evaluation to one snapshot of a live store.
    pub fn with_source<'b>(&'b self, source: &'b dyn DataSource) -> Context<'b> {
        Context {
            meta: self.meta,
            source: Some(source),
            parent: self.parent,
            base: self.base.clone(),
            alias: self.alias.clone(),
        }
    }

    /// Enters a child scope based at `with`, resolved in this context.
    ///
    /// `with` must be a path expression (optionally under unary operators).
    pub fn child(&self, with: &Expression) -> Result<Context<'_>, ExpressionError> {
        let base = with.resolve(self)?;
        let alias = bound_alias(with).map(str::to_string);
        log::debug!(
            "entering scope '{}' at [{}]{}",
            with,
            base,
            alias.as_deref().map(|a| format!(" as {}", a)).unwrap_or_default()
        );
        Ok(Context {
            meta: self.meta,
            source: None,
            parent: Some(self),
            base: Some(base),
            alias,
        })
    }

    pub fn meta(&self) -> &'a ContextMeta {
        self.meta
    }

    pub fn parent(&self) -> Option<&'a Context<'a>> {
        self.parent
    }

    /// The base path this scope was opened with. `None` for a root.
    pub fn base(&self) -> Option<&ResolvedPath> {
        self.base.as_ref()
    }

    /// The alias this scope publishes, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Iterates from this context out to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Context<'a>> {
        std::iter::successors(Some(self), |ctx| ctx.parent)
    }

    /// The nearest data source on the chain.
    pub fn source(&self) -> Option<&'a dyn DataSource> {
        self.ancestors().find_map(|ctx| ctx.source)
    }

    /// The nearest enclosing base path; empty at the root.
    pub fn base_path(&self) -> ResolvedPath {
        self.ancestors()
            .find_map(|ctx| ctx.base.clone())
            .unwrap_or_default()
    }

    /// Finds the base path bound to `name` by this scope or an enclosing one.
    ///
    /// A leading `#` is ignored, so `#color` and `color` name the same alias.
    pub fn lookup_alias(&self, name: &str) -> Result<&ResolvedPath, ExpressionError> {
        let wanted = alias_key(name);
        self.ancestors()
            .find(|ctx| ctx.alias.as_deref().map(alias_key) == Some(wanted))
            .and_then(|ctx| ctx.base.as_ref())
            .ok_or_else(|| {
                log::warn!("alias '{}' is not bound in any enclosing scope", name);
                ExpressionError::UnboundAlias(name.to_string())
            })
    }
}

/// The `as` name of the path under any unary operators.
fn bound_alias(with: &Expression) -> Option<&str> {
    match with {
        Expression::Path(path) => path.bound_as.as_deref(),
        Expression::Unary { operand, .. } => bound_alias(operand),
        _ => None,
    }
}

fn alias_key(name: &str) -> &str {
    name.strip_prefix('#').unwrap_or(name)
}
