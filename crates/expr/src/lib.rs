//! Binding expressions for data-bound templates.
//!
//! An [`Expression`] is built once (normally by the template parser) and then
//! evaluated against a chain of [`Context`] scopes. Each expression can be:
//!
//! - resolved to the absolute [`ResolvedPath`](tether_types::ResolvedPath) it
//!   denotes, with [`Expression::resolve`];
//! - evaluated to a [`Value`](tether_types::Value), with [`Expression::get`];
//! - analysed for the paths whose change would alter its value, with
//!   [`Expression::dependencies`].
//!
//! ```
//! use tether_expr::{Context, ContextMeta, Expression, PathExpression};
//! use tether_source::ObjectModel;
//! use tether_types::Value;
//!
//! let model = ObjectModel::new(serde_json::json!({
//!     "_page": { "colors": { "green": { "name": "Green" } }, "key": "green" }
//! }));
//! let meta = ContextMeta::default();
//! let ctx = Context::new(&meta, &model);
//!
//! let expr: Expression = PathExpression::keys(["_page", "colors"])
//!     .bracket(PathExpression::keys(["_page", "key"]))
//!     .key("name")
//!     .into();
//! assert_eq!(expr.get(&ctx).unwrap(), Value::from("Green"));
//! assert_eq!(expr.resolve(&ctx).unwrap().to_string(), "_page.colors.green.name");
//! ```

pub mod ast;
pub mod context;
pub mod dependencies;
pub mod engine;
pub mod error;
pub mod functions;
mod literal;

// --- Public API ---
pub use ast::{Expression, Literal, PathExpression, PathSegment, UnaryOperator};
pub use context::Context;
pub use dependencies::{DEEP_MARKER, Dependency};
pub use error::ExpressionError;
pub use functions::{ContextMeta, ContextMetaBuilder, Function, FunctionRegistry};
