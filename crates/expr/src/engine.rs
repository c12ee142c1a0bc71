//! Evaluates expression trees against a [`Context`].
use crate::ast::{Expression, PathExpression, PathSegment};
use crate::context::Context;
use crate::error::ExpressionError;
use tether_types::{ResolvedPath, Value};

/// A resolved path plus whether it can be read at all. Paths built from an
/// `undefined` or `null` bracket are still reported for dependency tracking,
/// but never read from the source.
struct Location {
    path: ResolvedPath,
    addressable: bool,
}

impl Expression {
    /// Resolves the expression to an absolute path in the bound data.
    ///
    /// Unary expressions resolve to their operand's path. Literals and
    /// function calls do not denote a location and fail with
    /// [`ExpressionError::NotAPath`].
    pub fn resolve(&self, ctx: &Context<'_>) -> Result<ResolvedPath, ExpressionError> {
        match self {
            Expression::Path(path) => path.resolve(ctx),
            Expression::Unary { operand, .. } => operand.resolve(ctx),
            other => Err(ExpressionError::NotAPath { kind: other.kind() }),
        }
    }

    /// Evaluates the expression to a value.
    pub fn get(&self, ctx: &Context<'_>) -> Result<Value, ExpressionError> {
        match self {
            Expression::Literal(literal) => Ok(literal.value().clone()),
            Expression::Unary { op, operand } => {
                let value = operand.get(ctx)?;
                Ok(op.apply(&value))
            }
            Expression::Path(path) => path.get(ctx),
            Expression::Call { name, args } => call(ctx, name, args),
        }
    }
}

impl PathExpression {
    pub fn resolve(&self, ctx: &Context<'_>) -> Result<ResolvedPath, ExpressionError> {
        self.locate(ctx).map(|location| location.path)
    }

    /// Reads the value at this path from the nearest data source.
    pub fn get(&self, ctx: &Context<'_>) -> Result<Value, ExpressionError> {
        let location = self.locate(ctx)?;
        if !location.addressable {
            log::trace!("path '{}' has an absent bracket value, reading as undefined", self);
            return Ok(Value::Undefined);
        }
        let value = match ctx.source() {
            Some(source) => source.get(&location.path),
            None => Value::Undefined,
        };
        log::trace!("'{}' at [{}] = {}", self, location.path, value);
        Ok(value)
    }

    fn locate(&self, ctx: &Context<'_>) -> Result<Location, ExpressionError> {
        let (mut path, rest) = match self.segments.split_first() {
            Some((PathSegment::Alias(name), rest)) => (ctx.lookup_alias(name)?.clone(), rest),
            Some((PathSegment::This, rest)) => (ctx.base_path(), rest),
            _ => (ctx.base_path(), self.segments.as_slice()),
        };
        let mut addressable = true;
        for segment in rest {
            match segment {
                PathSegment::Key(key) => path.push(key.as_str()),
                PathSegment::Index(index) => path.push(*index),
                // Only meaningful in leading position.
                PathSegment::This => {}
                PathSegment::Alias(name) => path.push(name.as_str()),
                PathSegment::Bracket(expr) => {
                    let value = expr.get(ctx)?;
                    addressable &= push_dynamic(&mut path, &value);
                }
            }
        }
        Ok(Location { path, addressable })
    }
}

/// Appends the segments a bracket value stands for. Returns false when the
/// value cannot address anything.
fn push_dynamic(path: &mut ResolvedPath, value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 => {
            path.push(*n as usize);
            true
        }
        Value::String(s) => {
            path.extend(s.split('.').map(|part| part.into()));
            true
        }
        Value::Undefined | Value::Null => {
            path.push(value.to_string());
            false
        }
        other => {
            path.push(other.to_string());
            true
        }
    }
}

fn call(ctx: &Context<'_>, name: &str, args: &[Expression]) -> Result<Value, ExpressionError> {
    let values = args
        .iter()
        .map(|arg| arg.get(ctx))
        .collect::<Result<Vec<_>, _>>()?;
    let function = ctx.meta().functions().get(name).ok_or_else(|| {
        log::warn!("call to unregistered function '{}'", name);
        ExpressionError::UnknownFunction(name.to_string())
    })?;
    let result = function.get(&values);
    log::trace!("{}({} args) = {}", name, values.len(), result);
    Ok(result)
}
