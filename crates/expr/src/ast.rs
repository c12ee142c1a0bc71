//! Defines the expression tree that bindings are evaluated from.
//!
//! Trees are built once by the upstream parser and then evaluated any number
//! of times against different contexts. Every node owns its children, and
//! nothing is mutated after construction, so a tree can be shared freely
//! between threads.
use std::fmt;
use tether_types::Value;

/// The top-level representation of a binding expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A constant scalar, like a number, string or pattern.
    Literal(Literal),
    /// A unary operator applied to one operand.
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    /// A path into the bound data.
    Path(PathExpression),
    /// A call to a registered function.
    Call { name: String, args: Vec<Expression> },
}

/// A unary operator used in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `!`
    Not,
    /// `-`
    Negate,
    /// `+`
    Plus,
    /// `~`
    BitNot,
    /// `typeof`
    TypeOf,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::BitNot => "~",
            UnaryOperator::TypeOf => "typeof",
        }
    }

    /// Looks an operator up by its source symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "!" => Some(UnaryOperator::Not),
            "-" => Some(UnaryOperator::Negate),
            "+" => Some(UnaryOperator::Plus),
            "~" => Some(UnaryOperator::BitNot),
            "typeof" => Some(UnaryOperator::TypeOf),
            _ => None,
        }
    }

    /// Applies the operator to an already evaluated operand.
    pub fn apply(&self, operand: &Value) -> Value {
        match self {
            UnaryOperator::Not => Value::Bool(!operand.truthy()),
            UnaryOperator::Negate => Value::Number(-operand.to_number()),
            UnaryOperator::Plus => Value::Number(operand.to_number()),
            UnaryOperator::BitNot => Value::Number(f64::from(!operand.to_int32())),
            UnaryOperator::TypeOf => Value::String(operand.type_name().to_string()),
        }
    }
}

/// An immutable scalar constant.
///
/// Only scalars can be literals: numbers, booleans, strings, patterns,
/// `null` and `undefined`. Use [`Literal::from_token`] to lower a token
/// produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal(pub(crate) Value);

impl Literal {
    pub fn undefined() -> Self {
        Literal(Value::Undefined)
    }

    pub fn null() -> Self {
        Literal(Value::Null)
    }

    pub fn bool(b: bool) -> Self {
        Literal(Value::Bool(b))
    }

    pub fn number(n: f64) -> Self {
        Literal(Value::Number(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Literal(Value::String(s.into()))
    }

    pub fn pattern(pattern: tether_types::Pattern) -> Self {
        Literal(Value::Pattern(pattern))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// One descriptor of a path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// The relative root marker, `this`.
    This,
    /// A reference to a scope alias, e.g. `#color`.
    Alias(String),
    /// A literal key, e.g. `.name` or `["name"]`.
    Key(String),
    /// A literal index, e.g. `[0]`.
    Index(usize),
    /// A dynamic segment, e.g. `[_page.key]`, evaluated at resolution time.
    Bracket(Box<Expression>),
}

/// A path into the bound data, e.g. `_page.colors[_page.key].name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathExpression {
    pub segments: Vec<PathSegment>,
    /// Alias this path publishes when it opens a scope (`with ... as #name`).
    pub bound_as: Option<String>,
}

impl PathExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// A path made only of literal keys: `PathExpression::keys(["_page", "key"])`.
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: keys.into_iter().map(|k| PathSegment::Key(k.into())).collect(),
            bound_as: None,
        }
    }

    /// A path starting at the relative root, `this`.
    pub fn this() -> Self {
        Self::new().segment(PathSegment::This)
    }

    /// A path starting at a scope alias, e.g. `#color`.
    pub fn alias(name: impl Into<String>) -> Self {
        Self::new().segment(PathSegment::Alias(name.into()))
    }

    pub fn segment(mut self, segment: PathSegment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn key(self, key: impl Into<String>) -> Self {
        self.segment(PathSegment::Key(key.into()))
    }

    pub fn index(self, index: usize) -> Self {
        self.segment(PathSegment::Index(index))
    }

    pub fn bracket(self, expr: impl Into<Expression>) -> Self {
        self.segment(PathSegment::Bracket(Box::new(expr.into())))
    }

    /// Sets the alias this path publishes when used to open a scope.
    pub fn bind_as(mut self, name: impl Into<String>) -> Self {
        self.bound_as = Some(name.into());
        self
    }

    /// The dynamic sub-expressions, in source order.
    pub fn brackets(&self) -> impl DoubleEndedIterator<Item = &Expression> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Bracket(expr) => Some(expr.as_ref()),
            _ => None,
        })
    }
}

impl Expression {
    pub fn literal(literal: Literal) -> Self {
        Expression::Literal(literal)
    }

    pub fn path(path: PathExpression) -> Self {
        Expression::Path(path)
    }

    pub fn unary(op: UnaryOperator, operand: impl Into<Expression>) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand.into()),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Call {
            name: name.into(),
            args,
        }
    }

    /// Checks if the expression is a `Path` variant.
    pub fn is_path(&self) -> bool {
        matches!(self, Expression::Path(_))
    }

    /// A short name for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "literal",
            Expression::Unary { .. } => "unary",
            Expression::Path(_) => "path",
            Expression::Call { .. } => "function call",
        }
    }
}

impl From<PathExpression> for Expression {
    fn from(path: PathExpression) -> Self {
        Expression::Path(path)
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => {
                let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for PathExpression {
    /// Renders the path in source form, e.g. `#color.name` or `this[0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::This if i == 0 => f.write_str("this")?,
                PathSegment::This => {}
                PathSegment::Alias(name) if name.starts_with('#') => f.write_str(name)?,
                PathSegment::Alias(name) => write!(f, "#{}", name)?,
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Bracket(expr) => write!(f, "[{}]", expr)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{}", literal),
            Expression::Unary {
                op: UnaryOperator::TypeOf,
                operand,
            } => write!(f, "typeof {}", operand),
            Expression::Unary { op, operand } => write!(f, "{}{}", op.symbol(), operand),
            Expression::Path(path) => write!(f, "{}", path),
            Expression::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}
