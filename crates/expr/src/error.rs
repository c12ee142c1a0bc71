use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Alias '{0}' is not bound in any enclosing scope")]
    UnboundAlias(String),

    #[error("Function '{0}' is not registered")]
    UnknownFunction(String),

    #[error("Expression does not resolve to a path: {kind}")]
    NotAPath { kind: &'static str },

    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("Invalid pattern /{pattern}/: {message}")]
    InvalidPattern { pattern: String, message: String },
}
