//! Runtime errors for the interpreter

use super::value::{Object, ObjectType};
use crate::ast::{InfixOp, PrefixOp};
use thiserror::Error;

/// Runtime error during interpretation.
///
/// Errors never unwind the host: they reach the caller as `Object::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Infix operands of differing types
    TypeMismatch,
    /// Operator undefined for the operand type(s)
    UnknownOperator,
    /// Unbound name
    IdentifierNotFound,
    /// Call target is not invocable
    NotAFunction,
    /// Invalid index/indexee combination
    UnsupportedIndex,
    /// Non-hashable key in a hash literal
    UnusableHashKey,
    /// Argument count mismatch
    WrongArgumentCount,
    /// Built-in received an argument of the wrong type
    BadArgument,
    /// Integer division by zero
    DivisionByZero,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError { kind, message }
    }

    pub fn type_mismatch(left: ObjectType, op: InfixOp, right: ObjectType) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type mismatch: {left} {op} {right}"),
        )
    }

    pub fn unknown_prefix_operator(op: PrefixOp, right: ObjectType) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("unknown operator: {op}{right}"),
        )
    }

    pub fn unknown_infix_operator(left: ObjectType, op: InfixOp, right: ObjectType) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("unknown operator: {left} {op} {right}"),
        )
    }

    pub fn identifier_not_found(name: &str) -> Self {
        Self::new(
            ErrorKind::IdentifierNotFound,
            format!("identifier not found: {name}"),
        )
    }

    pub fn not_a_function(got: ObjectType) -> Self {
        Self::new(ErrorKind::NotAFunction, format!("not a function: {got}"))
    }

    pub fn index_not_supported(left: ObjectType) -> Self {
        Self::new(
            ErrorKind::UnsupportedIndex,
            format!("index operator not supported: {left}"),
        )
    }

    pub fn unusable_hash_key(key: ObjectType) -> Self {
        Self::new(
            ErrorKind::UnusableHashKey,
            format!("unusable as hash key: {key}"),
        )
    }

    pub fn wrong_argument_count(got: usize, want: usize) -> Self {
        Self::new(
            ErrorKind::WrongArgumentCount,
            format!("wrong number of arguments. got={got}, want={want}"),
        )
    }

    /// Built-in accepts several types but not this one
    pub fn unsupported_argument(builtin: &str, got: ObjectType) -> Self {
        Self::new(
            ErrorKind::BadArgument,
            format!("argument to `{builtin}` not supported, got {got}"),
        )
    }

    /// Built-in accepts exactly one type
    pub fn expected_argument(builtin: &str, expected: ObjectType, got: ObjectType) -> Self {
        Self::new(
            ErrorKind::BadArgument,
            format!("argument to `{builtin}` must be {expected}, got {got}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero".to_string())
    }
}

/// Result type for built-ins and operator helpers
pub type InterpResult<T> = Result<T, RuntimeError>;

/// Non-local exit travelling up the evaluator's call stack.
///
/// `Return` is caught at the nearest function call (or the program), `Error`
/// only at the top.
#[derive(Debug, Clone, PartialEq)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

/// Result type for the evaluator's recursive walk
pub type EvalResult<T = Object> = Result<T, Unwind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message_format() {
        let err = RuntimeError::type_mismatch(ObjectType::Integer, InfixOp::Add, ObjectType::Boolean);
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.message, "type mismatch: INTEGER + BOOLEAN");
    }

    #[test]
    fn test_unknown_operator_message_format() {
        let err = RuntimeError::unknown_prefix_operator(PrefixOp::Minus, ObjectType::Boolean);
        assert_eq!(err.kind, ErrorKind::UnknownOperator);
        assert_eq!(err.message, "unknown operator: -BOOLEAN");

        let err = RuntimeError::unknown_infix_operator(
            ObjectType::String,
            InfixOp::Sub,
            ObjectType::String,
        );
        assert_eq!(err.message, "unknown operator: STRING - STRING");
    }

    #[test]
    fn test_identifier_not_found() {
        let err = RuntimeError::identifier_not_found("foobar");
        assert_eq!(err.kind, ErrorKind::IdentifierNotFound);
        assert_eq!(err.message, "identifier not found: foobar");
    }

    #[test]
    fn test_wrong_argument_count_message_format() {
        let err = RuntimeError::wrong_argument_count(2, 1);
        assert_eq!(err.kind, ErrorKind::WrongArgumentCount);
        assert_eq!(err.message, "wrong number of arguments. got=2, want=1");
    }

    #[test]
    fn test_builtin_argument_messages() {
        let err = RuntimeError::unsupported_argument("len", ObjectType::Integer);
        assert_eq!(err.message, "argument to `len` not supported, got INTEGER");

        let err = RuntimeError::expected_argument("push", ObjectType::Array, ObjectType::Hash);
        assert_eq!(err.kind, ErrorKind::BadArgument);
        assert_eq!(err.message, "argument to `push` must be ARRAY, got HASH");
    }

    #[test]
    fn test_display_is_message() {
        let err = RuntimeError::division_by_zero();
        assert_eq!(err.to_string(), "division by zero");
    }

    #[test]
    fn test_error_is_std_error() {
        let err = RuntimeError::not_a_function(ObjectType::Integer);
        let std_err: &dyn std::error::Error = &err;
        assert!(std_err.source().is_none());
    }

    #[test]
    fn test_unwind_from_runtime_error() {
        let unwind: Unwind = RuntimeError::index_not_supported(ObjectType::Integer).into();
        assert!(matches!(
            unwind,
            Unwind::Error(RuntimeError { kind: ErrorKind::UnsupportedIndex, .. })
        ));
    }
}
