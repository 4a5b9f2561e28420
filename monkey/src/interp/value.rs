//! Runtime values for the interpreter

use super::builtins::Builtin;
use super::env::EnvRef;
use super::error::RuntimeError;
use crate::ast::FunctionLiteral;
use rustc_hash::{FxHashMap, FxHasher};
use std::fmt;
use std::hash::Hasher;
use std::rc::Rc;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

/// Runtime value.
///
/// Arrays, hashes and functions are reference-counted: cloning an `Object`
/// never copies their contents, and nothing hands out mutable access to a
/// shared value.
#[derive(Debug, Clone)]
pub enum Object {
    /// 64-bit signed integer
    Integer(i64),
    /// Immutable text
    String(Rc<str>),
    /// Boolean; only ever `TRUE` or `FALSE`
    Boolean(bool),
    /// The single null value
    Null,
    /// Ordered elements
    Array(Rc<Vec<Object>>),
    /// Key/value pairs indexed by `HashKey`
    Hash(Rc<HashObject>),
    /// User-defined closure
    Function(Rc<Function>),
    /// Native function from the built-in registry
    Builtin(&'static Builtin),
    /// Early exit from a function body
    ReturnValue(Box<Object>),
    /// Error carrier
    Error(RuntimeError),
}

/// Type tag of an `Object`, used for dispatch and in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    Integer,
    String,
    Boolean,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::String => "STRING",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error => "ERROR",
        };
        f.write_str(tag)
    }
}

/// Content-derived identity of a hashable value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

/// Stored pair; the original key object is kept for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// Contents of a hash value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HashObject {
    pairs: FxHashMap<HashKey, HashPair>,
}

impl HashObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the pair stored under `hash_key`
    pub fn insert(&mut self, hash_key: HashKey, key: Object, value: Object) {
        self.pairs.insert(hash_key, HashPair { key, value });
    }

    pub fn get(&self, hash_key: &HashKey) -> Option<&HashPair> {
        self.pairs.get(hash_key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &HashPair> {
        self.pairs.values()
    }
}

/// Closure: a function literal plus the environment it was created in
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: EnvRef,
}

impl Function {
    pub fn parameters(&self) -> &[String] {
        &self.literal.parameters
    }
}

// The captured environment may contain this very function.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.literal.parameters)
            .finish_non_exhaustive()
    }
}

impl Object {
    /// Intern a native bool as `TRUE`/`FALSE`
    pub fn from_bool(b: bool) -> Self {
        if b { TRUE } else { FALSE }
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Object::String(s.into())
    }

    pub fn array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(elements))
    }

    /// Only `false` and `null` are falsy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::String(_) => ObjectType::String,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
        }
    }

    /// Derive the hash key; `None` for values that cannot key a hash
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(n) => *n as u64,
            Object::Boolean(b) => u64::from(*b),
            Object::String(s) => {
                let mut hasher = FxHasher::default();
                hasher.write(s.as_bytes());
                hasher.finish()
            }
            _ => return None,
        };
        Some(HashKey {
            object_type: self.object_type(),
            value,
        })
    }

    /// Instance identity, as used by the language's `==` on non-scalar values
    pub fn is_identical(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::String(a), Object::String(b)) => Rc::ptr_eq(a, b),
            (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
            (Object::Hash(a), Object::Hash(b)) => Rc::ptr_eq(a, b),
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Object::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Object::Array(elements) => Some(elements.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{n}"),
            Object::String(s) => write!(f, "{s}"),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::Null => write!(f, "null"),
            Object::Array(elements) => {
                write!(f, "[")?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, "]")
            }
            Object::Hash(hash) => {
                write!(f, "{{")?;
                for (i, pair) in hash.pairs().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Object::Function(func) => write!(f, "{}", func.literal),
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::ReturnValue(inner) => write!(f, "{inner}"),
            Object::Error(err) => write!(f, "ERROR: {}", err.message),
        }
    }
}

/// Structural equality for host-side comparisons. The language's own `==`
/// goes through [`Object::is_identical`].
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Hash(a), Object::Hash(b)) => a == b,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => std::ptr::eq(*a, *b),
            (Object::ReturnValue(a), Object::ReturnValue(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Object {
    fn from(n: i64) -> Self {
        Object::Integer(n)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::from_bool(b)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::String(Rc::from(s))
    }
}

impl From<RuntimeError> for Object {
    fn from(err: RuntimeError) -> Self {
        Object::Error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Expression, InfixOp, Statement};
    use crate::interp::env::Environment;
    use proptest::prelude::*;

    #[test]
    fn test_object_display() {
        assert_eq!(format!("{}", Object::Integer(42)), "42");
        assert_eq!(format!("{}", TRUE), "true");
        assert_eq!(format!("{}", FALSE), "false");
        assert_eq!(format!("{}", NULL), "null");
        assert_eq!(format!("{}", Object::from("raw text")), "raw text");
        let arr = Object::array(vec![Object::Integer(1), Object::from("a"), NULL]);
        assert_eq!(format!("{arr}"), "[1, a, null]");
    }

    #[test]
    fn test_error_and_return_display() {
        let err = Object::Error(RuntimeError::identifier_not_found("x"));
        assert_eq!(err.to_string(), "ERROR: identifier not found: x");
        let ret = Object::ReturnValue(Box::new(Object::Integer(7)));
        assert_eq!(ret.to_string(), "7");
    }

    #[test]
    fn test_function_display() {
        let body = Block::new(vec![Statement::expr(Expression::infix(
            Expression::ident("x"),
            InfixOp::Add,
            Expression::int(2),
        ))]);
        let Expression::Function(literal) = Expression::function(["x"], body) else {
            unreachable!()
        };
        let func = Object::Function(Rc::new(Function {
            literal,
            env: Environment::new().into_ref(),
        }));
        insta::assert_snapshot!(func.to_string(), @"fn(x) { (x + 2); }");
    }

    #[test]
    fn test_hash_display_single_pair() {
        let mut hash = HashObject::new();
        let key = Object::from("one");
        hash.insert(key.hash_key().unwrap(), key, Object::Integer(1));
        assert_eq!(Object::Hash(Rc::new(hash)).to_string(), "{one: 1}");
    }

    #[test]
    fn test_truthiness() {
        assert!(TRUE.is_truthy());
        assert!(!FALSE.is_truthy());
        assert!(!NULL.is_truthy());
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::from("").is_truthy());
        assert!(Object::array(vec![]).is_truthy());
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(Object::Integer(7).as_int(), Some(7));
        assert_eq!(Object::from("7").as_int(), None);
        assert_eq!(Object::from("seven").as_str(), Some("seven"));
        assert_eq!(Object::Integer(7).as_str(), None);
        let arr = Object::array(vec![TRUE]);
        assert_eq!(arr.as_array(), Some(&[TRUE][..]));
        assert_eq!(NULL.as_array(), None);
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(Object::Integer(1).object_type().to_string(), "INTEGER");
        assert_eq!(Object::array(vec![]).object_type().to_string(), "ARRAY");
        assert_eq!(Object::Hash(Rc::default()).object_type().to_string(), "HASH");
        assert_eq!(NULL.object_type().to_string(), "NULL");
    }

    #[test]
    fn test_hash_key_equal_contents() {
        let hello1 = Object::from("Hello World");
        let hello2 = Object::from("Hello World");
        let diff = Object::from("My name is johnny");
        assert!(!hello1.is_identical(&hello2));
        assert_eq!(hello1.hash_key(), hello2.hash_key());
        assert_ne!(hello1.hash_key(), diff.hash_key());
    }

    #[test]
    fn test_hash_key_distinguishes_types() {
        let one = Object::Integer(1).hash_key().unwrap();
        let yes = TRUE.hash_key().unwrap();
        assert_eq!(one.value, yes.value);
        assert_ne!(one, yes);
    }

    #[test]
    fn test_unhashable_values() {
        assert_eq!(NULL.hash_key(), None);
        assert_eq!(Object::array(vec![]).hash_key(), None);
        assert_eq!(Object::Hash(Rc::default()).hash_key(), None);
    }

    #[test]
    fn test_identity() {
        let a = Object::array(vec![Object::Integer(1)]);
        let b = Object::array(vec![Object::Integer(1)]);
        assert!(a.is_identical(&a.clone()));
        assert!(!a.is_identical(&b));
        // Host-side equality is structural
        assert_eq!(a, b);
        assert!(TRUE.is_identical(&Object::from_bool(true)));
        assert!(NULL.is_identical(&NULL));
    }

    #[test]
    fn test_hash_insert_replaces_pair() {
        let mut hash = HashObject::new();
        let k1 = Object::from("a");
        let k2 = Object::from("a");
        let hk = k1.hash_key().unwrap();
        hash.insert(hk, k1, Object::Integer(1));
        hash.insert(hk, k2.clone(), Object::Integer(2));
        assert_eq!(hash.len(), 1);
        let pair = hash.get(&hk).unwrap();
        assert_eq!(pair.value, Object::Integer(2));
        assert!(pair.key.is_identical(&k2));
    }

    proptest! {
        #[test]
        fn prop_string_hash_key_depends_on_contents(s in ".*") {
            let a = Object::from(s.as_str());
            let b = Object::string(s.clone());
            prop_assert_eq!(a.hash_key(), b.hash_key());
        }

        #[test]
        fn prop_integer_hash_key_is_injective(a: i64, b: i64) {
            let ka = Object::Integer(a).hash_key();
            let kb = Object::Integer(b).hash_key();
            prop_assert_eq!(ka == kb, a == b);
        }

        #[test]
        fn prop_only_false_and_null_are_falsy(n: i64, s in "[a-z]{0,8}") {
            prop_assert!(Object::Integer(n).is_truthy());
            prop_assert!(Object::from(s.as_str()).is_truthy());
        }
    }
}
