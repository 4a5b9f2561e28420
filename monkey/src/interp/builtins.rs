//! Built-in function registry
//!
//! A fixed, process-wide table. Every entry validates its own arguments and
//! reports misuse as a `RuntimeError`; none of them mutates its input.

use super::error::{InterpResult, RuntimeError};
use super::value::{NULL, Object, ObjectType};
use std::fmt;

/// Builtin function type
pub type BuiltinFn = fn(&[Object]) -> InterpResult<Object>;

/// Named native function
pub struct Builtin {
    pub name: &'static str,
    func: BuiltinFn,
}

impl Builtin {
    pub fn call(&self, args: &[Object]) -> InterpResult<Object> {
        (self.func)(args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

pub static BUILTINS: [Builtin; 5] = [
    Builtin { name: "len", func: builtin_len },
    Builtin { name: "first", func: builtin_first },
    Builtin { name: "last", func: builtin_last },
    Builtin { name: "rest", func: builtin_rest },
    Builtin { name: "push", func: builtin_push },
];

/// Find a built-in by name
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

fn check_arity(args: &[Object], want: usize) -> InterpResult<()> {
    if args.len() != want {
        return Err(RuntimeError::wrong_argument_count(args.len(), want));
    }
    Ok(())
}

fn expect_array<'a>(builtin: &str, arg: &'a Object) -> InterpResult<&'a [Object]> {
    arg.as_array()
        .ok_or_else(|| RuntimeError::expected_argument(builtin, ObjectType::Array, arg.object_type()))
}

/// len(x) -> byte length of a string or element count of an array
fn builtin_len(args: &[Object]) -> InterpResult<Object> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::String(s) => Ok(Object::Integer(s.len() as i64)),
        Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
        other => Err(RuntimeError::unsupported_argument("len", other.object_type())),
    }
}

fn builtin_first(args: &[Object]) -> InterpResult<Object> {
    check_arity(args, 1)?;
    let elements = expect_array("first", &args[0])?;
    Ok(elements.first().cloned().unwrap_or(NULL))
}

fn builtin_last(args: &[Object]) -> InterpResult<Object> {
    check_arity(args, 1)?;
    let elements = expect_array("last", &args[0])?;
    Ok(elements.last().cloned().unwrap_or(NULL))
}

/// rest(arr) -> new array without the first element, null when empty
fn builtin_rest(args: &[Object]) -> InterpResult<Object> {
    check_arity(args, 1)?;
    match expect_array("rest", &args[0])? {
        [] => Ok(NULL),
        [_, tail @ ..] => Ok(Object::array(tail.to_vec())),
    }
}

/// push(arr, item) -> new array with item appended
fn builtin_push(args: &[Object]) -> InterpResult<Object> {
    check_arity(args, 2)?;
    let elements = expect_array("push", &args[0])?;
    let mut pushed = Vec::with_capacity(elements.len() + 1);
    pushed.extend_from_slice(elements);
    pushed.push(args[1].clone());
    Ok(Object::array(pushed))
}
