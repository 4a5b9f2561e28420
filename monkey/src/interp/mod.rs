//! Tree-walking interpreter
//!
//! `Interpreter::eval_program` walks a `Program` against a chain of
//! environments and returns exactly one `Object`, which may be an error.

mod builtins;
mod env;
mod error;
mod eval;
mod value;

pub use builtins::{BUILTINS, Builtin, BuiltinFn};
pub use env::{EnvRef, Environment, child_of};
pub use error::{ErrorKind, EvalResult, InterpResult, RuntimeError, Unwind};
pub use eval::{Interpreter, evaluate};
pub use value::{FALSE, Function, HashKey, HashObject, HashPair, NULL, Object, ObjectType, TRUE};

/// Find a built-in by name
pub fn builtin(name: &str) -> Option<&'static Builtin> {
    builtins::lookup(name)
}
