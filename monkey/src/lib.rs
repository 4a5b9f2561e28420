//! Monkey runtime core
//!
//! Evaluator, object system, lexical environments and built-in registry for
//! the Monkey scripting language. Hosts build the AST (see [`ast`]) with
//! their own front end and hand it to an [`Interpreter`].

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;

pub use config::EvalConfig;
pub use error::{ConfigError, Result};
pub use interp::{Interpreter, Object, evaluate};
