//! Abstract Syntax Tree definitions
//!
//! The evaluator consumes these nodes; producing them (lexing, parsing) is
//! the host's job. Every node renders back to Monkey source via `Display`.

mod expr;

pub use expr::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A program is a sequence of top-level statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

/// Nested statement sequence: function bodies and if/else branches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Binding: let name = value;
    Let { name: String, value: Expression },
    /// return value;
    Return(Expression),
    /// Bare expression
    Expression(Expression),
}

impl Statement {
    pub fn let_(name: impl Into<String>, value: Expression) -> Self {
        Statement::Let {
            name: name.into(),
            value,
        }
    }

    pub fn ret(value: Expression) -> Self {
        Statement::Return(value)
    }

    pub fn expr(expr: Expression) -> Self {
        Statement::Expression(expr)
    }
}

/// Any node the evaluator accepts as a root
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Block(&'a Block),
    Statement(&'a Statement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Block> for Node<'a> {
    fn from(block: &'a Block) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(stmt: &'a Statement) -> Self {
        Node::Statement(stmt)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expr: &'a Expression) -> Self {
        Node::Expression(expr)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for stmt in &self.statements {
            write!(f, " {stmt}")?;
        }
        write!(f, " }}")
    }
}

// Every statement ends in `;`; otherwise `f` followed by `(a + b)` reads back
// as a call.
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {name} = {value};"),
            Statement::Return(value) => write!(f, "return {value};"),
            Statement::Expression(expr) => write!(f, "{expr};"),
        }
    }
}
