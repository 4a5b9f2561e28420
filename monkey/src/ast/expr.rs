//! Expression AST nodes

use super::Block;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Variable reference
    Identifier(String),
    /// Integer literal
    Integer(i64),
    /// String literal. The language has no escape syntax, so a value
    /// containing `"` renders verbatim and does not read back as one literal.
    String(String),
    /// Boolean literal
    Boolean(bool),

    /// Prefix operation: !x, -x
    Prefix {
        op: PrefixOp,
        right: Box<Expression>,
    },

    /// Infix operation: left op right
    Infix {
        left: Box<Expression>,
        op: InfixOp,
        right: Box<Expression>,
    },

    /// Conditional with optional alternative
    If {
        condition: Box<Expression>,
        consequence: Block,
        alternative: Option<Block>,
    },

    /// Function literal. Shared so that every closure created from it
    /// points at the same parameter list and body.
    Function(Rc<FunctionLiteral>),

    /// Call: callee(arguments...)
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },

    /// Array literal: [a, b, c]
    Array(Vec<Expression>),

    /// Index: left[index]
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },

    /// Hash literal: {k1: v1, k2: v2}, pairs in source order
    Hash(Vec<(Expression, Expression)>),
}

/// Parameters and body of a `fn` literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionLiteral {
    pub parameters: Vec<String>,
    pub body: Block,
}

impl Expression {
    pub fn ident(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn int(value: i64) -> Self {
        Expression::Integer(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::String(value.into())
    }

    pub fn boolean(value: bool) -> Self {
        Expression::Boolean(value)
    }

    pub fn prefix(op: PrefixOp, right: Expression) -> Self {
        Expression::Prefix {
            op,
            right: Box::new(right),
        }
    }

    pub fn infix(left: Expression, op: InfixOp, right: Expression) -> Self {
        Expression::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn if_else(condition: Expression, consequence: Block, alternative: Option<Block>) -> Self {
        Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        }
    }

    pub fn function<S: Into<String>>(
        parameters: impl IntoIterator<Item = S>,
        body: Block,
    ) -> Self {
        Expression::Function(Rc::new(FunctionLiteral {
            parameters: parameters.into_iter().map(Into::into).collect(),
            body,
        }))
    }

    pub fn call(function: Expression, arguments: Vec<Expression>) -> Self {
        Expression::Call {
            function: Box::new(function),
            arguments,
        }
    }

    pub fn array(elements: Vec<Expression>) -> Self {
        Expression::Array(elements)
    }

    pub fn index(left: Expression, index: Expression) -> Self {
        Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
        }
    }

    pub fn hash(pairs: Vec<(Expression, Expression)>) -> Self {
        Expression::Hash(pairs)
    }

    /// Whether the rendering already carries its own outer parentheses
    fn is_parenthesized(&self) -> bool {
        matches!(
            self,
            Expression::Prefix { .. } | Expression::Infix { .. } | Expression::Index { .. }
        )
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(name) => write!(f, "{name}"),
            // Source literals are non-negative; negatives render as the
            // prefix expression that evaluates to them.
            Expression::Integer(i64::MIN) => write!(f, "((-{}) - 1)", i64::MAX),
            Expression::Integer(n) if *n < 0 => write!(f, "(-{})", n.unsigned_abs()),
            Expression::Integer(n) => write!(f, "{n}"),
            Expression::String(s) => write!(f, "\"{s}\""),
            Expression::Boolean(b) => write!(f, "{b}"),
            Expression::Prefix { op, right } => write!(f, "({op}{right})"),
            Expression::Infix { left, op, right } => write!(f, "({left} {op} {right})"),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                if condition.is_parenthesized() {
                    write!(f, "if {condition} {consequence}")?;
                } else {
                    write!(f, "if ({condition}) {consequence}")?;
                }
                if let Some(alt) = alternative {
                    write!(f, " else {alt}")?;
                }
                Ok(())
            }
            Expression::Function(literal) => write!(f, "{literal}"),
            Expression::Call {
                function,
                arguments,
            } => {
                write!(f, "{function}(")?;
                write_separated(f, arguments)?;
                write!(f, ")")
            }
            Expression::Array(elements) => {
                write!(f, "[")?;
                write_separated(f, elements)?;
                write!(f, "]")
            }
            Expression::Index { left, index } => write!(f, "({left}[{index}])"),
            Expression::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        write_separated(f, &self.parameters)?;
        write!(f, ") {}", self.body)
    }
}

fn write_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Prefix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixOp {
    /// Logical not (!)
    Bang,
    /// Negation (-)
    Minus,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Bang => write!(f, "!"),
            PrefixOp::Minus => write!(f, "-"),
        }
    }
}

/// Infix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfixOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    NotEq,
    Lt,
    Gt,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfixOp::Add => write!(f, "+"),
            InfixOp::Sub => write!(f, "-"),
            InfixOp::Mul => write!(f, "*"),
            InfixOp::Div => write!(f, "/"),
            InfixOp::Eq => write!(f, "=="),
            InfixOp::NotEq => write!(f, "!="),
            InfixOp::Lt => write!(f, "<"),
            InfixOp::Gt => write!(f, ">"),
        }
    }
}
