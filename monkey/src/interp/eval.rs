//! Expression evaluator

use super::builtins;
use super::env::{EnvRef, Environment, child_of};
use super::error::{EvalResult, InterpResult, RuntimeError, Unwind};
use super::value::{Function, HashObject, NULL, Object};
use crate::ast::{Block, Expression, InfixOp, Node, PrefixOp, Program, Statement};
use crate::config::EvalConfig;
use std::rc::Rc;
use tracing::{debug, trace};

/// The interpreter
pub struct Interpreter {
    /// Global environment, shared by every program run on this interpreter
    global_env: EnvRef,
    config: EvalConfig,
}

impl Interpreter {
    /// Create a new interpreter
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Interpreter {
            global_env: Environment::new().into_ref(),
            config,
        }
    }

    pub fn global_env(&self) -> &EnvRef {
        &self.global_env
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run a program in the global environment.
    ///
    /// Bindings persist, so successive calls behave like REPL input lines.
    pub fn eval_program(&self, program: &Program) -> Object {
        self.evaluate(program, &self.global_env)
    }

    /// Evaluate any node against `env`, folding the outcome into one object.
    ///
    /// A `return` reaching the top of a Program is unwrapped; reaching the
    /// top of any other node it stays wrapped in `Object::ReturnValue`.
    pub fn evaluate<'a>(&self, node: impl Into<Node<'a>>, env: &EnvRef) -> Object {
        let result = match node.into() {
            Node::Program(program) => self.eval_statements(&program.statements, env),
            Node::Block(block) => self.eval_block(block, env),
            Node::Statement(stmt) => self.eval_statement(stmt, env),
            Node::Expression(expr) => self.eval(expr, env),
        };
        match result {
            Ok(value) => value,
            Err(Unwind::Return(value)) => Object::ReturnValue(Box::new(value)),
            Err(Unwind::Error(err)) => {
                debug!(kind = ?err.kind, message = %err.message, "evaluation failed");
                Object::Error(err)
            }
        }
    }

    /// Top-level statement sequence: a `return` ends the run with its value
    fn eval_statements(&self, statements: &[Statement], env: &EnvRef) -> EvalResult {
        let mut result = NULL;
        for stmt in statements {
            result = match self.eval_statement(stmt, env) {
                Ok(value) => value,
                Err(Unwind::Return(value)) => return Ok(value),
                Err(err) => return Err(err),
            };
        }
        Ok(result)
    }

    /// Nested sequence: a `return` keeps unwinding to the call site
    fn eval_block(&self, block: &Block, env: &EnvRef) -> EvalResult {
        let mut result = NULL;
        for stmt in &block.statements {
            result = self.eval_statement(stmt, env)?;
        }
        Ok(result)
    }

    fn eval_statement(&self, stmt: &Statement, env: &EnvRef) -> EvalResult {
        match stmt {
            Statement::Let { name, value } => {
                let val = self.eval(value, env)?;
                env.borrow_mut().bind(name.as_str(), val);
                Ok(NULL)
            }
            Statement::Return(value) => {
                let val = self.eval(value, env)?;
                Err(Unwind::Return(val))
            }
            Statement::Expression(expr) => self.eval(expr, env),
        }
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    fn eval(&self, expr: &Expression, env: &EnvRef) -> EvalResult {
        stacker::maybe_grow(self.config.stack_red_zone, self.config.stack_grow_size, || {
            self.eval_inner(expr, env)
        })
    }

    fn eval_inner(&self, expr: &Expression, env: &EnvRef) -> EvalResult {
        match expr {
            Expression::Integer(n) => Ok(Object::Integer(*n)),
            Expression::String(s) => Ok(Object::string(s.as_str())),
            Expression::Boolean(b) => Ok(Object::from_bool(*b)),

            Expression::Identifier(name) => self.eval_identifier(name, env),

            Expression::Prefix { op, right } => {
                let right = self.eval(right, env)?;
                Ok(eval_prefix(*op, &right)?)
            }

            Expression::Infix { left, op, right } => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                Ok(eval_infix(*op, &left, &right)?)
            }

            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                let cond = self.eval(condition, env)?;
                if cond.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alt) = alternative {
                    self.eval_block(alt, env)
                } else {
                    Ok(NULL)
                }
            }

            // Captures the scope itself, not a snapshot of it
            Expression::Function(literal) => Ok(Object::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                env: Rc::clone(env),
            }))),

            Expression::Call {
                function,
                arguments,
            } => {
                let callee = self.eval(function, env)?;
                let args = self.eval_expressions(arguments, env)?;
                self.apply_function(&callee, args)
            }

            Expression::Array(elements) => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Object::array(elements))
            }

            Expression::Index { left, index } => {
                let left = self.eval(left, env)?;
                let index = self.eval(index, env)?;
                Ok(eval_index(&left, &index)?)
            }

            Expression::Hash(pairs) => self.eval_hash_literal(pairs, env),
        }
    }

    /// Environment chain first, then the built-in registry
    fn eval_identifier(&self, name: &str, env: &EnvRef) -> EvalResult {
        if let Some(value) = env.borrow().lookup(name) {
            return Ok(value);
        }
        if let Some(builtin) = builtins::lookup(name) {
            trace!(builtin = name, "resolved built-in");
            return Ok(Object::Builtin(builtin));
        }
        Err(RuntimeError::identifier_not_found(name).into())
    }

    /// Left to right, stopping at the first error
    fn eval_expressions(&self, exprs: &[Expression], env: &EnvRef) -> EvalResult<Vec<Object>> {
        exprs.iter().map(|expr| self.eval(expr, env)).collect()
    }

    fn eval_hash_literal(&self, pairs: &[(Expression, Expression)], env: &EnvRef) -> EvalResult {
        let mut hash = HashObject::new();
        for (key_expr, value_expr) in pairs {
            let key = self.eval(key_expr, env)?;
            let hash_key = key
                .hash_key()
                .ok_or_else(|| RuntimeError::unusable_hash_key(key.object_type()))?;
            let value = self.eval(value_expr, env)?;
            hash.insert(hash_key, key, value);
        }
        Ok(Object::Hash(Rc::new(hash)))
    }

    /// Call a function or built-in with already evaluated arguments
    #[tracing::instrument(level = "debug", skip_all, fields(callee = %callee.object_type(), argc = args.len()))]
    fn apply_function(&self, callee: &Object, args: Vec<Object>) -> EvalResult {
        match callee {
            Object::Function(func) => {
                stacker::maybe_grow(self.config.stack_red_zone, self.config.stack_grow_size, || {
                    self.call_function(func, args)
                })
            }
            Object::Builtin(builtin) => {
                trace!(builtin = builtin.name, "calling built-in");
                Ok(builtin.call(&args)?)
            }
            other => Err(RuntimeError::not_a_function(other.object_type()).into()),
        }
    }

    fn call_function(&self, func: &Function, args: Vec<Object>) -> EvalResult {
        let params = func.parameters();
        if self.config.check_arity && params.len() != args.len() {
            return Err(RuntimeError::wrong_argument_count(args.len(), params.len()).into());
        }

        // New scope enclosed by the closure's defining scope, not the caller's
        let call_env = child_of(&func.env);
        {
            let mut scope = call_env.borrow_mut();
            let mut args = args.into_iter();
            for param in params {
                scope.bind(param.as_str(), args.next().unwrap_or(NULL));
            }
        }

        match self.eval_block(&func.literal.body, &call_env) {
            Err(Unwind::Return(value)) => Ok(value),
            other => other,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate `node` with a default-configured interpreter
pub fn evaluate<'a>(node: impl Into<Node<'a>>, env: &EnvRef) -> Object {
    Interpreter::new().evaluate(node, env)
}

fn eval_prefix(op: PrefixOp, right: &Object) -> InterpResult<Object> {
    match op {
        PrefixOp::Bang => Ok(Object::from_bool(!right.is_truthy())),
        PrefixOp::Minus => match right {
            Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
            other => Err(RuntimeError::unknown_prefix_operator(op, other.object_type())),
        },
    }
}

fn eval_infix(op: InfixOp, left: &Object, right: &Object) -> InterpResult<Object> {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(op, *l, *r),
        _ if left.object_type() != right.object_type() => Err(RuntimeError::type_mismatch(
            left.object_type(),
            op,
            right.object_type(),
        )),
        (Object::String(l), Object::String(r)) => match op {
            InfixOp::Add => Ok(Object::string(format!("{l}{r}"))),
            _ => Err(RuntimeError::unknown_infix_operator(
                left.object_type(),
                op,
                right.object_type(),
            )),
        },
        _ => match op {
            InfixOp::Eq => Ok(Object::from_bool(left.is_identical(right))),
            InfixOp::NotEq => Ok(Object::from_bool(!left.is_identical(right))),
            _ => Err(RuntimeError::unknown_infix_operator(
                left.object_type(),
                op,
                right.object_type(),
            )),
        },
    }
}

/// Two's-complement wrapping arithmetic; division truncates toward zero
fn eval_integer_infix(op: InfixOp, l: i64, r: i64) -> InterpResult<Object> {
    let value = match op {
        InfixOp::Add => Object::Integer(l.wrapping_add(r)),
        InfixOp::Sub => Object::Integer(l.wrapping_sub(r)),
        InfixOp::Mul => Object::Integer(l.wrapping_mul(r)),
        InfixOp::Div => {
            if r == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            Object::Integer(l.wrapping_div(r))
        }
        InfixOp::Eq => Object::from_bool(l == r),
        InfixOp::NotEq => Object::from_bool(l != r),
        InfixOp::Lt => Object::from_bool(l < r),
        InfixOp::Gt => Object::from_bool(l > r),
    };
    Ok(value)
}

fn eval_index(left: &Object, index: &Object) -> InterpResult<Object> {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(NULL)),
        (Object::Hash(hash), key) => match key.hash_key() {
            Some(hash_key) => Ok(hash
                .get(&hash_key)
                .map(|pair| pair.value.clone())
                .unwrap_or(NULL)),
            None => Err(RuntimeError::index_not_supported(left.object_type())),
        },
        _ => Err(RuntimeError::index_not_supported(left.object_type())),
    }
}
