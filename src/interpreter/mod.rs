use std::rc::Rc;

use crate::ast::Node;
use crate::builtins;
use crate::environment::Environment;
use crate::error::{InterpError, Result};
use crate::ops;
use crate::value::{new_handle, Handle, Value};

/// Runs a fully-parsed program to completion against a fresh `Environment`.
pub fn run(program: &Rc<Node>) -> Result<()> {
    let mut env = Environment::new();
    execute_node(program, &mut env)?;
    Ok(())
}

pub fn execute_node(node: &Node, env: &mut Environment) -> Result<Handle> {
    match node {
        Node::Block(stmts) => execute_block(stmts, env, true),

        Node::Literal(value) => Ok(new_handle(value.clone())),

        Node::VarRef(name) => env.lookup_var(name),

        Node::UnaryOp { op, operand } => {
            let value = execute_node(operand, env)?.borrow().clone();
            let result = match op {
                Some('-') => ops::unary_minus(&value),
                _ => value,
            };
            Ok(new_handle(result))
        }

        Node::Expression { left, right, op } => {
            let lhs = execute_node(left, env)?.borrow().clone();
            let rhs = execute_node(right, env)?.borrow().clone();
            Ok(new_handle(ops::binary_op(*op, &lhs, &rhs)?))
        }

        Node::Condition { left, right, op } => {
            let lhs = execute_node(left, env)?.borrow().clone();
            let rhs = execute_node(right, env)?.borrow().clone();
            Ok(new_handle(ops::binary_op(*op, &lhs, &rhs)?))
        }

        Node::VarDeclaration(name) => {
            env.declare_var(name)?;
            Ok(new_handle(Value::Unknown))
        }

        Node::Assignment { name, value } => {
            let v = execute_node(value, env)?.borrow().clone();
            env.assign(name, v)?;
            Ok(new_handle(Value::Unknown))
        }

        Node::FuncDeclaration { name, params } => {
            env.declare_func(name, params.clone())?;
            Ok(new_handle(Value::Unknown))
        }

        Node::FuncImpl { name, body } => {
            env.implement_func(name, Rc::clone(body))?;
            Ok(new_handle(Value::Unknown))
        }

        Node::FunctionCall { name, args } => execute_call(name, args, env),

        Node::IfStatement {
            condition,
            then_block,
            else_block,
        } => {
            if as_boolean(condition, env, "if condition")? {
                execute_node(then_block, env)
            } else if let Some(else_block) = else_block {
                execute_node(else_block, env)
            } else {
                Ok(new_handle(Value::Unknown))
            }
        }

        Node::WhileStatement { condition, body } => {
            while as_boolean(condition, env, "while condition")? {
                execute_node(body, env)?;
            }
            Ok(new_handle(Value::Unknown))
        }
    }
}

fn as_boolean(node: &Node, env: &mut Environment, context: &str) -> Result<bool> {
    match execute_node(node, env)?.borrow().clone() {
        Value::Boolean(b) => Ok(b),
        other => Err(InterpError::ty(format!(
            "{context} must evaluate to a boolean, got {}",
            other.type_name()
        ))),
    }
}

/// Executes a statement list. `fresh_scope` is false only for a user
/// function's body, which reuses the scope already pushed by `execute_call`
/// (SPEC_FULL.md §4.3, the "pre-made scope" case).
fn execute_block(stmts: &[Rc<Node>], env: &mut Environment, fresh_scope: bool) -> Result<Handle> {
    if fresh_scope {
        env.push_scope();
    }
    let mut result = new_handle(Value::Unknown);
    for stmt in stmts {
        result = execute_node(stmt, env)?;
    }
    if fresh_scope {
        env.pop_scope();
    }
    Ok(result)
}

fn execute_call(name: &str, arg_exprs: &[Rc<Node>], env: &mut Environment) -> Result<Handle> {
    let mut arg_handles = Vec::with_capacity(arg_exprs.len());
    for expr in arg_exprs {
        arg_handles.push(execute_node(expr, env)?);
    }

    if let Some(builtin) = builtins::lookup(name) {
        let values: Vec<Value> = arg_handles.iter().map(|h| h.borrow().clone()).collect();
        let result = builtin(&values)?;
        return Ok(new_handle(result));
    }

    let func = env.lookup_func(name)?;
    if func.params().len() != arg_handles.len() {
        return Err(InterpError::arity(format!(
            "function '{name}' expects {} argument(s), got {}",
            func.params().len(),
            arg_handles.len()
        )));
    }

    env.push_scope();
    for (param, handle) in func.params().iter().zip(arg_handles) {
        env.bind_param(param, handle);
    }

    if let Some(body) = func.body() {
        if let Node::Block(stmts) = body.as_ref() {
            execute_block(stmts, env, false)?;
        }
    }
    // A declared-but-unimplemented function is a no-op, not an error.

    env.pop_scope();

    Ok(new_handle(Value::Unknown))
}
