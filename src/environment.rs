use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Node;
use crate::error::{InterpError, Result};
use crate::function::Function;
use crate::value::{new_handle, Handle, Value};

/// A single lexical frame: a variable table and a (separately namespaced)
/// function table. Scopes are released strictly LIFO by `Environment`.
#[derive(Default)]
struct Scope {
    variables: HashMap<String, Handle>,
    functions: HashMap<String, Function>,
}

/// The LIFO stack of `Scope`s a running program executes against. The
/// bottom scope is the global scope, pre-populated with the numeric
/// constants `zero`..`nine` and the string constant `newline`.
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let mut env = Self { scopes: vec![Scope::default()] };
        env.install_globals();
        env
    }

    fn install_globals(&mut self) {
        const NUMBER_WORDS: [&str; 10] = [
            "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
        ];
        for (i, name) in NUMBER_WORDS.iter().enumerate() {
            self.scopes[0]
                .variables
                .insert((*name).to_string(), new_handle(Value::Number(i as f64)));
        }
        self.scopes[0]
            .variables
            .insert("newline".to_string(), new_handle(Value::String("\n".to_string())));
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "popped the global scope");
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare_var(&mut self, name: &str) -> Result<()> {
        let top = self.scopes.last_mut().expect("at least one scope");
        if top.variables.contains_key(name) {
            return Err(InterpError::name(format!("variable '{name}' double declared")));
        }
        top.variables.insert(name.to_string(), new_handle(Value::Unknown));
        Ok(())
    }

    pub fn declare_func(&mut self, name: &str, params: Vec<String>) -> Result<()> {
        let top = self.scopes.last_mut().expect("at least one scope");
        if top.functions.contains_key(name) {
            return Err(InterpError::name(format!("function '{name}' double declared")));
        }
        top.functions.insert(name.to_string(), Function::new(params));
        Ok(())
    }

    pub fn implement_func(&mut self, name: &str, body: Rc<Node>) -> Result<()> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(func) = scope.functions.get_mut(name) {
                func.set_body(body);
                return Ok(());
            }
        }
        Err(InterpError::name(format!("function '{name}' not declared")))
    }

    pub fn lookup_var(&self, name: &str) -> Result<Handle> {
        for scope in self.scopes.iter().rev() {
            if let Some(handle) = scope.variables.get(name) {
                return Ok(Rc::clone(handle));
            }
        }
        Err(InterpError::name(format!("undefined variable '{name}' used")))
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(handle) = scope.variables.get(name) {
                *handle.borrow_mut() = value;
                return Ok(());
            }
        }
        Err(InterpError::name(format!("undefined variable '{name}' used")))
    }

    pub fn lookup_func(&self, name: &str) -> Result<Function> {
        for scope in self.scopes.iter().rev() {
            if let Some(func) = scope.functions.get(name) {
                return Ok(func.clone());
            }
        }
        Err(InterpError::name(format!("undefined function '{name}' used")))
    }

    pub fn bind_param(&mut self, name: &str, handle: Handle) {
        self.scopes
            .last_mut()
            .expect("at least one scope")
            .variables
            .insert(name.to_string(), handle);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
