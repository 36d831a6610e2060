use std::rc::Rc;

use crate::ast::Node;

/// A user function, introduced in two phases: `FuncDeclaration` fixes the
/// name and formal parameters; a later `FuncImpl` binds the body. Calling a
/// function whose body hasn't been bound yet is a no-op (SPEC_FULL.md §4.3).
#[derive(Debug, Clone)]
pub struct Function {
    params: Vec<String>,
    body: Option<Rc<Node>>,
}

impl Function {
    pub fn new(params: Vec<String>) -> Self {
        Self { params, body: None }
    }

    pub fn set_body(&mut self, body: Rc<Node>) {
        self.body = Some(body);
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn body(&self) -> Option<&Rc<Node>> {
        self.body.as_ref()
    }
}
