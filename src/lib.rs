pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod lexer;
pub mod ops;
pub mod value;

use error::Result;

/// Lexes, parses and runs a complete program given as source text.
pub fn run_source(source: &str) -> Result<()> {
    let tokens = lexer::Lexer::new(source).tokenize()?;
    log::info!("parsing {} token(s)", tokens.len());
    let program = ast::Parser::new(tokens).parse_program()?;
    interpreter::run(&program)
}
