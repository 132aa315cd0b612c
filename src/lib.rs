pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod format;
pub mod interpreter;
pub mod lexer;
pub mod token;
pub mod value;

pub use ast::{Expr, Program, Stmt};
pub use interpreter::{Error, Interpreter};
pub use token::{Keyword, SpannedToken, Token};
pub use value::Value;

/// Scans and parses `source` into a program tree.
pub fn parse_program(source: &str) -> Result<Program, Error> {
    let tokens = lexer::tokenize(source)?;
    let program = interpreter::TokenParser::new(tokens, source.len()).parse()?;
    Ok(program)
}

/// Runs `source` to completion against the given capabilities.
pub fn run_source<I, O>(source: &str, input: I, output: O) -> Result<O, Error>
where
    I: interpreter::InputProvider,
    O: interpreter::OutputSink,
{
    let program = parse_program(source)?;
    let mut interpreter = Interpreter::new(input, output);
    interpreter.run(&program)?;
    let (_, output) = interpreter.into_parts();
    Ok(output)
}
