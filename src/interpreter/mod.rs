pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod io;
pub mod parser;

pub use environment::{ArrayStore, Cell, Environment, Frame, Storage};
pub use error::{Error, ParseError, RuntimeError, SyntaxError};
pub use evaluator::{
    parse_and_run, parse_and_run_capturing, parse_and_run_with_diagnostics, Interpreter,
};
pub use io::{InputProvider, NoInput, OutputSink, ScriptedInput, StdinInput, StdoutSink};
pub use parser::TokenParser;
