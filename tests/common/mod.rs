#![allow(dead_code)]

use pseudocode::interpreter::{
    parse_and_run, parse_and_run_capturing, Cell, Error, Frame, RuntimeError,
};
use pseudocode::Value;

pub fn run(source: &str) -> Vec<String> {
    parse_and_run(source, &[]).expect("program should succeed")
}

pub fn run_with_input(source: &str, inputs: &[&str]) -> Vec<String> {
    parse_and_run(source, inputs).expect("program should succeed")
}

/// Output joined with newlines, the way a terminal would show it.
pub fn run_text(source: &str) -> String {
    run(source).join("\n")
}

pub fn run_error(source: &str) -> Error {
    match parse_and_run(source, &[]) {
        Ok(lines) => panic!("expected failure, program printed {:?}", lines),
        Err(e) => e,
    }
}

pub fn runtime_error(source: &str) -> RuntimeError {
    match run_error(source) {
        Error::Runtime(e) => e,
        other => panic!("expected runtime error, got {}", other),
    }
}

pub fn final_memory(source: &str) -> Frame {
    parse_and_run_capturing(source, &[])
        .1
        .expect("program should succeed")
}

pub fn scalar(memory: &Frame, name: &str) -> Value {
    memory
        .get(&name.to_ascii_uppercase())
        .and_then(Cell::scalar_value)
        .cloned()
        .unwrap_or_else(|| panic!("{} is not a scalar in memory", name))
}
