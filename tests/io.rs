mod common;

use common::run_with_input;
use pseudocode::interpreter::{
    InputProvider, Interpreter, NoInput, OutputSink, RuntimeError, ScriptedInput,
};
use pseudocode::{parse_program, run_source, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_numeric_input_is_stored_as_number() {
    let source = "DECLARE N : INTEGER\nINPUT N\nOUTPUT N + 1";
    assert_eq!(run_with_input(source, &["41"]), vec!["42"]);
}

#[test]
fn test_text_input_is_stored_verbatim() {
    let source = "DECLARE Name : STRING\nINPUT Name\nOUTPUT \"Hello, \" + Name";
    assert_eq!(run_with_input(source, &["Ada Lovelace"]), vec!["Hello, Ada Lovelace"]);
}

#[test]
fn test_numeric_looking_input_into_string_variable_becomes_number() {
    let source = "DECLARE Code : STRING\nINPUT Code\nOUTPUT Code = 7";
    assert_eq!(run_with_input(source, &["7"]), vec!["TRUE"]);
}

#[test]
fn test_blank_input_counts_as_zero() {
    let source = "DECLARE N : INTEGER\nINPUT N\nOUTPUT N = 0";
    assert_eq!(run_with_input(source, &[""]), vec!["TRUE"]);
}

#[test]
fn test_input_into_record_field_is_rejected() {
    let source = "TYPE P\n  DECLARE X : INTEGER\nENDTYPE\nDECLARE p : P\nINPUT p";
    let program = parse_program(source).expect("parses");
    let mut interpreter = Interpreter::new(ScriptedInput::new(["1"]), Vec::<String>::new());
    let err = interpreter.run(&program).unwrap_err();
    assert!(matches!(err, RuntimeError::NotAScalar { shape: "a record", .. }));
}

#[test]
fn test_prompt_is_the_variable_name() {
    let program = parse_program("DECLARE Age, Height : INTEGER\nINPUT Age\nINPUT Height").expect("parses");
    let mut interpreter = Interpreter::new(ScriptedInput::new(["12", "150"]), Vec::<String>::new());
    interpreter.run(&program).expect("runs");
    assert_eq!(interpreter.input().prompts(), ["Age", "Height"]);
    assert_eq!(interpreter.input().remaining(), 0);
}

#[test]
fn test_missing_input_is_an_error() {
    let program = parse_program("DECLARE N : INTEGER\nOUTPUT \"ready\"\nINPUT N").expect("parses");
    let mut interpreter = Interpreter::new(NoInput, Vec::<String>::new());
    let err = interpreter.run(&program).unwrap_err();
    assert_eq!(err, RuntimeError::input_unavailable("N"));
    assert_eq!(interpreter.output(), &vec!["ready".to_string()]);
}

/// Records prompts and output lines in one shared transcript.
#[derive(Clone, Default)]
struct Transcript(Rc<RefCell<Vec<String>>>);

impl InputProvider for Transcript {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        self.0.borrow_mut().push(format!("? {}", prompt));
        Some("5".to_string())
    }
}

impl OutputSink for Transcript {
    fn emit(&mut self, line: &str) {
        self.0.borrow_mut().push(format!("> {}", line));
    }
}

#[test]
fn test_output_and_input_interleave_in_program_order() {
    let transcript = Transcript::default();
    let source = "DECLARE A, B : INTEGER\nOUTPUT \"first?\"\nINPUT A\nOUTPUT \"second?\"\nINPUT B\nOUTPUT A * B";
    run_source(source, transcript.clone(), transcript.clone()).expect("runs");
    assert_eq!(
        *transcript.0.borrow(),
        vec!["> first?", "? A", "> second?", "? B", "> 25"]
    );
}

#[test]
fn test_run_source_returns_the_sink() {
    let lines = run_source("OUTPUT 1\nOUTPUT 2", NoInput, Vec::<String>::new()).expect("runs");
    assert_eq!(lines, vec!["1", "2"]);
}

#[test]
fn test_memory_view_between_runs() {
    let program = parse_program("DECLARE N : INTEGER\nINPUT N").expect("parses");
    let mut interpreter = Interpreter::new(ScriptedInput::new(["3"]), Vec::<String>::new());
    interpreter.run(&program).expect("runs");
    let stored = interpreter.memory()["N"].scalar_value().cloned();
    assert_eq!(stored, Some(Value::Number(3.0)));
}
