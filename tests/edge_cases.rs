mod common;

use common::{final_memory, run};
use pseudocode::interpreter::{parse_and_run_capturing, Interpreter, NoInput};
use pseudocode::lexer::tokenize;
use pseudocode::parse_program;

const SAMPLE: &str = "TYPE Point\n  DECLARE X : INTEGER\n  DECLARE Y : INTEGER\nENDTYPE\n\
                      DECLARE P : Point\nDECLARE Squares : ARRAY[1:4] OF INTEGER\nDECLARE Total : INTEGER\n\
                      FUNCTION Sq(n : INTEGER) RETURNS INTEGER\n  RETURN n * n\nENDFUNCTION\n\
                      FOR i ← 1 TO 4\n  Squares[i] ← Sq(i)\n  Total ← Total + Squares[i]\nNEXT i\n\
                      P.X ← Total DIV 3\nP.Y ← Total MOD 3\nOUTPUT Total, \" \", P.X, \" \", P.Y";

#[test]
fn test_runs_are_deterministic() {
    let (first_output, first_memory) = parse_and_run_capturing(SAMPLE, &[]);
    let (second_output, second_memory) = parse_and_run_capturing(SAMPLE, &[]);
    assert_eq!(first_output, vec!["30 10 0"]);
    assert_eq!(first_output, second_output);
    assert_eq!(first_memory.expect("runs"), second_memory.expect("runs"));
}

#[test]
fn test_rerunning_one_interpreter_starts_fresh() {
    let program = parse_program(SAMPLE).expect("parses");
    let mut interpreter = Interpreter::new(NoInput, Vec::<String>::new());
    interpreter.run(&program).expect("first run");
    let after_first = interpreter.snapshot();
    interpreter.run(&program).expect("second run");
    assert_eq!(interpreter.output(), &vec!["30 10 0".to_string(), "30 10 0".to_string()]);
    assert_eq!(interpreter.snapshot(), after_first);
}

#[test]
fn test_separate_interpreters_do_not_share_state() {
    let counter = parse_program("DECLARE C : INTEGER\nC ← C + 1\nOUTPUT C").expect("parses");
    let mut a = Interpreter::new(NoInput, Vec::<String>::new());
    let mut b = Interpreter::new(NoInput, Vec::<String>::new());
    a.run(&counter).expect("runs");
    b.run(&counter).expect("runs");
    a.run(&counter).expect("runs");
    assert_eq!(a.output(), &vec!["1".to_string(), "1".to_string()]);
    assert_eq!(b.output(), &vec!["1".to_string()]);
}

#[test]
fn test_arrow_spellings_scan_identically() {
    let unicode = tokenize("X ← 1").expect("scans");
    let ascii = tokenize("X <- 1").expect("scans");
    let unicode_tokens: Vec<_> = unicode.iter().map(|t| t.token.clone()).collect();
    let ascii_tokens: Vec<_> = ascii.iter().map(|t| t.token.clone()).collect();
    assert_eq!(unicode_tokens, ascii_tokens);
}

#[test]
fn test_less_than_minus_is_assignment() {
    // `<-` always scans as the arrow, so a comparison with a negative
    // number needs a space.
    assert_eq!(run("DECLARE X : INTEGER\nX ← 1\nOUTPUT X < -2"), vec!["FALSE"]);
}

#[test]
fn test_redeclaration_keeps_value() {
    let source = "DECLARE X : INTEGER\nX ← 5\nDECLARE X : STRING\nOUTPUT X";
    assert_eq!(run(source), vec!["5"]);
}

#[test]
fn test_constant_redefinition_is_ignored() {
    assert_eq!(run("CONSTANT Max ← 10\nCONSTANT Max ← 20\nOUTPUT Max"), vec!["10"]);
}

#[test]
fn test_loop_variable_is_declared_implicitly() {
    let memory = final_memory("FOR Counter ← 1 TO 3\nNEXT Counter");
    assert_eq!(memory.keys().collect::<Vec<_>>(), vec!["COUNTER"]);
}

#[test]
fn test_next_on_following_line_is_not_swallowed() {
    let source = "DECLARE Y : INTEGER\nFOR i ← 1 TO 2\nNEXT\nY ← 7\nOUTPUT Y";
    assert_eq!(run(source), vec!["7"]);
}

#[test]
fn test_comment_between_statements() {
    let source = "OUTPUT 1 // trailing\n/* block\ncomment */ OUTPUT 2";
    assert_eq!(run(source), vec!["1", "2"]);
}

#[test]
fn test_large_integers_render_without_exponent() {
    assert_eq!(run("OUTPUT 1000000 * 1000000"), vec!["1000000000000"]);
}
