mod common;

use common::{final_memory, run, run_with_input, scalar};
use pseudocode::Value;

#[test]
fn test_if_else() {
    let source = "DECLARE N : INTEGER\nN ← 4\nIF N MOD 2 = 0 THEN\n  OUTPUT \"even\"\nELSE\n  OUTPUT \"odd\"\nENDIF";
    assert_eq!(run(source), vec!["even"]);
}

#[test]
fn test_nested_if() {
    let source = "DECLARE Score : INTEGER\nScore ← 65\n\
                  IF Score >= 50 THEN\n  IF Score >= 70 THEN\n    OUTPUT \"Merit\"\n  ELSE\n    OUTPUT \"Pass\"\n  ENDIF\nELSE\n  OUTPUT \"Fail\"\nENDIF";
    assert_eq!(run(source), vec!["Pass"]);
}

#[test]
fn test_counted_loop() {
    let source = "DECLARE i : INTEGER\nFOR i ← 1 TO 5\n  OUTPUT \"Count: \", i\nNEXT i";
    assert_eq!(
        run(source),
        vec!["Count: 1", "Count: 2", "Count: 3", "Count: 4", "Count: 5"]
    );
}

#[test]
fn test_for_with_step() {
    assert_eq!(run("FOR i ← 0 TO 10 STEP 5\n  OUTPUT i\nNEXT i"), vec!["0", "5", "10"]);
}

#[test]
fn test_for_counting_down() {
    assert_eq!(run("FOR i ← 3 TO 1 STEP -1\n  OUTPUT i\nNEXT i"), vec!["3", "2", "1"]);
}

#[test]
fn test_for_that_never_runs() {
    assert!(run("FOR i ← 5 TO 1\n  OUTPUT i\nNEXT i").is_empty());
}

#[test]
fn test_for_without_variable_after_next() {
    assert_eq!(run("FOR i ← 1 TO 2\n  OUTPUT i\nNEXT\nOUTPUT \"done\""), vec!["1", "2", "done"]);
}

#[test]
fn test_for_end_bound_is_read_every_iteration() {
    let source = "DECLARE Limit : INTEGER\nLimit ← 10\nFOR i ← 1 TO Limit\n  Limit ← 3\n  OUTPUT i\nNEXT i";
    assert_eq!(run(source), vec!["1", "2", "3"]);
}

#[test]
fn test_for_body_can_move_the_counter() {
    let source = "FOR i ← 1 TO 10\n  OUTPUT i\n  i ← i + 4\nNEXT i";
    assert_eq!(run(source), vec!["1", "6"]);
}

#[test]
fn test_for_variable_does_not_touch_other_names() {
    let memory = final_memory("DECLARE j : INTEGER\nj ← 9\nFOR i ← 1 TO 3\n  OUTPUT i\nNEXT i");
    assert_eq!(scalar(&memory, "j"), Value::Number(9.0));
}

#[test]
fn test_nested_for_loops() {
    let source = "FOR i ← 1 TO 2\n  FOR j ← 1 TO 2\n    OUTPUT i, j\n  NEXT j\nNEXT i";
    assert_eq!(run(source), vec!["11", "12", "21", "22"]);
}

#[test]
fn test_while_may_run_zero_times() {
    let source = "DECLARE Password : STRING\nPassword ← \"9618\"\n\
                  WHILE Password <> \"9618\" DO\n  OUTPUT \"Retrying...\"\nENDWHILE\nOUTPUT \"Unlocked\"";
    assert_eq!(run(source), vec!["Unlocked"]);
}

#[test]
fn test_while_counts_down() {
    let source = "DECLARE n : INTEGER\nn ← 3\nWHILE n > 0 DO\n  OUTPUT n\n  n ← n - 1\nENDWHILE";
    assert_eq!(run(source), vec!["3", "2", "1"]);
}

#[test]
fn test_repeat_until_checks_after_body() {
    let source = "DECLARE n : INTEGER\nn ← 10\nREPEAT\n  OUTPUT n\n  n ← n + 1\nUNTIL n > 5";
    assert_eq!(run(source), vec!["10"]);
}

#[test]
fn test_repeat_with_input() {
    let source = "DECLARE Guess : INTEGER\nREPEAT\n  INPUT Guess\nUNTIL Guess = 7\nOUTPUT \"Got \", Guess";
    assert_eq!(run_with_input(source, &["3", "5", "7"]), vec!["Got 7"]);
}

#[test]
fn test_case_selector() {
    let source = "DECLARE Choice : INTEGER\nChoice ← 2\nCASE OF Choice\n  1 : OUTPUT \"First\"\n  2 : OUTPUT \"Second\"\n  OTHERWISE OUTPUT \"Default\"\nENDCASE";
    assert_eq!(run(source), vec!["Second"]);
}

#[test]
fn test_case_falls_back_to_otherwise() {
    let source = "DECLARE Choice : INTEGER\nChoice ← 9\nCASE OF Choice\n  1 : OUTPUT \"First\"\n  OTHERWISE OUTPUT \"Default\"\nENDCASE";
    assert_eq!(run(source), vec!["Default"]);
}

#[test]
fn test_case_without_match_or_otherwise() {
    let source = "DECLARE C : STRING\nC ← \"z\"\nCASE OF C\n  \"a\" : OUTPUT \"A\"\nENDCASE\nOUTPUT \"after\"";
    assert_eq!(run(source), vec!["after"]);
}

#[test]
fn test_case_runs_only_the_first_matching_clause() {
    let source = "DECLARE X : INTEGER\nX ← 1\nCASE OF X\n  1 : OUTPUT \"one\"\n  1 : OUTPUT \"again\"\nENDCASE";
    assert_eq!(run(source), vec!["one"]);
}

#[test]
fn test_case_clause_values_are_expressions() {
    let source = "DECLARE X : INTEGER\nX ← 6\nCASE OF X\n  2 * 3 : OUTPUT \"six\"\nENDCASE";
    assert_eq!(run(source), vec!["six"]);
}
