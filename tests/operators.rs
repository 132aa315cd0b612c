mod common;

use common::run;

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(run("OUTPUT 2 + 3 * 4\nOUTPUT (2 + 3) * 4"), vec!["14", "20"]);
}

#[test]
fn test_same_level_operators_are_left_associative() {
    assert_eq!(
        run("OUTPUT 10 - 4 - 3\nOUTPUT 100 / 10 / 5\nOUTPUT 2 ^ 3 ^ 2"),
        vec!["3", "2", "64"]
    );
}

#[test]
fn test_div_and_mod() {
    assert_eq!(run("OUTPUT 10 DIV 3\nOUTPUT 10 MOD 3"), vec!["3", "1"]);
}

#[test]
fn test_div_floors_toward_negative_infinity() {
    assert_eq!(run("OUTPUT -7 DIV 2\nOUTPUT 7 DIV -2"), vec!["-4", "-4"]);
}

#[test]
fn test_mod_sign_follows_dividend() {
    assert_eq!(run("OUTPUT -7 MOD 3\nOUTPUT 7 MOD -3"), vec!["-1", "1"]);
}

#[test]
fn test_concatenation_operator() {
    let source = "DECLARE First, Last : STRING\nFirst ← \"Ada\"\nLast ← \"Lovelace\"\nOUTPUT First & \" \" & Last";
    assert_eq!(run(source), vec!["Ada Lovelace"]);
}

#[test]
fn test_ampersand_renders_numbers_and_booleans() {
    assert_eq!(run("OUTPUT 3 & 4\nOUTPUT \"ok: \" & TRUE"), vec!["34", "ok: TRUE"]);
}

#[test]
fn test_plus_with_text_concatenates() {
    assert_eq!(run("OUTPUT \"5\" + 3\nOUTPUT 2 + 3"), vec!["53", "5"]);
}

#[test]
fn test_comparisons() {
    let source = "OUTPUT 3 < 4\nOUTPUT 3 >= 4\nOUTPUT 4 <= 4\nOUTPUT 5 <> 5\nOUTPUT \"abc\" < \"abd\"";
    assert_eq!(run(source), vec!["TRUE", "FALSE", "TRUE", "FALSE", "TRUE"]);
}

#[test]
fn test_equality_never_coerces() {
    assert_eq!(run("OUTPUT 5 = \"5\"\nOUTPUT TRUE = 1"), vec!["FALSE", "FALSE"]);
}

#[test]
fn test_boolean_logic() {
    let source = "DECLARE Rain, Umbrella : BOOLEAN\nRain ← TRUE\nUmbrella ← FALSE\n\
                  IF Rain AND (NOT Umbrella) THEN\n  OUTPUT \"You will get wet!\"\nENDIF";
    assert_eq!(run(source), vec!["You will get wet!"]);
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(run("OUTPUT TRUE OR FALSE AND FALSE"), vec!["TRUE"]);
    assert_eq!(run("OUTPUT (TRUE OR FALSE) AND FALSE"), vec!["FALSE"]);
}

#[test]
fn test_comparison_binds_tighter_than_and() {
    assert_eq!(run("OUTPUT 1 < 2 AND 3 > 2"), vec!["TRUE"]);
}

#[test]
fn test_unary_operators() {
    assert_eq!(run("OUTPUT -(2 + 3)\nOUTPUT NOT TRUE\nOUTPUT NOT 0"), vec!["-5", "FALSE", "TRUE"]);
}

#[test]
fn test_division_by_zero_is_not_an_error() {
    assert_eq!(run("OUTPUT 1 / 0\nOUTPUT -1 / 0"), vec!["Infinity", "-Infinity"]);
}

#[test]
fn test_arithmetic_on_non_numeric_text_is_nan() {
    assert_eq!(run("OUTPUT \"abc\" * 2"), vec!["NaN"]);
}

#[test]
fn test_spelled_out_infinity_text_is_nan() {
    assert_eq!(
        run("OUTPUT \"inf\" * 1\nOUTPUT \"infinity\" - 0\nOUTPUT -\"nan\""),
        vec!["NaN", "NaN", "NaN"]
    );
}

#[test]
fn test_extreme_magnitudes_print_in_exponent_form() {
    assert_eq!(
        run("OUTPUT 1000000000000 * 1000000000\nOUTPUT 1 / 10000000\nOUTPUT 1000000 * 1000000"),
        vec!["1e+21", "1e-7", "1000000000000"]
    );
}
