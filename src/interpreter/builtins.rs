use crate::value::Value;

/// Calls the built-in `name`, or returns `None` when there is no such built-in.
/// Built-ins are resolved before the subroutine registry, so a user
/// subroutine called `INT` or `LENGTH` is never reached from an expression.
/// Missing arguments read as the undefined value.
pub fn call_builtin(name: &str, args: &[Value]) -> Option<Value> {
    let arg = args.first().unwrap_or(&Value::Null);
    match name.to_ascii_uppercase().as_str() {
        "INT" => Some(builtin_int(arg)),
        "LENGTH" => Some(builtin_length(arg)),
        _ => None,
    }
}

/// `INT(x)`: floor of the numeric value, so `INT(-2.5)` is `-3`.
pub fn builtin_int(arg: &Value) -> Value {
    Value::Number(arg.to_number().floor())
}

/// `LENGTH(x)`: character count of the rendered value.
pub fn builtin_length(arg: &Value) -> Value {
    Value::Number(arg.to_string().chars().count() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_floors() {
        assert_eq!(builtin_int(&Value::Number(7.9)), Value::Number(7.0));
        assert_eq!(builtin_int(&Value::Number(-2.5)), Value::Number(-3.0));
        assert_eq!(builtin_int(&Value::string("4.2")), Value::Number(4.0));
    }

    #[test]
    fn test_length_counts_rendered_characters() {
        assert_eq!(builtin_length(&Value::string("héllo")), Value::Number(5.0));
        assert_eq!(builtin_length(&Value::Number(12.5)), Value::Number(4.0));
        assert_eq!(builtin_length(&Value::Bool(true)), Value::Number(4.0));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(call_builtin("length", &[]), Some(Value::Number(0.0)));
        assert_eq!(call_builtin("Int", &[Value::Number(3.5)]), Some(Value::Number(3.0)));
        assert_eq!(call_builtin("SQRT", &[]), None);
    }
}
