use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A scalar runtime value. Arrays and records live in value cells, never here.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Result of a procedure, or of a function that never reached `RETURN`.
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
}

impl Value {
    pub fn string(text: impl AsRef<str>) -> Self {
        Value::String(Rc::from(text.as_ref()))
    }

    /// Default value for a scalar of the named type.
    pub fn default_for(type_name: &str) -> Self {
        match type_name.to_ascii_uppercase().as_str() {
            "INTEGER" | "REAL" => Value::Number(0.0),
            "BOOLEAN" => Value::Bool(false),
            _ => Value::string(""),
        }
    }

    /// Interprets text supplied to `INPUT`: numeric text becomes a number,
    /// anything else is kept verbatim. Blank text counts as zero.
    pub fn from_input(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Value::Number(0.0);
        }
        match parse_numeric(trimmed) {
            Some(n) => Value::Number(n),
            None => Value::string(text),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
        }
    }

    /// Numeric coercion used by the arithmetic operators.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => f64::NAN,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    parse_numeric(trimmed).unwrap_or(f64::NAN)
                }
            }
        }
    }

}

/// Decimal literal text such as `12`, `-3.5` or `2e3`. Spelled-out
/// infinities and `NaN` are not numbers.
fn parse_numeric(text: &str) -> Option<f64> {
    let numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if numeric {
        text.parse().ok()
    } else {
        None
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponent_form(n)
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Shortest exponent form with an explicit sign on the exponent: `1e+21`, `1.5e-7`.
fn exponent_form(n: f64) -> String {
    let text = format!("{:e}", n);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => write!(f, "TRUE"),
            Value::Bool(false) => write!(f, "FALSE"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

/// `+`: concatenates when either side is text, otherwise adds numerically.
pub fn add(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            Value::string(format!("{}{}", left, right))
        }
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

/// `DIV`: float division floored toward negative infinity.
pub fn int_div(left: &Value, right: &Value) -> Value {
    Value::Number((left.to_number() / right.to_number()).floor())
}

/// `MOD`: host remainder, so the sign follows the dividend (`-7 MOD 3 = -1`).
pub fn modulo(left: &Value, right: &Value) -> Value {
    Value::Number(left.to_number() % right.to_number())
}

/// Ordering for `<`, `>`, `<=`, `>=`. Text compares lexicographically, every
/// other pairing numerically. `None` when either side is NaN.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}
