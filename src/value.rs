use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A function declared with `function(name, params..., body)`.
///
/// The body is kept as text; nothing evaluates it yet.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

impl fmt::Display for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "function {}({}) {{ {} }}", self.name, self.params.join(", "), self.body)
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Number(f64),
    Bool(bool),
    Function(Rc<UserFunction>),
}

impl Value {
    /// Reads a literal the way it would be typed as a call argument:
    /// numbers, `true`/`false`, double-quoted strings, anything else as text.
    pub fn parse_literal(text: &str) -> Value {
        let trimmed = text.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c)) {
                return Value::Number(n);
            }
        }
        match trimmed {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => {
                let unquoted = trimmed
                    .strip_prefix('"')
                    .and_then(|rest| rest.strip_suffix('"'))
                    .unwrap_or(trimmed);
                Value::Str(unquoted.to_string())
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Function(_) => "function",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Bool(b) => *b,
            Value::Function(_) => true,
        }
    }

    /// Strict equality: different types are never equal.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Relational ordering. Strings compare with strings; every other
    /// pairing goes through numbers. `None` means every comparison is false.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => self.as_number()?.partial_cmp(&other.as_number()?),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) if s.trim().is_empty() => Some(0.0),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Function(_) => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Function(func) => write!(f, "{}", func),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_strict_across_types() {
        assert!(!Value::from(1.0).strict_eq(&Value::from("1")));
        assert!(Value::from(1.0).strict_eq(&Value::from(1.0)));
        assert!(!Value::from(f64::NAN).strict_eq(&Value::from(f64::NAN)));
        assert!(!Value::from(true).strict_eq(&Value::from(1.0)));
    }

    #[test]
    fn ordering_coerces_mixed_operands_to_numbers() {
        assert_eq!(Value::from("2").compare(&Value::from(10.0)), Some(Ordering::Less));
        assert_eq!(Value::from("b").compare(&Value::from("abc")), Some(Ordering::Greater));
        assert_eq!(Value::from("abc").compare(&Value::from(1.0)), None);
        assert_eq!(Value::from(true).compare(&Value::from(0.5)), Some(Ordering::Greater));
    }

    #[test]
    fn truthiness() {
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::from(-1.0).is_truthy());
    }

    #[test]
    fn numbers_display_without_trailing_fraction() {
        assert_eq!(Value::from(7.0).to_string(), "7");
        assert_eq!(Value::from(-1.5).to_string(), "-1.5");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn parses_literals() {
        assert_eq!(Value::parse_literal("42"), Value::Number(42.0));
        assert_eq!(Value::parse_literal("-0.5"), Value::Number(-0.5));
        assert_eq!(Value::parse_literal("true"), Value::Bool(true));
        assert_eq!(Value::parse_literal("\"a b\""), Value::from("a b"));
        assert_eq!(Value::parse_literal("inf"), Value::from("inf"));
        assert_eq!(Value::parse_literal("x"), Value::from("x"));
    }

    #[test]
    fn bare_words_are_trimmed_like_quoted_ones() {
        assert_eq!(Value::parse_literal("x "), Value::from("x"));
        assert_eq!(Value::parse_literal("  \"a b\"\t"), Value::from("a b"));
    }

    #[test]
    fn user_functions_render_their_signature() {
        let func = UserFunction {
            name: "add".into(),
            params: vec!["a".into(), "b".into()],
            body: "a+b".into(),
        };
        assert_eq!(func.to_string(), "function add(a, b) { a+b }");
    }
}
