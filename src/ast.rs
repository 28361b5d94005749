//! Core value representation for the interpreter. The [`Value`] enum covers
//! every runtime data type: integers, decimals, computed errors, symbols,
//! builtin functions, and the two list forms (reducible S-expressions and
//! literal Q-expressions). Display logic matches the interactive printer:
//! decimals always carry two fraction digits, errors render as
//! `Error: <message>`, and lists are space-joined inside their brackets.
//! Equality compares builtin functions by name rather than function pointer.

use crate::Error;
use crate::evaluator::Environment;

/// Canonical signature of a native builtin: receives the environment and the
/// consumed argument S-expression (arguments already evaluated), returns a
/// plain `Value`. Failures are returned as `Value::Err`, never panicked.
pub type Builtin = fn(&mut Environment, Value) -> Value;

/// Core runtime value. Every container exclusively owns its children; passing
/// a `Value` moves it, `Clone` is the deep copy.
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer numbers
    Int(i64),
    /// Decimal (floating-point) numbers
    Dec(f64),
    /// A computed error, carried as an ordinary value
    Err(Error),
    /// Symbols (identifiers), meaningful only until resolved
    Sym(String),
    /// Builtin functions; `arity == -1` means variadic
    Fun {
        name: &'static str,
        arity: i32,
        func: Builtin,
    },
    /// Reducible expression list `( ... )`
    Sexpr(Vec<Value>),
    /// Literal, non-reducible list `{ ... }`
    Qexpr(Vec<Value>),
}

impl Value {
    /// Build a numeric value from a mathematical result, choosing the tag:
    /// `Int` iff the value is integral and representable as `i64`, else `Dec`.
    /// Applied after every arithmetic operation, so `(/ 5.0 2.5)` is `2`.
    pub fn num(x: f64) -> Value {
        if (x as i64) as f64 == x {
            Value::Int(x as i64)
        } else {
            Value::Dec(x)
        }
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Integer",
            Value::Dec(_) => "Decimal",
            Value::Err(_) => "Error",
            Value::Sym(_) => "Symbol",
            Value::Fun { .. } => "Function",
            Value::Sexpr(_) => "S-Expression",
            Value::Qexpr(_) => "Q-Expression",
        }
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Value::Err(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Dec(a), Value::Dec(b)) => a == b,
            (Value::Err(a), Value::Err(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            // Compare builtins by name, not function pointer
            (Value::Fun { name: a, .. }, Value::Fun { name: b, .. }) => a == b,
            (Value::Sexpr(a), Value::Sexpr(b)) => a == b,
            (Value::Qexpr(a), Value::Qexpr(b)) => a == b,
            _ => false, // Different variants are never equal
        }
    }
}

fn write_expr(
    f: &mut std::fmt::Formatter<'_>,
    cells: &[Value],
    open: char,
    close: char,
) -> std::fmt::Result {
    write!(f, "{open}")?;
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{cell}")?;
    }
    write!(f, "{close}")
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Dec(x) => write!(f, "{x:.2}"),
            Value::Err(e) => write!(f, "Error: {e}"),
            Value::Sym(s) => write!(f, "{s}"),
            Value::Fun { name, .. } => write!(f, "<function '{name}'>"),
            Value::Sexpr(cells) => write_expr(f, cells, '(', ')'),
            Value::Qexpr(cells) => write_expr(f, cells, '{', '}'),
        }
    }
}

/// Helper function for creating integer values in tests
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn int(n: i64) -> Value {
    Value::Int(n)
}

/// Helper function for creating decimal values in tests
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn dec(x: f64) -> Value {
    Value::Dec(x)
}

/// Helper function for creating symbols in tests
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn sym<S: AsRef<str>>(name: S) -> Value {
    Value::Sym(name.as_ref().to_owned())
}

/// Helper function for creating S-expressions in tests
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn sexpr(cells: Vec<Value>) -> Value {
    Value::Sexpr(cells)
}

/// Helper function for creating Q-expressions in tests
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn qexpr(cells: Vec<Value>) -> Value {
    Value::Qexpr(cells)
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn test_numeric_retagging_data_driven() {
        // (input, expected) pairs for Value::num
        let test_cases = vec![
            (0.0, Value::Int(0)),
            (5.0, Value::Int(5)),
            (-3.0, Value::Int(-3)),
            (2.0, Value::Int(2)),
            (2.5, Value::Dec(2.5)),
            (-0.75, Value::Dec(-0.75)),
            (1e18, Value::Int(1_000_000_000_000_000_000)),
            // Too large for i64, stays a decimal
            (1e19, Value::Dec(1e19)),
            (f64::INFINITY, Value::Dec(f64::INFINITY)),
        ];

        for (i, (input, expected)) in test_cases.iter().enumerate() {
            assert_eq!(
                Value::num(*input),
                *expected,
                "num retagging case {} failed for input {}",
                i + 1,
                input
            );
        }
    }

    #[test]
    fn test_display_data_driven() {
        let test_cases = vec![
            (int(42), "42"),
            (int(-17), "-17"),
            (dec(2.5), "2.50"),
            (dec(-0.75), "-0.75"),
            (sym("head"), "head"),
            (
                Value::Err(Error::DivisionByZero),
                "Error: Division By Zero!",
            ),
            (sexpr(vec![]), "()"),
            (qexpr(vec![]), "{}"),
            (
                sexpr(vec![sym("+"), int(1), int(2)]),
                "(+ 1 2)",
            ),
            (
                qexpr(vec![int(1), qexpr(vec![int(2), int(3)])]),
                "{1 {2 3}}",
            ),
        ];

        for (i, (value, expected)) in test_cases.iter().enumerate() {
            assert_eq!(
                format!("{value}"),
                *expected,
                "Display case {} failed",
                i + 1
            );
        }
    }

    #[test]
    fn test_type_names() {
        let test_cases = vec![
            (int(1), "Integer"),
            (dec(1.5), "Decimal"),
            (Value::Err(Error::DivisionByZero), "Error"),
            (sym("x"), "Symbol"),
            (sexpr(vec![]), "S-Expression"),
            (qexpr(vec![]), "Q-Expression"),
        ];

        for (value, expected) in test_cases {
            assert_eq!(value.type_name(), expected);
        }
    }

    #[test]
    fn test_function_equality_by_name() {
        fn native_a(_env: &mut Environment, args: Value) -> Value {
            args
        }
        fn native_b(_env: &mut Environment, _args: Value) -> Value {
            Value::Int(0)
        }

        let f1 = Value::Fun {
            name: "head",
            arity: 1,
            func: native_a,
        };
        let f2 = Value::Fun {
            name: "head",
            arity: 1,
            func: native_b,
        };
        let f3 = Value::Fun {
            name: "tail",
            arity: 1,
            func: native_a,
        };

        assert_eq!(f1, f2); // same name, different fn pointer
        assert_ne!(f1, f3);
        assert_ne!(f1, sym("head"));
    }
}
