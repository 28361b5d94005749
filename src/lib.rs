//! qlisp - a small interactive S-expression language
//!
//! This crate implements a minimalistic Lisp dialect built around two list
//! forms: S-expressions `( ... )`, which are reduced by applying their first
//! element to the rest, and Q-expressions `{ ... }`, literal lists that are
//! the language's only data structure. There are no user-defined functions or
//! closures; the only callables are a fixed table of native builtins, and the
//! single global environment protects their names from redefinition.
//!
//! ```text
//! qlisp> (+ 1 2 3)
//! 6
//! qlisp> (head {a b c})
//! {a}
//! qlisp> (def {x y} 10 2.5)
//! ()
//! qlisp> (/ x y)
//! 4
//! ```
//!
//! ## Errors are values
//!
//! Runtime failures are not exceptional control transfers: an error is an
//! ordinary [`ast::Value`] carrying an [`Error`], propagated through the
//! evaluation tree like any other value. Evaluating an S-expression whose
//! children include an error yields the leftmost error and discards the rest.
//! Nothing in the evaluation core is process-fatal.
//!
//! ## Modules
//!
//! - `parser`: text to a tree of tagged parse nodes
//! - `reader`: tagged parse nodes to `Value`
//! - `ast`: the `Value` tagged union
//! - `builtinops`: the fixed native operation registry
//! - `evaluator`: the environment and recursive reduction

use std::fmt;

/// Maximum parsing depth to prevent stack overflow on pathological nesting.
/// Evaluation depth needs no separate cap: the language has no looping or
/// recursion construct, so evaluation nests no deeper than its input.
pub const MAX_PARSE_DEPTH: usize = 32;

/// Categorizes the different kinds of parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Invalid or unexpected syntax (bad tokens, malformed expressions)
    InvalidSyntax,
    /// Input ended before the expression was complete (unclosed parens)
    Incomplete,
    /// Expression nesting exceeded [`MAX_PARSE_DEPTH`]
    TooDeeplyNested,
    /// Extra input found after a complete, valid expression
    TrailingContent,
}

/// A parse failure, reported to the driver and never entering evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        ParseError {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ParseError: {}", self.message)
    }
}

/// Runtime error taxonomy. Every variant travels inside
/// [`ast::Value::Err`] and reaches the driver as a normal printable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Numeric literal outside the representable range
    InvalidNumber(String),
    /// Name not bound in the environment
    UnboundSymbol(String),
    /// Wrong argument count for a builtin
    ArityError {
        func: &'static str,
        expected: usize,
        got: usize,
    },
    /// Argument of the wrong value tag; the message names the offender
    TypeError(String),
    /// List-destructuring builtin given an empty Q-expression
    EmptyList { func: &'static str, index: usize },
    DivisionByZero,
    /// Attempt to apply a non-function head of an S-expression;
    /// carries the type name actually found
    NotAFunction(&'static str),
    /// Attempt to redefine a reserved/builtin name via `def`
    DefineReserved(String),
    /// Name not recognized by dispatch. Cannot occur with the closed
    /// builtin table, but handled rather than treated as fatal.
    UnknownFunction(String),
}

impl Error {
    pub fn arity(func: &'static str, expected: usize, got: usize) -> Self {
        Error::ArityError {
            func,
            expected,
            got,
        }
    }

    pub fn type_mismatch(func: &'static str, index: usize, expected: &str, got: &str) -> Self {
        Error::TypeError(format!(
            "Function '{func}' passed incorrect type for argument {index}. \
             Got {got}, expected {expected}"
        ))
    }

    pub fn non_number() -> Self {
        Error::TypeError("Cannot operate on non-number!".to_owned())
    }

    pub fn empty_list(func: &'static str, index: usize) -> Self {
        Error::EmptyList { func, index }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidNumber(literal) => write!(f, "invalid number '{literal}'"),
            Error::UnboundSymbol(name) => write!(f, "Unbound symbol '{name}'"),
            Error::ArityError {
                func,
                expected,
                got,
            } => write!(
                f,
                "Function '{func}' passed incorrect number of arguments. \
                 Got {got}, expected {expected}"
            ),
            Error::TypeError(msg) => write!(f, "{msg}"),
            Error::EmptyList { func, index } => write!(
                f,
                "Function '{func}' passed empty Q-Expression for argument {index}"
            ),
            Error::DivisionByZero => write!(f, "Division By Zero!"),
            Error::NotAFunction(got) => {
                write!(f, "First element is not a function! Got {got}")
            }
            Error::DefineReserved(name) => {
                write!(f, "Function 'def' cannot redefine reserved symbol '{name}'")
            }
            Error::UnknownFunction(name) => write!(f, "Unknown function '{name}'"),
        }
    }
}

pub mod ast;
pub mod builtinops;
pub mod evaluator;
pub mod parser;
pub mod reader;
