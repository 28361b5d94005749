//! Fixed registry of native operations.
//!
//! Every callable in the language lives in [`BUILTIN_OPS`]: list surgery
//! (`list`, `head`, `tail`, `cons`, `len`, `init`, `join`, `eval`), the
//! arithmetic fold (`+ - * / %`), variable definition (`def`) and the
//! interactive diagnostics (`vars`, `reserved`, `exit`). There are no
//! user-defined functions; the table is closed and every name in it is
//! installed reserved, so `def` can never shadow a builtin.
//!
//! All builtins share one signature ([`Builtin`]): they consume an
//! S-expression of already-evaluated arguments and return a plain [`Value`].
//! Failed validation returns a `Value::Err`; nothing here panics or aborts
//! the session.

use crate::Error;
use crate::ast::{Builtin, Value};
use crate::evaluator::{self, Environment};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Definition of a built-in operation
#[derive(Debug)]
pub struct BuiltinOp {
    /// The name the operation is bound to in the global environment
    pub name: &'static str,
    /// Expected number of arguments; -1 means variadic
    pub arity: i32,
    /// The native implementation
    pub func: Builtin,
}

/// The complete builtin table. Arity here is registry metadata; each
/// implementation still validates its own argument list so that errors carry
/// the precise count it received.
pub static BUILTIN_OPS: &[BuiltinOp] = &[
    BuiltinOp { name: "list", arity: -1, func: builtin_list },
    BuiltinOp { name: "cons", arity: -1, func: builtin_cons },
    BuiltinOp { name: "head", arity: 1, func: builtin_head },
    BuiltinOp { name: "tail", arity: 1, func: builtin_tail },
    BuiltinOp { name: "eval", arity: -1, func: builtin_eval },
    BuiltinOp { name: "join", arity: -1, func: builtin_join },
    BuiltinOp { name: "len", arity: -1, func: builtin_len },
    BuiltinOp { name: "init", arity: -1, func: builtin_init },
    BuiltinOp { name: "+", arity: -1, func: builtin_add },
    BuiltinOp { name: "-", arity: -1, func: builtin_sub },
    BuiltinOp { name: "*", arity: -1, func: builtin_mul },
    BuiltinOp { name: "/", arity: -1, func: builtin_div },
    BuiltinOp { name: "%", arity: -1, func: builtin_rem },
    BuiltinOp { name: "def", arity: -1, func: builtin_def },
    BuiltinOp { name: "vars", arity: 0, func: builtin_vars },
    BuiltinOp { name: "reserved", arity: 0, func: builtin_reserved },
    BuiltinOp { name: "exit", arity: 0, func: builtin_exit },
];

/// Name index over [`BUILTIN_OPS`]
static BUILTIN_INDEX: LazyLock<HashMap<&'static str, &'static BuiltinOp>> = LazyLock::new(|| {
    BUILTIN_OPS.iter().map(|op| (op.name, op)).collect()
});

/// Look up a builtin by name
pub fn find_op(name: &str) -> Result<&'static BuiltinOp, Error> {
    BUILTIN_INDEX
        .get(name)
        .copied()
        .ok_or_else(|| Error::UnknownFunction(name.to_owned()))
}

/// Install every builtin into the environment as a reserved binding
pub fn install_builtins(env: &mut Environment) {
    for op in BUILTIN_OPS {
        env.put_reserved(
            op.name,
            Value::Fun {
                name: op.name,
                arity: op.arity,
                func: op.func,
            },
        );
    }
}

/// Early-return a `Value::Err` unless the condition holds
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Value::Err($err);
        }
    };
}

/// Unwrap a `Result<_, Error>` or early-return its error as a value
macro_rules! try_err {
    ($expr:expr) => {
        match $expr {
            Ok(ok) => ok,
            Err(e) => return Value::Err(e),
        }
    };
}

//
// Argument helpers
//

/// Unpack the consumed argument S-expression into its cells
fn into_cells(args: Value) -> Vec<Value> {
    match args {
        Value::Sexpr(cells) => cells,
        other => vec![other],
    }
}

fn expect_args(cells: Vec<Value>, func: &'static str, expected: usize) -> Result<Vec<Value>, Error> {
    if cells.len() == expected {
        Ok(cells)
    } else {
        Err(Error::arity(func, expected, cells.len()))
    }
}

fn expect_qexpr(value: Value, func: &'static str, index: usize) -> Result<Vec<Value>, Error> {
    match value {
        Value::Qexpr(cells) => Ok(cells),
        other => Err(Error::type_mismatch(
            func,
            index,
            "Q-Expression",
            other.type_name(),
        )),
    }
}

fn numeric_operands(cells: &[Value]) -> Result<Vec<f64>, Error> {
    cells
        .iter()
        .map(|cell| match cell {
            Value::Int(n) => Ok(*n as f64),
            Value::Dec(x) => Ok(*x),
            _ => Err(Error::non_number()),
        })
        .collect()
}

//
// List operations
//

/// `list`: re-tag the argument S-expression as a literal Q-expression
fn builtin_list(_env: &mut Environment, args: Value) -> Value {
    match args {
        Value::Sexpr(cells) => Value::Qexpr(cells),
        other => other,
    }
}

/// `head`: first element of a non-empty Q-expression, as a Q-expression
fn builtin_head(_env: &mut Environment, args: Value) -> Value {
    let cells = try_err!(expect_args(into_cells(args), "head", 1));
    let mut list = try_err!(expect_qexpr(
        cells.into_iter().next().unwrap_or(Value::Sexpr(vec![])),
        "head",
        0
    ));
    ensure!(!list.is_empty(), Error::empty_list("head", 0));
    list.truncate(1);
    Value::Qexpr(list)
}

/// `tail`: everything but the first element of a non-empty Q-expression
fn builtin_tail(_env: &mut Environment, args: Value) -> Value {
    let cells = try_err!(expect_args(into_cells(args), "tail", 1));
    let mut list = try_err!(expect_qexpr(
        cells.into_iter().next().unwrap_or(Value::Sexpr(vec![])),
        "tail",
        0
    ));
    ensure!(!list.is_empty(), Error::empty_list("tail", 0));
    list.remove(0);
    Value::Qexpr(list)
}

/// `cons`: prepend a value to a non-empty Q-expression
fn builtin_cons(_env: &mut Environment, args: Value) -> Value {
    let cells = try_err!(expect_args(into_cells(args), "cons", 2));
    let mut iter = cells.into_iter();
    let front = iter.next().unwrap_or(Value::Sexpr(vec![]));
    let rest = iter.next().unwrap_or(Value::Sexpr(vec![]));
    let mut list = try_err!(expect_qexpr(rest, "cons", 1));
    ensure!(!list.is_empty(), Error::empty_list("cons", 1));
    list.insert(0, front);
    Value::Qexpr(list)
}

/// `len`: element count of a Q-expression
fn builtin_len(_env: &mut Environment, args: Value) -> Value {
    let cells = try_err!(expect_args(into_cells(args), "len", 1));
    let list = try_err!(expect_qexpr(
        cells.into_iter().next().unwrap_or(Value::Sexpr(vec![])),
        "len",
        0
    ));
    Value::Int(list.len() as i64)
}

/// `init`: everything but the last element of a non-empty Q-expression
fn builtin_init(_env: &mut Environment, args: Value) -> Value {
    let cells = try_err!(expect_args(into_cells(args), "init", 1));
    let mut list = try_err!(expect_qexpr(
        cells.into_iter().next().unwrap_or(Value::Sexpr(vec![])),
        "init",
        0
    ));
    ensure!(!list.is_empty(), Error::empty_list("init", 0));
    list.pop();
    Value::Qexpr(list)
}

/// `join`: concatenate one or more Q-expressions
fn builtin_join(_env: &mut Environment, args: Value) -> Value {
    let cells = into_cells(args);
    ensure!(!cells.is_empty(), Error::arity("join", 1, 0));
    let mut joined = Vec::new();
    for (index, cell) in cells.into_iter().enumerate() {
        let list = try_err!(expect_qexpr(cell, "join", index));
        joined.extend(list);
    }
    Value::Qexpr(joined)
}

/// `eval`: re-tag a Q-expression as an S-expression and reduce it
fn builtin_eval(env: &mut Environment, args: Value) -> Value {
    let cells = try_err!(expect_args(into_cells(args), "eval", 1));
    let list = try_err!(expect_qexpr(
        cells.into_iter().next().unwrap_or(Value::Sexpr(vec![])),
        "eval",
        0
    ));
    evaluator::eval(env, Value::Sexpr(list))
}

//
// Arithmetic
//

/// Fold the operands under the named operator. All arithmetic runs in `f64`
/// and the result is re-tagged by [`Value::num`], so integral results come
/// back as integers regardless of operand tags.
fn builtin_op(args: Value, op: &'static str) -> Value {
    let cells = into_cells(args);
    let operands = try_err!(numeric_operands(&cells));
    ensure!(!operands.is_empty(), Error::arity(op, 1, 0));

    let mut acc = operands[0];

    // Unary minus negates
    if op == "-" && operands.len() == 1 {
        return Value::num(-acc);
    }

    for &y in &operands[1..] {
        acc = match op {
            "+" => acc + y,
            "-" => acc - y,
            "*" => acc * y,
            "/" => {
                ensure!(y != 0.0, Error::DivisionByZero);
                acc / y
            }
            "%" => {
                ensure!(y != 0.0, Error::DivisionByZero);
                acc % y
            }
            _ => return Value::Err(Error::UnknownFunction(op.to_owned())),
        };
    }

    Value::num(acc)
}

macro_rules! arith_builtin {
    ($name:ident, $op:literal) => {
        fn $name(_env: &mut Environment, args: Value) -> Value {
            builtin_op(args, $op)
        }
    };
}

arith_builtin!(builtin_add, "+");
arith_builtin!(builtin_sub, "-");
arith_builtin!(builtin_mul, "*");
arith_builtin!(builtin_div, "/");
arith_builtin!(builtin_rem, "%");

//
// Definition and diagnostics
//

/// `def`: bind values to names. The first argument is a Q-expression of
/// symbols, the rest are the values, matched pairwise. Reserved names are
/// rejected before any binding happens, so a failed `def` binds nothing.
fn builtin_def(env: &mut Environment, args: Value) -> Value {
    let mut cells = into_cells(args);
    ensure!(!cells.is_empty(), Error::arity("def", 1, 0));

    let targets = try_err!(expect_qexpr(cells.remove(0), "def", 0));

    let mut names = Vec::with_capacity(targets.len());
    for (index, target) in targets.into_iter().enumerate() {
        match target {
            Value::Sym(name) => names.push(name),
            other => {
                return Value::Err(Error::type_mismatch(
                    "def",
                    index,
                    "Symbol",
                    other.type_name(),
                ));
            }
        }
    }

    for name in &names {
        ensure!(!env.is_reserved(name), Error::DefineReserved(name.clone()));
    }

    ensure!(
        names.len() == cells.len(),
        Error::arity("def", names.len(), cells.len())
    );

    for (name, value) in names.into_iter().zip(cells) {
        env.put(&name, value);
    }

    Value::Sexpr(Vec::new())
}

/// `vars`: print every bound name, sorted
fn builtin_vars(env: &mut Environment, args: Value) -> Value {
    for name in env.bound_names() {
        println!("{name}");
    }
    args
}

/// `reserved`: print every reserved name, sorted
fn builtin_reserved(env: &mut Environment, args: Value) -> Value {
    for name in env.reserved_names() {
        println!("{name}");
    }
    args
}

/// `exit`: announce and return the function value itself, which the driver
/// recognizes as the termination sentinel
fn builtin_exit(_env: &mut Environment, args: Value) -> Value {
    println!("Exiting");
    args
}
