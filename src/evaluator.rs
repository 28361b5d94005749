//! The global environment and the recursive reduction of S-expressions.
//!
//! Evaluation is call-by-value and errors are ordinary values: the children
//! of an S-expression are all evaluated first, the leftmost error among them
//! (if any) becomes the result, and otherwise the head is applied to the
//! rest. Symbols resolve through the single [`Environment`]; a zero-arity
//! builtin resolved from a bare symbol is invoked on the spot, which is what
//! makes `vars`, `reserved` and `exit` usable without parentheses.

use crate::Error;
use crate::ast::Value;
use crate::builtinops;
use std::collections::HashMap;

/// One entry in the environment. The reserved flag replaces a separate
/// reserved-name table: it travels with the binding, so the two can never
/// fall out of sync.
#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    reserved: bool,
}

/// The single global name table. Builtins are installed reserved at startup;
/// `def` may overwrite anything that is not reserved.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// Look up a name. The value comes back as a deep copy; an absent name
    /// yields `Err(UnboundSymbol)` as a value, not a Rust error.
    pub fn get(&self, name: &str) -> Value {
        match self.bindings.get(name) {
            Some(binding) => binding.value.clone(),
            None => Value::Err(Error::UnboundSymbol(name.to_owned())),
        }
    }

    /// Insert or overwrite a binding. An existing binding keeps its reserved
    /// flag. Always succeeds; reserved-name rejection is `def`'s concern.
    pub fn put(&mut self, name: &str, value: Value) {
        match self.bindings.get_mut(name) {
            Some(binding) => binding.value = value,
            None => {
                self.bindings.insert(
                    name.to_owned(),
                    Binding {
                        value,
                        reserved: false,
                    },
                );
            }
        }
    }

    /// Insert a binding and mark its name reserved
    pub fn put_reserved(&mut self, name: &str, value: Value) {
        self.bindings.insert(
            name.to_owned(),
            Binding {
                value,
                reserved: true,
            },
        );
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.bindings
            .get(name)
            .is_some_and(|binding| binding.reserved)
    }

    /// All bound names, sorted
    pub fn bound_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }

    /// All reserved names, sorted
    pub fn reserved_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, binding)| binding.reserved)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

/// Create a fresh environment with every builtin installed reserved
pub fn default_env() -> Environment {
    let mut env = Environment::new();
    builtinops::install_builtins(&mut env);
    env
}

/// Evaluate a value against the environment.
///
/// Symbols resolve through the environment; a zero-arity function found this
/// way is invoked immediately, receiving its own function value as the
/// argument. S-expressions reduce via [`eval_sexpr`]. Everything else,
/// Q-expressions included, is self-evaluating.
pub fn eval(env: &mut Environment, value: Value) -> Value {
    match value {
        Value::Sym(name) => {
            let bound = env.get(&name);
            if let Value::Fun { arity: 0, func, .. } = &bound {
                let func = *func;
                return func(env, bound);
            }
            bound
        }
        Value::Sexpr(cells) => eval_sexpr(env, cells),
        other => other,
    }
}

/// Reduce an S-expression: evaluate all children, propagate the leftmost
/// error, collapse empty and singleton forms, then apply head to rest.
fn eval_sexpr(env: &mut Environment, cells: Vec<Value>) -> Value {
    let mut evaluated: Vec<Value> = cells.into_iter().map(|cell| eval(env, cell)).collect();

    if let Some(pos) = evaluated.iter().position(Value::is_err) {
        return evaluated.swap_remove(pos);
    }

    if evaluated.is_empty() {
        return Value::Sexpr(evaluated);
    }
    if evaluated.len() == 1 {
        return evaluated.remove(0);
    }

    let head = evaluated.remove(0);
    match head {
        Value::Fun { func, .. } => func(env, Value::Sexpr(evaluated)),
        other => Value::Err(Error::NotAFunction(other.type_name())),
    }
}
