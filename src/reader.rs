//! Conversion from the tagged parse tree to runtime values. Nodes are
//! classified by tag substring, number before symbol before the list forms,
//! and list children skip the structural artifacts the parser keeps around
//! (bracket `char` nodes and the `regex` boundary nodes of the root rule).

use crate::Error;
use crate::ast::Value;
use crate::parser::ParseNode;

fn read_number(node: &ParseNode) -> Value {
    match node.contents.parse::<f64>() {
        Ok(x) if x.is_finite() => Value::num(x),
        _ => Value::Err(Error::InvalidNumber(node.contents.clone())),
    }
}

fn is_structural(child: &ParseNode) -> bool {
    matches!(child.contents.as_str(), "(" | ")" | "{" | "}") || child.tag == "regex"
}

/// Read a parse node into a [`Value`]. The root `>` node reads as an
/// S-expression holding every top-level expression on the line.
pub fn read(node: &ParseNode) -> Value {
    if node.tag.contains("number") {
        return read_number(node);
    }
    if node.tag.contains("symbol") {
        return Value::Sym(node.contents.clone());
    }

    let cells: Vec<Value> = node
        .children
        .iter()
        .filter(|child| !is_structural(child))
        .map(read)
        .collect();

    if node.tag.contains("qexpr") {
        Value::Qexpr(cells)
    } else {
        Value::Sexpr(cells)
    }
}
