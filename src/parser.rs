//! Textual grammar for the language, producing a tree of tagged parse nodes
//! rather than values directly. Tags record the matched rule path
//! (`expr|number|integer|regex`, `expr|sexpr|>`, ...) and list nodes keep
//! their literal bracket characters as `char` children; the reader module
//! classifies nodes by tag substring and skips the structural artifacts.
//!
//! Grammar:
//!
//! ```text
//! decimal : /-?[0-9]+\.[0-9]+/
//! integer : /-?[0-9]+/
//! number  : <decimal> | <integer>
//! symbol  : /[a-zA-Z0-9_+\-*\/\\=<>!&%]+/
//! sexpr   : '(' <expr>* ')'
//! qexpr   : '{' <expr>* '}'
//! expr    : <number> | <symbol> | <sexpr> | <qexpr>
//! program : /^/ <expr>+ /$/
//! ```

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0},
    combinator::{cut, opt, recognize},
    error::ErrorKind,
    multi::{many0, many1},
    sequence::{pair, preceded, terminated},
};

use crate::MAX_PARSE_DEPTH;
use crate::{ParseError, ParseErrorKind};

/// One node of the parse tree: a rule-path tag, the matched text for leaves,
/// and child nodes for lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    pub tag: String,
    pub contents: String,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    fn leaf(tag: &str, contents: &str) -> ParseNode {
        ParseNode {
            tag: tag.to_owned(),
            contents: contents.to_owned(),
            children: Vec::new(),
        }
    }

    fn branch(tag: &str, children: Vec<ParseNode>) -> ParseNode {
        ParseNode {
            tag: tag.to_owned(),
            contents: String::new(),
            children,
        }
    }
}

/// Characters allowed in symbol names besides ASCII alphanumerics
const SYMBOL_SPECIAL_CHARS: &str = "_+-*/\\=<>!&%";

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || SYMBOL_SPECIAL_CHARS.contains(c)
}

/// Parse a decimal literal (sign, digits, dot, digits)
fn parse_decimal(input: &str) -> IResult<&str, ParseNode> {
    let (input, matched) =
        recognize((opt(char('-')), digit1, char('.'), digit1)).parse(input)?;
    Ok((input, ParseNode::leaf("expr|number|decimal|regex", matched)))
}

/// Parse an integer literal (sign, digits)
fn parse_integer(input: &str) -> IResult<&str, ParseNode> {
    let (input, matched) = recognize(pair(opt(char('-')), digit1)).parse(input)?;
    Ok((input, ParseNode::leaf("expr|number|integer|regex", matched)))
}

/// Parse a symbol (identifier or operator name)
fn parse_symbol(input: &str) -> IResult<&str, ParseNode> {
    let (input, matched) = take_while1(is_symbol_char).parse(input)?;
    Ok((input, ParseNode::leaf("expr|symbol|regex", matched)))
}

/// Parse a bracketed list, keeping the bracket characters as child nodes
fn parse_list<'a>(
    input: &'a str,
    open: char,
    close: char,
    tag: &str,
    depth: usize,
) -> IResult<&'a str, ParseNode> {
    let (input, _) = char(open).parse(input)?;
    let (input, exprs) = many0(|input| {
        preceded(multispace0, |input| parse_expr(input, depth + 1)).parse(input)
    })
    .parse(input)?;
    let (input, _) = multispace0.parse(input)?;
    // cut: once the opening bracket matched, a missing close is a hard failure
    let (input, _) = cut(char(close)).parse(input)?;

    let mut children = Vec::with_capacity(exprs.len() + 2);
    children.push(ParseNode::leaf("char", &open.to_string()));
    children.extend(exprs);
    children.push(ParseNode::leaf("char", &close.to_string()));
    Ok((input, ParseNode::branch(tag, children)))
}

/// Parse a single expression, depth-limited
fn parse_expr(input: &str, depth: usize) -> IResult<&str, ParseNode> {
    if depth >= MAX_PARSE_DEPTH {
        // Failure so the depth limit surfaces instead of being backtracked away
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::TooLarge,
        )));
    }
    alt((
        parse_decimal,
        parse_integer,
        parse_symbol,
        |input| parse_list(input, '(', ')', "expr|sexpr|>", depth),
        |input| parse_list(input, '{', '}', "expr|qexpr|>", depth),
    ))
    .parse(input)
}

/// Convert nom parsing errors to a kinded [`ParseError`]
fn parse_error_from_nom(input: &str, error: nom::Err<nom::error::Error<&str>>) -> ParseError {
    match error {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let position = input.len().saturating_sub(e.input.len());
            if e.code == ErrorKind::TooLarge {
                ParseError::new(
                    ParseErrorKind::TooDeeplyNested,
                    format!("expression too deeply nested (max depth: {MAX_PARSE_DEPTH})"),
                )
            } else if position >= input.len() {
                ParseError::new(ParseErrorKind::Incomplete, "unexpected end of input")
            } else {
                let near: String = input.chars().skip(position).take(10).collect();
                ParseError::new(
                    ParseErrorKind::InvalidSyntax,
                    format!("invalid syntax near '{near}'"),
                )
            }
        }
        nom::Err::Incomplete(_) => {
            ParseError::new(ParseErrorKind::Incomplete, "incomplete input")
        }
    }
}

/// Parse one line of input into a parse tree.
///
/// The root node has tag `>` and wraps the parsed expressions in a pair of
/// empty `regex` boundary nodes (the anchors of the `program` rule). Leftover
/// non-whitespace input after a valid prefix is rejected as
/// [`ParseErrorKind::TrailingContent`].
pub fn parse(input: &str) -> Result<ParseNode, ParseError> {
    let result = terminated(
        many1(|input| preceded(multispace0, |input| parse_expr(input, 0)).parse(input)),
        multispace0,
    )
    .parse(input);

    match result {
        Ok(("", exprs)) => {
            let mut children = Vec::with_capacity(exprs.len() + 2);
            children.push(ParseNode::leaf("regex", ""));
            children.extend(exprs);
            children.push(ParseNode::leaf("regex", ""));
            Ok(ParseNode::branch(">", children))
        }
        Ok((remaining, _)) => {
            let near: String = remaining.chars().take(10).collect();
            Err(ParseError::new(
                ParseErrorKind::TrailingContent,
                format!("unexpected trailing content '{near}'"),
            ))
        }
        Err(e) => Err(parse_error_from_nom(input, e)),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)]
mod parser_tests {
    use super::*;

    fn leaf(tag: &str, contents: &str) -> ParseNode {
        ParseNode::leaf(tag, contents)
    }

    #[test]
    fn test_parse_tree_shape_sexpr() {
        let tree = parse("(+ 1 2)").unwrap();
        assert_eq!(tree.tag, ">");
        assert_eq!(tree.children.len(), 3); // boundary, sexpr, boundary
        assert_eq!(tree.children[0], leaf("regex", ""));
        assert_eq!(tree.children[2], leaf("regex", ""));

        let sexpr = &tree.children[1];
        assert_eq!(sexpr.tag, "expr|sexpr|>");
        assert_eq!(
            sexpr.children,
            vec![
                leaf("char", "("),
                leaf("expr|symbol|regex", "+"),
                leaf("expr|number|integer|regex", "1"),
                leaf("expr|number|integer|regex", "2"),
                leaf("char", ")"),
            ]
        );
    }

    #[test]
    fn test_parse_tree_shape_qexpr() {
        let tree = parse("{1 2.5}").unwrap();
        let qexpr = &tree.children[1];
        assert_eq!(qexpr.tag, "expr|qexpr|>");
        assert_eq!(
            qexpr.children,
            vec![
                leaf("char", "{"),
                leaf("expr|number|integer|regex", "1"),
                leaf("expr|number|decimal|regex", "2.5"),
                leaf("char", "}"),
            ]
        );
    }

    #[test]
    fn test_multiple_expressions_on_one_line() {
        let tree = parse("+ 1 2").unwrap();
        assert_eq!(tree.tag, ">");
        // boundary + three expressions + boundary
        assert_eq!(tree.children.len(), 5);
        assert_eq!(tree.children[1], leaf("expr|symbol|regex", "+"));
    }

    #[test]
    fn test_negative_numbers_and_symbols() {
        let tree = parse("-12 -3.5 -").unwrap();
        assert_eq!(
            tree.children[1],
            leaf("expr|number|integer|regex", "-12")
        );
        assert_eq!(
            tree.children[2],
            leaf("expr|number|decimal|regex", "-3.5")
        );
        // A lone minus is a symbol, not a number
        assert_eq!(tree.children[3], leaf("expr|symbol|regex", "-"));
    }

    #[test]
    fn test_parse_errors_data_driven() {
        let deep = "(".repeat(MAX_PARSE_DEPTH + 1) + "1" + &")".repeat(MAX_PARSE_DEPTH + 1);
        let test_cases = vec![
            ("(1 2", ParseErrorKind::Incomplete),
            ("{1 2", ParseErrorKind::Incomplete),
            ("", ParseErrorKind::Incomplete),
            ("   ", ParseErrorKind::Incomplete),
            ("1 2)", ParseErrorKind::TrailingContent),
            (")", ParseErrorKind::InvalidSyntax),
            ("(1))", ParseErrorKind::TrailingContent),
            (deep.as_str(), ParseErrorKind::TooDeeplyNested),
        ];

        for (i, (input, expected_kind)) in test_cases.iter().enumerate() {
            let error = parse(input).unwrap_err();
            assert_eq!(
                error.kind,
                *expected_kind,
                "Parse error case {} failed for input {:?}: got {:?} ({})",
                i + 1,
                input,
                error.kind,
                error.message
            );
        }
    }

    #[test]
    fn test_nesting_at_limit_is_accepted() {
        let depth = MAX_PARSE_DEPTH - 1;
        let input = "(".repeat(depth) + "1" + &")".repeat(depth);
        assert!(parse(&input).is_ok());
    }
}
