use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, delimited, fail, not, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode, ModalResult, ParserError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::{ArithOp, CompareOp, Expr, Value};

// -- Whitespace & tokens ----------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn word_boundary(input: &mut &str) -> ModalResult<()> {
    not(take_while(1, is_ident_char)).parse_next(input)
}

fn next_char(input: &mut &str) -> ModalResult<char> {
    any.parse_next(input)
}

fn quote(input: &mut &str) -> ModalResult<char> {
    one_of(['"', '\'']).parse_next(input)
}

fn minus(input: &mut &str) -> ModalResult<char> {
    '-'.parse_next(input)
}

fn cut_here(input: &&str) -> ErrMode<ContextError> {
    ErrMode::<ContextError>::from_input(input).cut()
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| is_ident_char(c) || c == '.'),
    )
        .take()
        .parse_next(input)
}

/// An identifier, or one of the literal keywords. Logical keywords are
/// rejected so `a AND b` never reads `AND` as a variable.
fn word(input: &mut &str) -> ModalResult<Expr> {
    let checkpoint = input.checkpoint();
    let name = ident.parse_next(input)?;
    match name {
        "true" => Ok(Expr::Literal(Value::Bool(true))),
        "false" => Ok(Expr::Literal(Value::Bool(false))),
        "null" => Ok(Expr::Literal(Value::Null)),
        "AND" | "and" | "OR" | "or" | "NOT" | "not" => {
            input.reset(&checkpoint);
            Err(ErrMode::<ContextError>::from_input(input))
        }
        _ => Ok(Expr::Var(name.to_owned())),
    }
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    let delim = quote(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(next_char)
            .context(StrContext::Expected(StrContextValue::CharLiteral(delim)))
            .parse_next(input)?;
        match ch {
            c if c == delim => return Ok(s),
            '\\' => {
                let esc = cut_err(next_char).parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\'' => s.push('\''),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (digit1, opt(('.', digit1))).take().parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<Value> {
    let text = number_text(input)?;
    if text.contains('.') {
        let f: f64 = text.parse().map_err(|_| cut_here(input))?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = text.parse().map_err(|_| cut_here(input))?;
        Ok(Value::Int(i))
    }
}

// -- Operators --------------------------------------------------------------

fn or_op(input: &mut &str) -> ModalResult<()> {
    alt(("||".void(), (alt(("OR", "or")), word_boundary).void())).parse_next(input)
}

fn and_op(input: &mut &str) -> ModalResult<()> {
    alt(("&&".void(), (alt(("AND", "and")), word_boundary).void())).parse_next(input)
}

fn not_op(input: &mut &str) -> ModalResult<()> {
    alt((
        ('!', not('=')).void(),
        (alt(("NOT", "not")), word_boundary).void(),
    ))
    .parse_next(input)
}

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt((
        ">=".value(CompareOp::Gte),
        ">".value(CompareOp::Gt),
        "<=".value(CompareOp::Lte),
        "<".value(CompareOp::Lt),
        "==".value(CompareOp::Eq),
        "!=".value(CompareOp::Neq),
    ))
    .parse_next(input)
}

fn additive_op(input: &mut &str) -> ModalResult<ArithOp> {
    alt(('+'.value(ArithOp::Add), '-'.value(ArithOp::Sub))).parse_next(input)
}

fn multiplicative_op(input: &mut &str) -> ModalResult<ArithOp> {
    alt((
        '*'.value(ArithOp::Mul),
        '/'.value(ArithOp::Div),
        '%'.value(ArithOp::Rem),
    ))
    .parse_next(input)
}

// -- Expressions ------------------------------------------------------------
//
// Precedence, loosest first: OR, AND, NOT, comparison, + -, * / %, unary -.
//
// `depth` counts open parentheses and unary operators above the current
// parser. Every returned tree is at most `MAX_TREE_DEPTH` deep, so neither
// parsing nor tree-walking evaluation can exhaust the stack.

/// Maximum nesting of parentheses and unary operators.
pub const MAX_NESTING: usize = 64;

/// Maximum depth of a parsed expression tree.
pub const MAX_TREE_DEPTH: usize = 128;

fn too_deep<T>(input: &mut &str) -> ModalResult<T> {
    cut_err(
        fail.context(StrContext::Label("expression nesting"))
            .context(StrContext::Expected(StrContextValue::Description(
                "a less deeply nested expression",
            ))),
    )
    .parse_next(input)
}

fn enter(input: &mut &str, depth: usize) -> ModalResult<()> {
    if depth > MAX_NESTING {
        too_deep(input)
    } else {
        Ok(())
    }
}

fn wrap(input: &mut &str, inner: Expr, node: impl FnOnce(Expr) -> Expr) -> ModalResult<Expr> {
    if inner.depth() >= MAX_TREE_DEPTH {
        return too_deep(input);
    }
    Ok(node(inner))
}

/// Left-fold `rest` onto `first`, failing once the tree would exceed
/// `MAX_TREE_DEPTH`.
fn fold_chain<T>(
    input: &mut &str,
    first: Expr,
    rest: Vec<T>,
    mut join: impl FnMut(Expr, T) -> (Expr, usize),
) -> ModalResult<Expr> {
    let mut depth = first.depth();
    let mut acc = first;
    for item in rest {
        let (next, rhs_depth) = join(acc, item);
        depth = depth.max(rhs_depth) + 1;
        if depth > MAX_TREE_DEPTH {
            return too_deep(input);
        }
        acc = next;
    }
    Ok(acc)
}

fn primary(input: &mut &str, depth: usize) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((
        delimited(
            '(',
            cut_err(|i: &mut &str| or_expr(i, depth + 1)),
            (ws, cut_err(')')),
        ),
        string_literal.map(|s| Expr::Literal(Value::String(s))),
        number.map(Expr::Literal),
        word,
    ))
    .context(StrContext::Expected(StrContextValue::Description("operand")))
    .parse_next(input)
}

fn negation(input: &mut &str, depth: usize) -> ModalResult<Expr> {
    enter(input, depth)?;
    ws.parse_next(input)?;
    if opt(minus).parse_next(input)?.is_some() {
        let inner = cut_err(|i: &mut &str| negation(i, depth + 1)).parse_next(input)?;
        wrap(input, inner, |e| Expr::Neg(Box::new(e)))
    } else {
        primary(input, depth)
    }
}

fn multiplicative(input: &mut &str, depth: usize) -> ModalResult<Expr> {
    let first = negation(input, depth)?;
    let rest: Vec<(ArithOp, Expr)> = repeat(
        0..,
        (
            preceded(ws, multiplicative_op),
            cut_err(|i: &mut &str| negation(i, depth)),
        ),
    )
    .parse_next(input)?;
    fold_chain(input, first, rest, |acc, (op, rhs)| {
        let d = rhs.depth();
        (acc.arith(op, rhs), d)
    })
}

fn additive(input: &mut &str, depth: usize) -> ModalResult<Expr> {
    let first = multiplicative(input, depth)?;
    let rest: Vec<(ArithOp, Expr)> = repeat(
        0..,
        (
            preceded(ws, additive_op),
            cut_err(|i: &mut &str| multiplicative(i, depth)),
        ),
    )
    .parse_next(input)?;
    fold_chain(input, first, rest, |acc, (op, rhs)| {
        let d = rhs.depth();
        (acc.arith(op, rhs), d)
    })
}

fn comparison(input: &mut &str, depth: usize) -> ModalResult<Expr> {
    let lhs = additive(input, depth)?;
    let rhs = opt((
        preceded(ws, compare_op),
        cut_err(|i: &mut &str| additive(i, depth)),
    ))
    .parse_next(input)?;
    match rhs {
        Some((op, rhs)) => fold_chain(input, lhs, vec![(op, rhs)], |acc, (op, rhs)| {
            let d = rhs.depth();
            (acc.compare(op, rhs), d)
        }),
        None => Ok(lhs),
    }
}

fn not_expr(input: &mut &str, depth: usize) -> ModalResult<Expr> {
    enter(input, depth)?;
    ws.parse_next(input)?;
    if opt(not_op).parse_next(input)?.is_some() {
        let inner = cut_err(|i: &mut &str| not_expr(i, depth + 1)).parse_next(input)?;
        wrap(input, inner, |e| !e)
    } else {
        comparison(input, depth)
    }
}

fn and_expr(input: &mut &str, depth: usize) -> ModalResult<Expr> {
    let first = not_expr(input, depth)?;
    let rest: Vec<Expr> = repeat(
        0..,
        preceded((ws, and_op), cut_err(|i: &mut &str| not_expr(i, depth))),
    )
    .parse_next(input)?;
    fold_chain(input, first, rest, |acc, rhs| {
        let d = rhs.depth();
        (acc.and(rhs), d)
    })
}

fn or_expr(input: &mut &str, depth: usize) -> ModalResult<Expr> {
    enter(input, depth)?;
    let first = and_expr(input, depth)?;
    let rest: Vec<Expr> = repeat(
        0..,
        preceded((ws, or_op), cut_err(|i: &mut &str| and_expr(i, depth))),
    )
    .parse_next(input)?;
    fold_chain(input, first, rest, |acc, rhs| {
        let d = rhs.depth();
        (acc.or(rhs), d)
    })
}

// -- Top-level parser -------------------------------------------------------

pub fn expression(input: &mut &str) -> ModalResult<Expr> {
    let expr = or_expr(input, 0)?;
    ws.parse_next(input)?;
    Ok(expr)
}
