//! Parse pest pairs into AST nodes

use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::ast::*;
use crate::errors::ExprError;
use crate::{ExprParser, Rule};

/// Parse an expression string into an AST
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let mut pairs = ExprParser::parse(Rule::expression, source).map_err(|e| {
        let (offset, len) = match e.location {
            InputLocation::Pos(p) => (p, 0),
            InputLocation::Span((start, end)) => (start, end.saturating_sub(start)),
        };
        ExprError::syntax(source, e.variant.message(), offset, len)
    })?;

    let expression = pairs
        .next()
        .ok_or_else(|| ExprError::syntax(source, "empty expression", 0, 0))?;
    let sum = expression
        .into_inner()
        .find(|p| p.as_rule() == Rule::sum)
        .ok_or_else(|| ExprError::syntax(source, "empty expression", 0, 0))?;
    parse_sum(sum)
}

fn unexpected(pair: &Pair<Rule>) -> ExprError {
    let span = pair.as_span();
    ExprError::syntax(
        pair.get_input(),
        format!("unexpected {:?}", pair.as_rule()),
        span.start(),
        span.end() - span.start(),
    )
}

fn missing(pair: &Pair<Rule>) -> ExprError {
    let span = pair.as_span();
    ExprError::syntax(
        pair.get_input(),
        format!("incomplete {:?}", pair.as_rule()),
        span.end(),
        0,
    )
}

fn parse_sum(pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // sum = product ~ (add_op ~ product)*
    let outer = pair.clone();
    let mut inner = pair.into_inner();
    let first = inner.next().ok_or_else(|| missing(&outer))?;
    let mut result = parse_product(first)?;

    while let Some(op_pair) = inner.next() {
        let op = match op_pair.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            _ => return Err(unexpected(&op_pair)),
        };
        let rhs = inner.next().ok_or_else(|| missing(&outer))?;
        result = Expr::binary(result, op, parse_product(rhs)?);
    }

    Ok(result)
}

fn parse_product(pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // product = implicit ~ (mul_op ~ implicit)*
    let outer = pair.clone();
    let mut inner = pair.into_inner();
    let first = inner.next().ok_or_else(|| missing(&outer))?;
    let mut result = parse_implicit(first)?;

    while let Some(op_pair) = inner.next() {
        let op = match op_pair.as_str() {
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            _ => return Err(unexpected(&op_pair)),
        };
        let rhs = inner.next().ok_or_else(|| missing(&outer))?;
        result = Expr::binary(result, op, parse_implicit(rhs)?);
    }

    Ok(result)
}

fn parse_implicit(pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // implicit = unary ~ unary*, juxtaposed factors multiply left to right
    let outer = pair.clone();
    let mut inner = pair.into_inner();
    let first = inner.next().ok_or_else(|| missing(&outer))?;
    let mut result = parse_unary(first)?;
    for next in inner {
        result = Expr::binary(result, BinaryOp::Mul, parse_unary(next)?);
    }
    Ok(result)
}

fn parse_unary(pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // unary = prefix* ~ power
    let mut prefixes = Vec::new();
    let mut operand = None;
    let outer = pair.clone();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::prefix => prefixes.push(match inner.as_str() {
                "-" => UnaryOp::Neg,
                _ => UnaryOp::Pos,
            }),
            Rule::power => operand = Some(parse_power(inner)?),
            _ => return Err(unexpected(&inner)),
        }
    }

    let mut result = operand.ok_or_else(|| missing(&outer))?;
    // innermost sign binds first: `--x` is -(-(x))
    for op in prefixes.into_iter().rev() {
        result = Expr::UnaryOp(op, Box::new(result));
    }
    Ok(result)
}

fn parse_power(pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // power = primary ~ ("^" ~ unary)?
    let outer = pair.clone();
    let mut inner = pair.into_inner();
    let base = parse_primary(inner.next().ok_or_else(|| missing(&outer))?)?;
    match inner.next() {
        Some(exponent) => Ok(Expr::binary(base, BinaryOp::Pow, parse_unary(exponent)?)),
        None => Ok(base),
    }
}

fn parse_primary(pair: Pair<Rule>) -> Result<Expr, ExprError> {
    let outer = pair.clone();
    let inner = pair.into_inner().next().ok_or_else(|| missing(&outer))?;
    match inner.as_rule() {
        Rule::number => parse_number(inner),
        Rule::ident => Ok(Expr::Symbol(inner.as_str().to_string())),
        Rule::paren => {
            let sum = inner.clone().into_inner().next().ok_or_else(|| missing(&inner))?;
            Ok(Expr::ParenExpr(Box::new(parse_sum(sum)?)))
        }
        Rule::call => parse_call(inner),
        _ => Err(unexpected(&inner)),
    }
}

fn parse_number(pair: Pair<Rule>) -> Result<Expr, ExprError> {
    pair.as_str()
        .parse::<f64>()
        .map(Expr::Number)
        .map_err(|e| {
            let span = pair.as_span();
            ExprError::syntax(
                pair.get_input(),
                format!("invalid number: {}", e),
                span.start(),
                span.end() - span.start(),
            )
        })
}

fn parse_call(pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // call = ident ~ "(" ~ sum ~ ")"
    let outer = pair.clone();
    let mut inner = pair.into_inner();
    let name = inner.next().ok_or_else(|| missing(&outer))?;
    let arg = inner.next().ok_or_else(|| missing(&outer))?;
    let func = Function::from_name(name.as_str()).ok_or_else(|| ExprError::UnknownFunction {
        name: name.as_str().to_string(),
    })?;
    Ok(Expr::FuncCall(FuncCall {
        func,
        arg: Box::new(parse_sum(arg)?),
    }))
}
