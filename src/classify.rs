//! Coordinate-system detection over the expression tree.
//!
//! This is a syntactic match on the shape the user typed, not a semantic
//! analysis: `exp(i*x)` with a symbol `x`, or an algebraically equivalent
//! regrouping of a polar form, lands in `CoordSystem::None` and is shown back
//! verbatim.

use crate::ast::{BinaryOp, Expr, Function};
use crate::types::CoordSystem;

/// Classify the surface syntax of a parsed expression
pub fn classify(expr: &Expr) -> CoordSystem {
    match expr {
        // 3, i
        Expr::Number(_) => CoordSystem::Cartesian,
        Expr::Symbol(s) if s == "i" => CoordSystem::Cartesian,

        // -3, -i, +4
        Expr::UnaryOp(_, e) if matches!(**e, Expr::Number(_)) || e.is_symbol("i") => {
            CoordSystem::Cartesian
        }

        Expr::BinaryOp(lhs, BinaryOp::Add | BinaryOp::Sub, rhs) => {
            // a ± b*i and b*i ± a
            if (lhs.is_signed_number() && is_imaginary_term(rhs))
                || (is_imaginary_term(lhs) && rhs.is_signed_number())
            {
                CoordSystem::Cartesian
            } else {
                CoordSystem::None
            }
        }

        Expr::BinaryOp(lhs, BinaryOp::Mul, rhs) => classify_product(lhs, rhs),

        _ => CoordSystem::None,
    }
}

/// `b*i`, `i*b` or a bare `i`
fn is_imaginary_term(expr: &Expr) -> bool {
    match expr {
        Expr::Symbol(s) => s == "i",
        Expr::BinaryOp(lhs, BinaryOp::Mul, rhs) => {
            (lhs.is_signed_number() && rhs.is_symbol("i"))
                || (lhs.is_symbol("i") && rhs.is_signed_number())
        }
        _ => false,
    }
}

fn classify_product(lhs: &Expr, rhs: &Expr) -> CoordSystem {
    // i*b
    if lhs.is_symbol("i") && rhs.is_signed_number() {
        return CoordSystem::Cartesian;
    }
    if !lhs.is_signed_number() {
        return CoordSystem::None;
    }
    // b*i
    if rhs.is_symbol("i") {
        return CoordSystem::Cartesian;
    }

    // a * e^(...) or a * exp(...)
    let exponent = match rhs {
        Expr::BinaryOp(base, BinaryOp::Pow, exp) if base.is_symbol("e") => match &**exp {
            Expr::ParenExpr(inner) => &**inner,
            _ => return CoordSystem::None,
        },
        Expr::FuncCall(call) if call.func == Function::Exp => &*call.arg,
        _ => return CoordSystem::None,
    };
    classify_exponent(exponent)
}

/// `i*b` and `i*b/pi` are radians, `i*b*pi/180` is degrees
fn classify_exponent(expr: &Expr) -> CoordSystem {
    let Expr::BinaryOp(lhs, op, rhs) = expr else {
        return CoordSystem::None;
    };
    match op {
        BinaryOp::Mul if is_i_times_number(expr) => CoordSystem::PolarRadians,
        BinaryOp::Div if rhs.is_symbol("pi") && is_i_times_number(lhs) => CoordSystem::PolarRadians,
        BinaryOp::Div if matches!(**rhs, Expr::Number(n) if n == 180.0) => match &**lhs {
            Expr::BinaryOp(angle, BinaryOp::Mul, pi) if pi.is_symbol("pi") && is_i_times_number(angle) => {
                CoordSystem::PolarDegrees
            }
            _ => CoordSystem::None,
        },
        _ => CoordSystem::None,
    }
}

fn is_i_times_number(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::BinaryOp(i, BinaryOp::Mul, b) if i.is_symbol("i") && b.is_signed_number()
    )
}
