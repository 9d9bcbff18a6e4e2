//! Compiled phasor expressions
//!
//! An [`Expression`] is the parsed, classified form of the text a user typed
//! into a phasor's value field. It is compiled once and re-evaluated every
//! time a symbol it references changes.

use num_complex::Complex64;

use crate::ast::Expr;
use crate::classify::classify;
use crate::defaults::RESERVED_SYMBOLS;
use crate::errors::ExprError;
use crate::eval::{self, EmptyScope, Scope};
use crate::parse::parse;
use crate::types::CoordSystem;

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: Expr,
    system: CoordSystem,
}

impl Expression {
    /// Parse and classify `source`. Symbols are not resolved here.
    pub fn compile(source: &str) -> Result<Self, ExprError> {
        let ast = parse(source)?;
        let system = classify(&ast);
        Ok(Expression {
            source: source.to_string(),
            ast,
            system,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    pub fn system(&self) -> CoordSystem {
        self.system
    }

    /// Free symbol names, deduplicated, in order of first appearance
    pub fn symbols(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        self.ast.for_each_symbol(&mut |name| {
            if !RESERVED_SYMBOLS.contains(&name) && !names.contains(&name) {
                names.push(name);
            }
        });
        names
    }

    pub fn evaluate(&self, scope: &dyn Scope) -> Result<Complex64, ExprError> {
        eval::evaluate(&self.ast, scope)
    }
}

/// Evaluate a standalone expression that references no phasor symbols.
pub fn evaluate(source: &str) -> Result<(Complex64, CoordSystem), ExprError> {
    let expr = Expression::compile(source)?;
    let value = expr.evaluate(&EmptyScope)?;
    Ok((value, expr.system()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn classification_and_value() {
        let (v, system) = evaluate("3 + 4*i").unwrap();
        assert_eq!(system, CoordSystem::Cartesian);
        assert_eq!((v.re, v.im), (3.0, 4.0));

        let (v, system) = evaluate("5 * e^(i*1)").unwrap();
        assert_eq!(system, CoordSystem::PolarRadians);
        assert_abs_diff_eq!(v.re, 5.0 * 1f64.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(v.im, 5.0 * 1f64.sin(), epsilon = 1e-12);

        let (v, system) = evaluate("5 * e^(i*90*pi/180)").unwrap();
        assert_eq!(system, CoordSystem::PolarDegrees);
        assert_abs_diff_eq!(v.re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.im, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn symbols_skip_reserved_names() {
        let expr = Expression::compile("A * e^(i*pi) + B - A + sin(C)").unwrap();
        assert_eq!(expr.symbols(), vec!["A", "B", "C"]);
        assert_eq!(expr.system(), CoordSystem::None);
    }

    #[test]
    fn standalone_symbol_is_undefined() {
        assert!(matches!(
            evaluate("2 * X"),
            Err(ExprError::UndefinedSymbol { name }) if name == "X"
        ));
    }
}
