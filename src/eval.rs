//! Expression evaluation functions

use std::collections::HashMap;
use std::f64::consts::{E, PI};

use num_complex::Complex64;

use crate::ast::*;
use crate::errors::ExprError;

/// Symbol bindings an expression is evaluated against
pub trait Scope {
    /// Current value published under `name`
    fn lookup(&self, name: &str) -> Result<Complex64, ExprError>;
}

impl Scope for HashMap<String, Complex64> {
    fn lookup(&self, name: &str) -> Result<Complex64, ExprError> {
        self.get(name).copied().ok_or_else(|| ExprError::UndefinedSymbol {
            name: name.to_string(),
        })
    }
}

/// The scope with no phasor symbols at all
pub struct EmptyScope;

impl Scope for EmptyScope {
    fn lookup(&self, name: &str) -> Result<Complex64, ExprError> {
        Err(ExprError::UndefinedSymbol {
            name: name.to_string(),
        })
    }
}

/// Evaluate to a finite complex number, or fail.
pub fn evaluate(expr: &Expr, scope: &dyn Scope) -> Result<Complex64, ExprError> {
    let value = eval_expr(expr, scope)?;
    validate_value(value)
}

fn validate_value(value: Complex64) -> Result<Complex64, ExprError> {
    if value.re.is_finite() && value.im.is_finite() {
        Ok(value)
    } else {
        Err(ExprError::NonFinite)
    }
}

pub fn eval_expr(expr: &Expr, scope: &dyn Scope) -> Result<Complex64, ExprError> {
    match expr {
        Expr::Number(n) => Ok(Complex64::new(*n, 0.0)),
        Expr::Symbol(name) => match name.as_str() {
            "i" => Ok(Complex64::new(0.0, 1.0)),
            "e" => Ok(Complex64::new(E, 0.0)),
            "pi" => Ok(Complex64::new(PI, 0.0)),
            _ => scope.lookup(name),
        },
        Expr::BinaryOp(lhs, op, rhs) => {
            let l = eval_expr(lhs, scope)?;
            let r = eval_expr(rhs, scope)?;
            Ok(match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                // x/0 comes out non-finite and is rejected by validate_value
                BinaryOp::Div => l / r,
                BinaryOp::Pow => pow(l, r),
            })
        }
        Expr::UnaryOp(op, e) => {
            let v = eval_expr(e, scope)?;
            Ok(match op {
                UnaryOp::Neg => -v,
                UnaryOp::Pos => v,
            })
        }
        Expr::ParenExpr(e) => eval_expr(e, scope),
        Expr::FuncCall(call) => {
            let v = eval_expr(&call.arg, scope)?;
            Ok(match call.func {
                Function::Exp => v.exp(),
                Function::Sin => v.sin(),
                Function::Cos => v.cos(),
                Function::Tan => v.tan(),
            })
        }
    }
}

fn pow(base: Complex64, exp: Complex64) -> Complex64 {
    let real_exp = exp.im == 0.0;
    if base.im == 0.0 && real_exp && (base.re >= 0.0 || exp.re.fract() == 0.0) {
        return Complex64::new(base.re.powf(exp.re), 0.0);
    }
    if base.im == 0.0 && base.re == E {
        return exp.exp();
    }
    if real_exp && exp.re.fract() == 0.0 && exp.re.abs() <= i32::MAX as f64 {
        return base.powi(exp.re as i32);
    }
    if base.re == 0.0 && base.im == 0.0 {
        return if exp.re > 0.0 {
            Complex64::new(0.0, 0.0)
        } else {
            Complex64::new(f64::NAN, f64::NAN)
        };
    }
    base.powc(exp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use approx::assert_abs_diff_eq;

    fn eval(source: &str) -> Result<Complex64, ExprError> {
        evaluate(&parse(source).unwrap(), &EmptyScope)
    }

    #[test]
    fn cartesian_value() {
        let v = eval("3 + 4*i").unwrap();
        assert_eq!((v.re, v.im), (3.0, 4.0));
    }

    #[test]
    fn polar_values() {
        let v = eval("5 * e^(i*1)").unwrap();
        assert_abs_diff_eq!(v.re, 5.0 * 1f64.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(v.im, 5.0 * 1f64.sin(), epsilon = 1e-12);

        let v = eval("5 * e^(i*90*pi/180)").unwrap();
        assert_abs_diff_eq!(v.re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.im, 5.0, epsilon = 1e-12);

        let v = eval("2 * exp(i * pi)").unwrap();
        assert_abs_diff_eq!(v.re, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn powers() {
        assert_eq!(eval("2^3").unwrap(), Complex64::new(8.0, 0.0));
        assert_eq!(eval("(-2)^2").unwrap(), Complex64::new(4.0, 0.0));
        let v = eval("i^2").unwrap();
        assert_abs_diff_eq!(v.re, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.im, 0.0, epsilon = 1e-12);
        let v = eval("(-4)^0.5").unwrap();
        assert_abs_diff_eq!(v.im, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_fails() {
        assert!(matches!(eval("1/0"), Err(ExprError::NonFinite)));
        assert!(matches!(eval("1e308 * 10"), Err(ExprError::NonFinite)));
        assert!(matches!(eval("0^-1"), Err(ExprError::NonFinite)));
    }

    #[test]
    fn symbols_resolve_through_scope() {
        let mut scope = HashMap::new();
        scope.insert("A".to_string(), Complex64::new(1.0, 2.0));
        let v = evaluate(&parse("2*A + i").unwrap(), &scope).unwrap();
        assert_eq!(v, Complex64::new(2.0, 5.0));
        assert!(matches!(
            evaluate(&parse("B").unwrap(), &scope),
            Err(ExprError::UndefinedSymbol { name }) if name == "B"
        ));
        assert!(matches!(
            evaluate(&parse("sin").unwrap(), &scope),
            Err(ExprError::UndefinedSymbol { .. })
        ));
    }
}
