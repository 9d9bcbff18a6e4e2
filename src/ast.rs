//! Abstract Syntax Tree types for phasor expressions

use std::fmt;

/// A parsed expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Real literal
    Number(f64),
    /// Bare name: a constant (`i`, `e`, `pi`) or a phasor symbol
    Symbol(String),
    BinaryOp(Box<Expr>, BinaryOp, Box<Expr>),
    UnaryOp(UnaryOp, Box<Expr>),
    /// Explicit parentheses are kept, the classifier looks at them
    ParenExpr(Box<Expr>),
    FuncCall(FuncCall),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncCall {
    pub func: Function,
    pub arg: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Exp,
    Sin,
    Cos,
    Tan,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "exp" => Some(Function::Exp),
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Exp => "exp",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
        }
    }
}

impl Expr {
    pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
        Expr::BinaryOp(Box::new(lhs), op, Box::new(rhs))
    }

    /// True for a literal or a negated literal (`3`, `-3`)
    pub fn is_signed_number(&self) -> bool {
        match self {
            Expr::Number(_) => true,
            Expr::UnaryOp(UnaryOp::Neg, e) => matches!(**e, Expr::Number(_)),
            _ => false,
        }
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, Expr::Symbol(s) if s == name)
    }

    /// Visit every symbol reference in the tree, left to right
    pub fn for_each_symbol<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => f(name),
            Expr::BinaryOp(lhs, _, rhs) => {
                lhs.for_each_symbol(f);
                rhs.for_each_symbol(f);
            }
            Expr::UnaryOp(_, e) | Expr::ParenExpr(e) => e.for_each_symbol(f),
            Expr::FuncCall(call) => call.arg.for_each_symbol(f),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::BinaryOp(lhs, op, rhs) => {
                let op = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                    BinaryOp::Pow => "^",
                };
                write!(f, "({} {} {})", lhs, op, rhs)
            }
            Expr::UnaryOp(UnaryOp::Neg, e) => write!(f, "-{}", e),
            Expr::UnaryOp(UnaryOp::Pos, e) => write!(f, "+{}", e),
            Expr::ParenExpr(e) => write!(f, "[{}]", e),
            Expr::FuncCall(call) => write!(f, "{}({})", call.func.name(), call.arg),
        }
    }
}
