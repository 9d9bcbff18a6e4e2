//! Phasor diagram core.
//!
//! A [`Registry`] owns a set of phasors: 2-D vectors whose values come from
//! complex expressions, chained head to tail through parent links and bound
//! to each other through named symbols. Editing one phasor re-evaluates
//! everything that depends on it and recomputes placements. [`Layout`] turns
//! the longest phasor and the display [`Settings`] into the coordinate
//! system a drawing layer needs.
//!
//! ```
//! use phasorviz::{Attribute, Registry};
//!
//! let mut reg = Registry::new();
//! let a = reg.add(Some(3.0), Some(4.0));
//! let b = reg.add(None, None);
//! reg.set(a, Attribute::Symbol("A".into())).unwrap();
//! reg.parse(b, "A * e^(i * pi/2)").unwrap();
//! assert!(reg.get(b).unwrap().is_valid());
//! ```

use pest_derive::Parser;

pub mod ast;
pub mod classify;
pub mod color;
pub mod defaults;
pub mod document;
pub mod errors;
pub mod eval;
pub mod expression;
pub mod format;
mod log;
mod parse;
pub mod registry;
pub mod render;
pub mod settings;
pub mod types;

pub use color::Color;
pub use document::Document;
pub use errors::{ColorError, ExprError, LoadError, SetError, SettingsError};
pub use eval::Scope;
pub use expression::{Expression, evaluate};
pub use registry::{Attribute, Change, ParentLink, Phasor, PhasorRecord, Registry};
pub use render::Layout;
pub use settings::Settings;
pub use types::{CoordSystem, PhasorId};

#[derive(Parser)]
#[grammar = "expr.pest"]
pub struct ExprParser;

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn parse_cartesian() {
        let result = ExprParser::parse(Rule::expression, "3 + 4*i");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_polar_degrees() {
        let result = ExprParser::parse(Rule::expression, "5 * e^(i * 30 * pi/180)");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_implicit_product() {
        let result = ExprParser::parse(Rule::expression, "4i");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
        let result = ExprParser::parse(Rule::expression, "2 pi");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_signed_exponent() {
        let result = ExprParser::parse(Rule::expression, "2^-1");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_call() {
        let result = ExprParser::parse(Rule::call, "exp(i * pi)");
        assert!(result.is_ok(), "Failed to parse call: {:?}", result.err());
    }

    #[test]
    fn parse_number_forms() {
        for input in ["1", "1.5", ".5", "2.", "1e3", "1.5E-2"] {
            let result = ExprParser::parse(Rule::number, input);
            assert!(result.is_ok(), "Failed to parse {input}: {:?}", result.err());
            assert_eq!(result.unwrap().as_str(), input);
        }
    }

    #[test]
    fn reject_dangling_operator() {
        assert!(ExprParser::parse(Rule::expression, "3 +").is_err());
        assert!(ExprParser::parse(Rule::expression, "(1 + i").is_err());
        assert!(ExprParser::parse(Rule::expression, "").is_err());
    }
}
