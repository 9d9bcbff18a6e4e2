//! Label and symbol grammars

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::defaults::{MAX_LABEL_LENGTH, MAX_SYMBOL_LENGTH, RESERVED_SYMBOLS};
use crate::errors::SetError;

static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("static symbol regex"));

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^<>"']*$"#).expect("static label regex"));

/// Labels are shown inside markup: no angle brackets, no quotes.
pub fn label_is_safe(label: &str) -> bool {
    label.chars().count() <= MAX_LABEL_LENGTH && LABEL_RE.is_match(label)
}

pub fn check_label(label: &str) -> Result<(), SetError> {
    if label.is_empty() || !label_is_safe(label) {
        return Err(SetError::InvalidLabel(label.to_string()));
    }
    Ok(())
}

/// Grammar and reserved-name check for a non-empty symbol. Uniqueness is
/// up to the caller.
pub fn check_symbol(symbol: &str) -> Result<(), SetError> {
    if symbol.len() > MAX_SYMBOL_LENGTH || !SYMBOL_RE.is_match(symbol) {
        return Err(SetError::InvalidSymbol(symbol.to_string()));
    }
    if RESERVED_SYMBOLS.contains(&symbol) {
        return Err(SetError::ReservedSymbol(symbol.to_string()));
    }
    Ok(())
}
