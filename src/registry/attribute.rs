//! Typed attribute changes

use num_complex::Complex64;

use crate::color::Color;
use crate::defaults::{
    ARROW_SIZE_MAX, ARROW_SIZE_MIN, ARROW_TYPE_COUNT, MAX_OUTLINE_WIDTH, MAX_PHASOR_WIDTH, PALETTE,
    SKIN_COUNT,
};
use crate::errors::{ExprError, SetError};
use crate::expression::Expression;
use crate::format;
use crate::types::{CoordSystem, PhasorId, sanitize};

use super::names::{check_label, check_symbol};
use super::{Change, ParentLink, Registry};

/// One attribute change request
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Direct numeric value, bypassing expression parsing. Non-finite
    /// components make the phasor invalid.
    Position { re: f64, im: f64 },
    Label(String),
    Color(Color),
    /// Empty string removes the symbol
    Symbol(String),
    /// Symbol of the new parent, empty string detaches
    Parent(String),
    Visible(bool),
    /// Show the value in the next coordinate representation
    NextSystem,
    Skin(u32),
    Width(u32),
    OutlineWidth(u32),
    OutlineColor(Color),
    Arrow(u32),
    ArrowSize(u32),
}

fn check_range(attribute: &'static str, value: u32, min: u32, max: u32) -> Result<u32, SetError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(SetError::OutOfRange {
            attribute,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        })
    }
}

impl Registry {
    /// Change one attribute of a phasor.
    ///
    /// A rejected change leaves the registry untouched. An accepted one runs
    /// its whole cascade before returning.
    pub fn set(&mut self, id: PhasorId, attribute: Attribute) -> Result<(), SetError> {
        if !self.phasors.contains_key(&id) {
            return Err(SetError::UnknownPhasor(id));
        }
        crate::log::debug!(%id, ?attribute, "set attribute");

        let result = match attribute {
            Attribute::Position { re, im } => {
                self.set_position(id, Complex64::new(sanitize(Some(re)), sanitize(Some(im))));
                Ok(())
            }
            Attribute::Label(label) => {
                check_label(&label)?;
                self.with_phasor(id, Change::Label(id), |p| update(&mut p.style.label, label));
                Ok(())
            }
            Attribute::Color(color) => {
                self.set_color(id, color);
                Ok(())
            }
            Attribute::Symbol(symbol) => self.set_symbol(id, symbol),
            Attribute::Parent(symbol) => self.set_parent(id, &symbol),
            Attribute::Visible(visible) => {
                if self.with_phasor(id, Change::Visible(id), |p| update(&mut p.style.visible, visible)) {
                    self.update_coordinates();
                }
                Ok(())
            }
            Attribute::NextSystem => self.next_system(id),
            Attribute::Skin(skin) => {
                let skin = check_range("skin", skin, 0, SKIN_COUNT - 1)?;
                self.with_phasor(id, Change::Skin(id), |p| update(&mut p.style.skin, skin));
                Ok(())
            }
            Attribute::Width(width) => {
                let width = check_range("width", width, 1, MAX_PHASOR_WIDTH)?;
                self.with_phasor(id, Change::Style(id), |p| update(&mut p.style.width, width));
                Ok(())
            }
            Attribute::OutlineWidth(width) => {
                let width = check_range("outline width", width, 0, MAX_OUTLINE_WIDTH)?;
                self.with_phasor(id, Change::Style(id), |p| update(&mut p.style.outline_width, width));
                Ok(())
            }
            Attribute::OutlineColor(color) => {
                self.with_phasor(id, Change::Style(id), |p| update(&mut p.style.outline_color, color));
                Ok(())
            }
            Attribute::Arrow(arrow) => {
                let arrow = check_range("arrow", arrow, 0, ARROW_TYPE_COUNT - 1)?;
                self.with_phasor(id, Change::Style(id), |p| update(&mut p.style.arrow, arrow));
                Ok(())
            }
            Attribute::ArrowSize(size) => {
                let size = check_range("arrow size", size, ARROW_SIZE_MIN, ARROW_SIZE_MAX)?;
                self.with_phasor(id, Change::Style(id), |p| update(&mut p.style.arrow_size, size));
                Ok(())
            }
        };

        if let Err(ref error) = result {
            crate::log::debug!(%id, %error, "attribute rejected");
        }
        result
    }

    /// Run `f` on the phasor and queue `change` if it reports a difference
    fn with_phasor(
        &mut self,
        id: PhasorId,
        change: Change,
        f: impl FnOnce(&mut super::Phasor) -> bool,
    ) -> bool {
        let changed = self.phasors.get_mut(&id).is_some_and(f);
        if changed {
            self.changes.push(change);
        }
        changed
    }

    fn set_position(&mut self, id: PhasorId, value: Complex64) {
        let Some(p) = self.phasors.get_mut(&id) else {
            return;
        };
        let same = |a: f64, b: f64| a == b || (a.is_nan() && b.is_nan());
        if same(p.value.re, value.re) && same(p.value.im, value.im) {
            return;
        }

        let valid = value.re.is_finite() && value.im.is_finite();
        let system = match p.system {
            CoordSystem::None => CoordSystem::Cartesian,
            system => system,
        };
        p.value = value;
        p.system = system;
        p.dependencies.clear();
        p.expression = if valid {
            format::template(system, value).unwrap_or_default()
        } else {
            String::new()
        };
        p.compiled = Expression::compile(&p.expression).ok();
        p.error = if valid { None } else { Some(ExprError::NonFinite) };
        self.changes.push(Change::Expression(id));

        self.set_valid_expression(id, valid);
        self.evaluate_dependents(id);
        self.update_coordinates();
    }

    fn set_color(&mut self, id: PhasorId, color: Color) {
        let Some(p) = self.phasors.get_mut(&id) else {
            return;
        };
        if p.style.color == color {
            return;
        }
        let new_index = PALETTE.iter().position(|c| *c == color);
        if new_index != p.style.color_index {
            if let Some(old) = p.style.color_index {
                self.color_usage[old] = self.color_usage[old].saturating_sub(1);
            }
            if let Some(new) = new_index {
                self.color_usage[new] += 1;
            }
            p.style.color_index = new_index;
        }
        p.style.color = color;
        self.changes.push(Change::Style(id));
    }

    fn set_symbol(&mut self, id: PhasorId, symbol: String) -> Result<(), SetError> {
        if !symbol.is_empty() {
            check_symbol(&symbol)?;
            if self.symbols.get(&symbol).is_some_and(|&owner| owner != id) {
                return Err(SetError::SymbolInUse(symbol));
            }
        }
        let Some(p) = self.phasors.get_mut(&id) else {
            return Err(SetError::UnknownPhasor(id));
        };
        let new = (!symbol.is_empty()).then_some(symbol);
        if p.symbol == new {
            return Ok(());
        }

        let old = std::mem::replace(&mut p.symbol, new.clone());
        let claimed = new.is_some();
        let valid = p.valid;
        if let Some(old) = &old {
            self.symbols.remove(old);
        }
        if let Some(new) = new {
            self.symbols.insert(new, id);
        }
        self.changes.push(Change::Symbol(id));

        if let Some(old) = old {
            for other in self.order.clone() {
                if other == id {
                    continue;
                }
                let Some(o) = self.phasors.get_mut(&other) else {
                    continue;
                };
                let is_child = o.parent == ParentLink::Child(id);
                if o.dependencies.contains(&id) {
                    o.dependencies.retain(|&d| d != id);
                    o.error = Some(ExprError::UndefinedSymbol { name: old.clone() });
                    self.set_valid_expression(other, false);
                }
                // the parent link is by identity and survives the rename
                if is_child {
                    self.set_valid_parent(other, valid);
                    self.changes.push(Change::Parent(other));
                }
            }
        }

        // expressions waiting on the new name link to it now, even while
        // this phasor is invalid, so its later recovery reaches them
        if claimed {
            self.reparse_invalids();
            self.update_coordinates();
        }
        Ok(())
    }

    fn set_parent(&mut self, id: PhasorId, symbol: &str) -> Result<(), SetError> {
        if symbol.is_empty() {
            let Some(p) = self.phasors.get_mut(&id) else {
                return Err(SetError::UnknownPhasor(id));
            };
            if p.parent != ParentLink::Root {
                p.parent = ParentLink::Root;
                self.changes.push(Change::Parent(id));
                self.set_valid_parent(id, true);
                self.update_coordinates();
            }
            return Ok(());
        }

        let target = self
            .symbols
            .get(symbol)
            .copied()
            .filter(|&t| t != id)
            .ok_or_else(|| SetError::UnknownParent(symbol.to_string()))?;
        if self.ancestors(target).any(|a| a.id == id) {
            return Err(SetError::ParentCycle(symbol.to_string()));
        }
        let target_valid = self.phasors.get(&target).is_some_and(|t| t.valid);

        let Some(p) = self.phasors.get_mut(&id) else {
            return Err(SetError::UnknownPhasor(id));
        };
        if p.parent == ParentLink::Child(target) {
            return Ok(());
        }
        p.parent = ParentLink::Child(target);
        self.changes.push(Change::Parent(id));
        self.set_valid_parent(id, target_valid);
        self.update_coordinates();
        Ok(())
    }

    fn next_system(&mut self, id: PhasorId) -> Result<(), SetError> {
        let Some(p) = self.phasors.get_mut(&id) else {
            return Err(SetError::UnknownPhasor(id));
        };
        let next = p.system.next().ok_or(SetError::NoSystem)?;
        p.system = next;
        if p.valid_expression {
            if let Some(text) = format::template(next, p.value) {
                p.compiled = Expression::compile(&text).ok();
                p.expression = text;
                self.changes.push(Change::Expression(id));
            }
        }
        self.changes.push(Change::System(id));
        Ok(())
    }
}

/// Store `value` in `slot`. False when it already held it.
fn update<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
