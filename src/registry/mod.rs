//! The phasor registry
//!
//! Owns every live phasor together with the symbol index, id allocation,
//! palette usage, presentation order and selection. All edges between
//! phasors (parent links and expression dependencies) are stored as ids.
//!
//! This module is organized into submodules:
//! - `phasor`: The `Phasor` entity and its parent link
//! - `attribute`: Typed attribute changes dispatched through `Registry::set`
//! - `validity`: Validity propagation and re-evaluation cascades
//! - `coords`: Placement of every drawn phasor
//! - `load`: Saved records, bulk load and stringify
//! - `selection`: Selection bookkeeping and the info line
//! - `events`: Change notifications
//! - `names`: Label and symbol grammars

mod attribute;
mod coords;
mod events;
mod load;
mod names;
mod phasor;
mod selection;
mod validity;

pub use attribute::Attribute;
pub use events::Change;
pub use load::PhasorRecord;
pub use names::{check_label, check_symbol};
pub use phasor::{ParentLink, Phasor, Placement, Style};

use std::collections::{BTreeSet, HashMap};

use num_complex::Complex64;

use crate::defaults::{MAX_EXPRESSION_LENGTH, PALETTE, RESET_SEED};
use crate::errors::{ExprError, SetError};
use crate::eval::Scope;
use crate::expression::Expression;
use crate::types::{CoordSystem, PhasorId, sanitize};

#[derive(Debug, Default)]
pub struct Registry {
    phasors: HashMap<PhasorId, Phasor>,
    /// Presentation order, independent of id
    order: Vec<PhasorId>,
    selection: Vec<PhasorId>,
    /// Every claimed symbol, valid or not
    symbols: HashMap<String, PhasorId>,
    next_id: u32,
    free_ids: BTreeSet<u32>,
    color_usage: [usize; PALETTE.len()],
    label_index: u32,
    max_magnitude: f64,
    changes: Vec<Change>,
}

/// Outcome of compiling and evaluating an expression for one phasor
struct Resolved {
    compiled: Option<Expression>,
    dependencies: Vec<PhasorId>,
    value: Result<Complex64, ExprError>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a phasor with the given seed value.
    ///
    /// Missing or non-finite components become NaN and leave the phasor
    /// invalid; this never fails.
    pub fn add(&mut self, re: Option<f64>, im: Option<f64>) -> PhasorId {
        let value = Complex64::new(sanitize(re), sanitize(im));
        let id = match self.free_ids.pop_first() {
            Some(id) => PhasorId(id),
            None => {
                let id = PhasorId(self.next_id);
                self.next_id += 1;
                id
            }
        };

        let color_index = self.least_used_color();
        self.color_usage[color_index] += 1;
        self.label_index += 1;

        let style = Style::with_palette(color_index, format!("Phasor {}", self.label_index));
        let phasor = Phasor::new(id, value, style);
        let valid = phasor.valid;
        self.phasors.insert(id, phasor);
        self.order.push(id);
        self.changes.push(Change::Added(id));
        crate::log::debug!(%id, valid, "add phasor");

        if valid {
            self.update_coordinates();
        }
        id
    }

    /// First palette slot with the lowest usage count
    fn least_used_color(&self) -> usize {
        let min = self.color_usage.iter().copied().min().unwrap_or(0);
        self.color_usage
            .iter()
            .position(|&n| n == min)
            .unwrap_or(0)
    }

    /// Delete phasors by id. Unknown ids are skipped.
    ///
    /// Dependents become invalid, children keep an orphaned link. Returns the
    /// number of phasors removed; zero means nothing resolved.
    pub fn delete(&mut self, ids: &[PhasorId]) -> usize {
        let mut removed = 0;
        for &id in ids {
            if self.remove_one(id) {
                removed += 1;
            }
        }
        if removed > 0 {
            self.update_coordinates();
        }
        removed
    }

    fn remove_one(&mut self, id: PhasorId) -> bool {
        let Some(phasor) = self.phasors.get(&id) else {
            return false;
        };
        if let Some(index) = phasor.style.color_index {
            self.color_usage[index] = self.color_usage[index].saturating_sub(1);
        }
        let symbol = phasor.symbol.clone();
        if let Some(symbol) = &symbol {
            self.symbols.remove(symbol);
        }

        self.set_valid_expression(id, false);

        let related: Vec<PhasorId> = self.order.iter().copied().filter(|&o| o != id).collect();
        for other in related {
            let Some(o) = self.phasors.get_mut(&other) else {
                continue;
            };
            if o.parent == ParentLink::Child(id) {
                o.parent = ParentLink::Orphaned;
                self.changes.push(Change::Parent(other));
                self.set_valid_parent(other, false);
            }
            let Some(o) = self.phasors.get_mut(&other) else {
                continue;
            };
            if o.dependencies.contains(&id) {
                o.dependencies.retain(|&d| d != id);
                if let Some(name) = &symbol {
                    o.error = Some(ExprError::UndefinedSymbol { name: name.clone() });
                }
            }
        }

        self.phasors.remove(&id);
        self.order.retain(|&o| o != id);
        if let Some(pos) = self.selection.iter().position(|&s| s == id) {
            self.selection.remove(pos);
            self.changes.push(Change::Selection);
        }

        if id.0 + 1 == self.next_id {
            self.next_id -= 1;
            // keep free ids strictly below the counter
            while self.next_id > 0 && self.free_ids.remove(&(self.next_id - 1)) {
                self.next_id -= 1;
            }
        } else {
            self.free_ids.insert(id.0);
        }
        self.changes.push(Change::Removed(id));
        crate::log::debug!(%id, "delete phasor");
        true
    }

    /// Discard everything and seed one default phasor
    pub fn reset(&mut self) -> PhasorId {
        self.clear();
        self.add(Some(RESET_SEED.0), Some(RESET_SEED.1))
    }

    fn clear(&mut self) {
        self.phasors.clear();
        self.order.clear();
        self.selection.clear();
        self.symbols.clear();
        self.free_ids.clear();
        self.next_id = 0;
        self.label_index = 0;
        self.color_usage = [0; PALETTE.len()];
        self.max_magnitude = 0.0;
        self.changes.push(Change::Cleared);
    }

    /// Set a phasor's value from expression text.
    ///
    /// Expression failures are not errors: they leave the phasor invalid and
    /// are reported through [`Phasor::error`]. Only an unknown id fails.
    pub fn parse(&mut self, id: PhasorId, source: &str) -> Result<(), SetError> {
        if !self.phasors.contains_key(&id) {
            return Err(SetError::UnknownPhasor(id));
        }
        self.apply_expression(id, source);
        self.evaluate_dependents(id);
        self.update_coordinates();
        Ok(())
    }

    /// Compile, link and evaluate `source` for phasor `id` and store the
    /// outcome. Returns whether the expression is now valid.
    pub(crate) fn apply_expression(&mut self, id: PhasorId, source: &str) -> bool {
        let resolved = self.resolve(id, source);
        let Some(p) = self.phasors.get_mut(&id) else {
            return false;
        };
        p.expression = source.to_string();
        p.dependencies = resolved.dependencies;
        self.changes.push(Change::Expression(id));
        self.changes.push(Change::System(id));

        match resolved.value {
            Ok(value) => {
                p.value = value;
                p.system = resolved.compiled.as_ref().map_or(CoordSystem::None, |c| c.system());
                p.compiled = resolved.compiled;
                p.error = None;
                self.set_valid_expression(id, true);
                true
            }
            Err(error) => {
                crate::log::debug!(%id, %error, "expression rejected");
                p.system = CoordSystem::None;
                p.compiled = resolved.compiled;
                p.error = Some(error);
                self.set_valid_expression(id, false);
                false
            }
        }
    }

    fn resolve(&self, id: PhasorId, source: &str) -> Resolved {
        let failed = |error| Resolved {
            compiled: None,
            dependencies: Vec::new(),
            value: Err(error),
        };

        if let Some((cut, _)) = source.char_indices().nth(MAX_EXPRESSION_LENGTH) {
            return failed(ExprError::syntax(
                source,
                "expression too long",
                cut,
                source.len() - cut,
            ));
        }
        let compiled = match Expression::compile(source) {
            Ok(c) => c,
            Err(e) => return failed(e),
        };

        let dependencies: Vec<PhasorId> = compiled
            .symbols()
            .into_iter()
            .filter_map(|name| self.symbols.get(name).copied())
            .collect();

        if let Some(dep) = dependencies.iter().copied().find(|&d| d == id || self.depends_on(d, id)) {
            let name = self
                .phasors
                .get(&dep)
                .and_then(|p| p.symbol.clone())
                .unwrap_or_default();
            return failed(ExprError::CyclicDependency { name });
        }

        let value = compiled.evaluate(self);
        Resolved {
            compiled: Some(compiled),
            dependencies,
            value,
        }
    }

    /// Whether `from` reaches `target` through stored dependency edges
    fn depends_on(&self, from: PhasorId, target: PhasorId) -> bool {
        let mut stack = vec![from];
        let mut seen = BTreeSet::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(p) = self.phasors.get(&id) else {
                continue;
            };
            for &d in &p.dependencies {
                if d == target {
                    return true;
                }
                stack.push(d);
            }
        }
        false
    }

    /// Parent chain of `id`, nearest first
    pub fn ancestors(&self, id: PhasorId) -> Ancestors<'_> {
        Ancestors {
            registry: self,
            next: self.phasors.get(&id).and_then(|p| p.parent()),
        }
    }

    pub fn get(&self, id: PhasorId) -> Option<&Phasor> {
        self.phasors.get(&id)
    }

    /// Phasor at a position of the presentation order
    pub fn get_by_index(&self, index: usize) -> Option<&Phasor> {
        self.order.get(index).and_then(|id| self.phasors.get(id))
    }

    /// Phasor that currently claims `symbol`
    pub fn by_symbol(&self, symbol: &str) -> Option<&Phasor> {
        self.symbols.get(symbol).and_then(|id| self.phasors.get(id))
    }

    /// Live phasors in presentation order
    pub fn phasors(&self) -> impl Iterator<Item = &Phasor> + '_ {
        self.order.iter().filter_map(|id| self.phasors.get(id))
    }

    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Longest origin or endpoint vector among drawn phasors
    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    /// How many live phasors use each palette color
    pub fn color_usage(&self) -> &[usize] {
        &self.color_usage
    }

    /// Move a phasor to `index` in the presentation order. The index is
    /// clamped to the list.
    pub fn move_to(&mut self, id: PhasorId, index: usize) -> bool {
        let Some(from) = self.order.iter().position(|&o| o == id) else {
            return false;
        };
        let to = index.min(self.order.len() - 1);
        if from != to {
            let moved = self.order.remove(from);
            self.order.insert(to, moved);
        }
        true
    }

    /// Drain the changes recorded since the last call
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }
}

impl Scope for Registry {
    fn lookup(&self, name: &str) -> Result<Complex64, ExprError> {
        let phasor = self
            .symbols
            .get(name)
            .and_then(|id| self.phasors.get(id))
            .ok_or_else(|| ExprError::UndefinedSymbol {
                name: name.to_string(),
            })?;
        if phasor.valid_expression {
            Ok(phasor.value)
        } else {
            Err(ExprError::InvalidSymbol {
                name: name.to_string(),
            })
        }
    }
}

/// Iterator over a phasor's parent chain
pub struct Ancestors<'a> {
    registry: &'a Registry,
    next: Option<PhasorId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Phasor;

    fn next(&mut self) -> Option<Self::Item> {
        let phasor = self.registry.phasors.get(&self.next?)?;
        self.next = phasor.parent();
        Some(phasor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reuse_lowest_free() {
        let mut reg = Registry::new();
        let ids: Vec<_> = (0..4).map(|_| reg.add(Some(1.0), Some(0.0))).collect();
        assert_eq!(ids, [PhasorId(0), PhasorId(1), PhasorId(2), PhasorId(3)]);

        assert_eq!(reg.delete(&[PhasorId(2), PhasorId(0)]), 2);
        assert_eq!(reg.add(None, None), PhasorId(0));
        assert_eq!(reg.add(None, None), PhasorId(2));
        assert_eq!(reg.add(None, None), PhasorId(4));
    }

    #[test]
    fn deleting_the_top_id_shrinks_the_counter() {
        let mut reg = Registry::new();
        for _ in 0..3 {
            reg.add(Some(1.0), Some(1.0));
        }
        reg.delete(&[PhasorId(1)]);
        reg.delete(&[PhasorId(2)]);
        assert_eq!(reg.add(Some(1.0), Some(1.0)), PhasorId(1));
        assert_eq!(reg.add(Some(1.0), Some(1.0)), PhasorId(2));
    }

    #[test]
    fn delete_unknown_is_a_noop() {
        let mut reg = Registry::new();
        reg.add(Some(1.0), Some(1.0));
        reg.take_changes();
        assert_eq!(reg.delete(&[PhasorId(7)]), 0);
        assert!(reg.take_changes().is_empty());
    }

    #[test]
    fn seeds_sanitize_to_invalid() {
        let mut reg = Registry::new();
        let id = reg.add(Some(f64::INFINITY), Some(2.0));
        let p = reg.get(id).unwrap();
        assert!(!p.is_valid());
        assert!(p.value().re.is_nan());
        assert_eq!(p.expression(), "");
        assert_eq!(reg.max_magnitude(), 0.0);
    }

    #[test]
    fn add_labels_and_defaults() {
        let mut reg = Registry::new();
        let id = reg.add(Some(3.0), Some(-4.0));
        let p = reg.get(id).unwrap();
        assert_eq!(p.label(), "Phasor 1");
        assert_eq!(p.expression(), "3 + i * -4");
        assert_eq!(p.system(), CoordSystem::Cartesian);
        assert_eq!(p.style().width, 4);
        assert_eq!(p.style().arrow, 5);
        assert_eq!(p.style().arrow_size, 10);
        assert_eq!(p.style().outline_color, p.style().color);
        assert_eq!(reg.max_magnitude(), 5.0);
    }

    #[test]
    fn reset_seeds_one_phasor() {
        let mut reg = Registry::new();
        reg.add(Some(1.0), Some(1.0));
        reg.add(Some(2.0), Some(1.0));
        let id = reg.reset();
        assert_eq!(id, PhasorId(0));
        assert_eq!(reg.count(), 1);
        assert_eq!(reg.get(id).unwrap().label(), "Phasor 1");
        assert_eq!(reg.color_usage(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn move_to_reorders() {
        let mut reg = Registry::new();
        let a = reg.add(Some(1.0), Some(0.0));
        let b = reg.add(Some(2.0), Some(0.0));
        let c = reg.add(Some(3.0), Some(0.0));
        assert!(reg.move_to(c, 0));
        let order: Vec<_> = reg.phasors().map(|p| p.id()).collect();
        assert_eq!(order, [c, a, b]);
        assert!(reg.move_to(c, 99));
        assert_eq!(reg.get_by_index(2).unwrap().id(), c);
        assert!(!reg.move_to(PhasorId(42), 0));
    }

    #[test]
    fn parse_reports_but_does_not_fail() {
        let mut reg = Registry::new();
        let id = reg.add(Some(1.0), Some(1.0));
        reg.parse(id, "3 +").unwrap();
        let p = reg.get(id).unwrap();
        assert!(!p.valid_expression());
        assert_eq!(p.system(), CoordSystem::None);
        assert!(matches!(p.error(), Some(ExprError::Syntax { .. })));
        assert_eq!(p.expression(), "3 +");

        assert_eq!(reg.parse(PhasorId(9), "1"), Err(SetError::UnknownPhasor(PhasorId(9))));
    }

    #[test]
    fn overlong_expression_is_rejected() {
        let mut reg = Registry::new();
        let id = reg.add(Some(1.0), Some(1.0));
        let long = format!("1{}", " + 0".repeat(100));
        reg.parse(id, &long).unwrap();
        assert!(!reg.get(id).unwrap().valid_expression());
    }
}
