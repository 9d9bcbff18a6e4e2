//! Selection bookkeeping

use std::f64::consts::PI;

use crate::format;
use crate::types::PhasorId;

use super::{Change, Phasor, Registry};

impl Registry {
    /// Add a phasor to the selection. Returns it, or `None` if unknown.
    pub fn select(&mut self, id: PhasorId) -> Option<&Phasor> {
        if !self.phasors.contains_key(&id) {
            return None;
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
            self.changes.push(Change::Selection);
        }
        self.phasors.get(&id)
    }

    /// Add a phasor to the selection, or remove it if already selected
    pub fn toggle(&mut self, id: PhasorId) -> Option<&Phasor> {
        if !self.phasors.contains_key(&id) {
            return None;
        }
        match self.selection.iter().position(|&s| s == id) {
            Some(pos) => {
                self.selection.remove(pos);
            }
            None => self.selection.push(id),
        }
        self.changes.push(Change::Selection);
        self.phasors.get(&id)
    }

    /// Make `id` the only selected phasor
    pub fn select_exclusive(&mut self, id: PhasorId) -> Option<&Phasor> {
        if !self.phasors.contains_key(&id) {
            return None;
        }
        if self.selection != [id] {
            self.selection.clear();
            self.selection.push(id);
            self.changes.push(Change::Selection);
        }
        self.phasors.get(&id)
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.changes.push(Change::Selection);
        }
    }

    /// Selected ids in selection order
    pub fn selection(&self) -> &[PhasorId] {
        &self.selection
    }

    pub fn is_selected(&self, id: PhasorId) -> bool {
        self.selection.contains(&id)
    }

    /// The selected phasor when exactly one is selected
    pub fn selected(&self) -> Option<&Phasor> {
        match self.selection.as_slice() {
            [id] => self.phasors.get(id),
            _ => None,
        }
    }

    pub fn is_selection_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Info line for the current selection.
    ///
    /// One phasor: its label and coordinates. Two valid phasors: their sum
    /// and the angle between them. Anything else has no info.
    pub fn selection_info(&self) -> Option<String> {
        let selected: Vec<&Phasor> = self
            .selection
            .iter()
            .filter_map(|id| self.phasors.get(id))
            .collect();

        match selected.as_slice() {
            [p] if p.valid => Some(format!("{}: {}", p.style.label, p.info())),
            [p] => Some(format!("{} is invalid", p.style.label)),
            [a, b] if a.valid && b.valid => {
                let sum = a.value + b.value;
                let dot = a.value.re * b.value.re + a.value.im * b.value.im;
                let cross = a.value.re * b.value.im - a.value.im * b.value.re;
                // unsigned angle in [0, π]; zero when either phasor has no length
                let radians = cross.abs().atan2(dot);
                let degrees = radians * 180.0 / PI;
                Some(format!(
                    "{} + {} = ( {} , {} ) , angle: {} rad / {}°",
                    a.style.label,
                    b.style.label,
                    format::number(sum.re),
                    format::number(sum.im),
                    format::number(radians),
                    format::number(degrees),
                ))
            }
            _ => None,
        }
    }
}
