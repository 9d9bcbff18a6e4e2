//! Saved phasor records: bulk load and stringify

use std::collections::{HashMap, HashSet};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::defaults::{
    ARROW_SIZE_MAX, ARROW_SIZE_MIN, ARROW_TYPE_COUNT, MAX_EXPRESSION_LENGTH, MAX_ID,
    MAX_LABEL_LENGTH, MAX_OUTLINE_WIDTH, MAX_PHASOR_WIDTH, MAX_SYMBOL_LENGTH, PALETTE, SKIN_COUNT,
};
use crate::errors::LoadError;
use crate::types::{CoordSystem, PhasorId};

use super::names::{check_symbol, label_is_safe};
use super::{Change, ParentLink, Phasor, Registry, Style};

/// One phasor as written to a saved diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasorRecord {
    pub id: i64,
    /// Id of the parent record, or -1
    pub parent: i64,
    /// Expression text
    pub value: String,
    pub width: i64,
    pub skin: i64,
    pub arrow: i64,
    pub arrow_size: i64,
    pub visible: bool,
    pub label: String,
    /// Palette slot, or -1 for the custom `color`
    pub color_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub outline_width: i64,
    pub outline_color: String,
    pub symbol: String,
}

/// A record that passed the per-field checks
struct Candidate {
    id: PhasorId,
    parent: Option<PhasorId>,
    symbol: Option<String>,
    style: Style,
}

fn field(index: usize, field: &'static str, reason: impl Into<String>) -> LoadError {
    LoadError::Field {
        index,
        field,
        reason: reason.into(),
    }
}

fn check_int(index: usize, name: &'static str, value: i64, min: i64, max: i64) -> Result<i64, LoadError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(field(index, name, format!("{value} is outside {min}..={max}")))
    }
}

fn check_len(index: usize, name: &'static str, value: &str, max: usize) -> Result<(), LoadError> {
    if value.chars().count() > max {
        Err(field(index, name, format!("is longer than {max} characters")))
    } else {
        Ok(())
    }
}

fn parse_color(index: usize, text: &str) -> Result<Color, LoadError> {
    text.parse::<Color>()
        .map_err(|source| LoadError::Color { index, source })
}

fn check_record(index: usize, r: &PhasorRecord) -> Result<Candidate, LoadError> {
    // ranges below start at zero unless noted, so the `as u32` casts are lossless
    let id = check_int(index, "id", r.id, 0, MAX_ID.into())? as u32;
    // -1 selects the custom color
    let color_index = check_int(index, "color_index", r.color_index, -1, PALETTE.len() as i64 - 1)?;
    check_len(index, "label", &r.label, MAX_LABEL_LENGTH)?;
    if !label_is_safe(&r.label) {
        return Err(field(index, "label", "contains angle brackets or quotes"));
    }
    check_len(index, "value", &r.value, MAX_EXPRESSION_LENGTH)?;
    let width = check_int(index, "width", r.width, 1, MAX_PHASOR_WIDTH.into())? as u32;
    let arrow = check_int(index, "arrow", r.arrow, 0, i64::from(ARROW_TYPE_COUNT) - 1)? as u32;
    let arrow_size = check_int(
        index,
        "arrow_size",
        r.arrow_size,
        ARROW_SIZE_MIN.into(),
        ARROW_SIZE_MAX.into(),
    )? as u32;
    let skin = check_int(index, "skin", r.skin, 0, i64::from(SKIN_COUNT) - 1)? as u32;
    let outline_width =
        check_int(index, "outline_width", r.outline_width, 0, MAX_OUTLINE_WIDTH.into())? as u32;

    check_len(index, "symbol", &r.symbol, MAX_SYMBOL_LENGTH)?;
    if !r.symbol.is_empty() {
        check_symbol(&r.symbol).map_err(|e| field(index, "symbol", e.to_string()))?;
    }
    check_int(index, "parent", r.parent, -1, MAX_ID.into())?;
    if r.parent == r.id {
        return Err(field(index, "parent", "refers to the record itself"));
    }

    let (color, color_index) = if color_index < 0 {
        let text = r
            .color
            .as_deref()
            .ok_or_else(|| field(index, "color", "is required for a custom color"))?;
        (parse_color(index, text)?, None)
    } else {
        let slot = color_index as usize;
        (PALETTE[slot], Some(slot))
    };
    let outline_color = parse_color(index, &r.outline_color)?;

    Ok(Candidate {
        id: PhasorId(id),
        parent: u32::try_from(r.parent).ok().map(PhasorId),
        symbol: (!r.symbol.is_empty()).then(|| r.symbol.clone()),
        style: Style {
            label: r.label.clone(),
            color,
            color_index,
            outline_color,
            outline_width,
            width,
            arrow,
            arrow_size,
            skin,
            visible: r.visible,
        },
    })
}

/// Cross-record checks: ids, parents, symbols and parent loops.
///
/// Expression texts may still reference each other in a loop, the editor
/// saves such states too. The parse pass after the swap refuses to link the
/// closing edge, so no dependency loop is ever stored.
fn check_links(records: &[PhasorRecord], candidates: &[Candidate]) -> Result<(), LoadError> {
    let mut ids = HashSet::new();
    for (index, c) in candidates.iter().enumerate() {
        if !ids.insert(c.id) {
            return Err(field(index, "id", "is used by an earlier record"));
        }
    }

    let mut symbols: HashMap<&str, PhasorId> = HashMap::new();
    for (index, c) in candidates.iter().enumerate() {
        if let Some(parent) = c.parent {
            if !ids.contains(&parent) {
                return Err(LoadError::UnresolvedParent {
                    index,
                    parent: records[index].parent,
                });
            }
        }
        if let Some(symbol) = c.symbol.as_deref() {
            if symbols.insert(symbol, c.id).is_some() {
                return Err(LoadError::DuplicateSymbol(symbol.to_string()));
            }
        }
    }

    let parents: HashMap<PhasorId, PhasorId> = candidates
        .iter()
        .filter_map(|c| c.parent.map(|p| (c.id, p)))
        .collect();
    for c in candidates {
        let mut seen = HashSet::from([c.id]);
        let mut cur = parents.get(&c.id);
        while let Some(&p) = cur {
            if !seen.insert(p) {
                return Err(LoadError::ParentCycle(c.id));
            }
            cur = parents.get(&p);
        }
    }

    Ok(())
}

impl Registry {
    /// Replace the whole registry with saved records.
    ///
    /// Every record is checked before anything changes: on error the
    /// registry is left exactly as it was. After the swap, expressions are
    /// parsed repeatedly until a pass makes no progress, so records may
    /// reference symbols and parents that appear later in the list.
    pub fn load(&mut self, records: &[PhasorRecord]) -> Result<(), LoadError> {
        let checked = records
            .iter()
            .enumerate()
            .map(|(index, r)| check_record(index, r))
            .collect::<Result<Vec<_>, _>>()
            .and_then(|candidates| check_links(records, &candidates).map(|()| candidates));
        let candidates = match checked {
            Ok(candidates) => candidates,
            Err(error) => {
                crate::log::warn!(%error, "load rejected");
                return Err(error);
            }
        };

        self.clear();
        for (r, c) in records.iter().zip(candidates) {
            if let Some(index) = c.style.color_index {
                self.color_usage[index] += 1;
            }
            if let Some(symbol) = &c.symbol {
                self.symbols.insert(symbol.clone(), c.id);
            }
            let root = c.parent.is_none();
            let phasor = Phasor {
                id: c.id,
                value: Complex64::new(f64::NAN, f64::NAN),
                parent: c.parent.map_or(ParentLink::Root, ParentLink::Child),
                symbol: c.symbol,
                dependencies: Vec::new(),
                expression: r.value.clone(),
                compiled: None,
                error: None,
                system: CoordSystem::None,
                valid_expression: false,
                valid_parent: root,
                valid: false,
                style: c.style,
                placement: None,
            };
            self.phasors.insert(c.id, phasor);
            self.order.push(c.id);
            self.changes.push(Change::Added(c.id));
        }

        self.next_id = self.phasors.keys().map(|id| id.0 + 1).max().unwrap_or(0);
        self.free_ids = (0..self.next_id)
            .filter(|&i| !self.phasors.contains_key(&PhasorId(i)))
            .collect();
        self.label_index = self.next_id;

        let mut parsed = vec![false; records.len()];
        loop {
            let mut progress = false;
            for (index, record) in records.iter().enumerate() {
                let id = self.order[index];
                if parsed[index] || !self.parent_ready(id) {
                    continue;
                }
                self.apply_expression(id, &record.value);
                self.evaluate_dependents(id);
                if self.phasors.get(&id).is_some_and(|p| p.valid) {
                    parsed[index] = true;
                    progress = true;
                }
            }
            if !progress {
                break;
            }
        }

        // expressions under a parent that never became valid still feed
        // their dependents, the same as while editing
        let mut invalid = usize::MAX;
        loop {
            let still_invalid = self.reparse_invalids();
            if still_invalid >= invalid {
                break;
            }
            invalid = still_invalid;
        }

        crate::log::debug!(
            count = records.len(),
            valid = parsed.iter().filter(|&&p| p).count(),
            "load committed"
        );
        self.update_coordinates();
        Ok(())
    }

    /// Parse a JSON array of records and load it
    pub fn load_json(&mut self, json: &str) -> Result<(), LoadError> {
        let records: Vec<PhasorRecord> = serde_json::from_str(json)?;
        self.load(&records)
    }

    fn parent_ready(&self, id: PhasorId) -> bool {
        match self.phasors.get(&id).map(|p| p.parent) {
            Some(ParentLink::Child(parent)) => self.phasors.get(&parent).is_some_and(|p| p.valid),
            Some(ParentLink::Root | ParentLink::Orphaned) => true,
            None => false,
        }
    }

    /// Records for every phasor in presentation order
    pub fn records(&self) -> Vec<PhasorRecord> {
        self.phasors()
            .map(|p| PhasorRecord {
                id: p.id.0.into(),
                parent: p.parent().map_or(-1, |id| id.0.into()),
                value: p.expression.clone(),
                width: p.style.width.into(),
                skin: p.style.skin.into(),
                arrow: p.style.arrow.into(),
                arrow_size: p.style.arrow_size.into(),
                visible: p.style.visible,
                label: p.style.label.clone(),
                color_index: p.style.color_index.map_or(-1, |i| i as i64),
                color: Some(p.style.color.to_string()),
                outline_width: p.style.outline_width.into(),
                outline_color: p.style.outline_color.to_string(),
                symbol: p.symbol.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// The records as a JSON array, loadable by [`Registry::load_json`]
    pub fn stringify(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.records())
    }
}
