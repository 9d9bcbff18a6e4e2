//! Validity propagation
//!
//! `valid` is kept equal to `valid_expression && valid_parent` eagerly. A
//! flip of either flag recurses into the phasors that observe it: children
//! through their parent link, dependents through their expression. Both
//! relations are kept acyclic at edit time (parent assignment walks the
//! ancestor chain, expressions are checked for dependency loops before they
//! are linked), so every recursion here runs over a DAG and terminates.

use std::collections::HashSet;

use crate::types::PhasorId;

use super::{Change, ParentLink, Registry};

impl Registry {
    /// Set `valid_expression`, cascading to dependents and children.
    /// No-op when unchanged.
    pub(crate) fn set_valid_expression(&mut self, id: PhasorId, valid_expression: bool) {
        let Some(p) = self.phasors.get_mut(&id) else {
            return;
        };
        if p.valid_expression == valid_expression {
            return;
        }
        p.valid_expression = valid_expression;
        p.valid = p.valid_expression && p.valid_parent;
        let valid = p.valid;
        crate::log::trace!(%id, valid_expression, valid, "expression validity");
        self.changes.push(Change::ExpressionValidity(id));

        for (other, is_child, is_dependent) in self.observers(id) {
            if is_child {
                self.set_valid_parent(other, valid);
            }
            if is_dependent {
                self.set_valid_expression(other, valid_expression);
            }
        }
    }

    /// Set `valid_parent`, cascading to children. No-op when unchanged.
    pub(crate) fn set_valid_parent(&mut self, id: PhasorId, valid_parent: bool) {
        let Some(p) = self.phasors.get_mut(&id) else {
            return;
        };
        if p.valid_parent == valid_parent {
            return;
        }
        p.valid_parent = valid_parent;
        p.valid = p.valid_expression && p.valid_parent;
        let valid = p.valid;
        crate::log::trace!(%id, valid_parent, valid, "parent validity");
        self.changes.push(Change::ParentValidity(id));

        for (other, is_child, _) in self.observers(id) {
            if is_child {
                self.set_valid_parent(other, valid);
            }
        }
    }

    /// Phasors that hang off `id` or reference it, in presentation order
    fn observers(&self, id: PhasorId) -> Vec<(PhasorId, bool, bool)> {
        self.order
            .iter()
            .filter(|&&o| o != id)
            .filter_map(|o| self.phasors.get(o))
            .filter_map(|o| {
                let is_child = o.parent == ParentLink::Child(id);
                let is_dependent = o.dependencies.contains(&id);
                (is_child || is_dependent).then_some((o.id, is_child, is_dependent))
            })
            .collect()
    }

    /// Re-evaluate everything that transitively depends on `id`, each
    /// phasor once and only after all of its own inputs.
    ///
    /// A dependent reads its inputs through [`Scope`](crate::eval::Scope),
    /// which only looks at `valid_expression`. A source that is invalid
    /// because of its parent alone still publishes its value.
    pub(crate) fn evaluate_dependents(&mut self, id: PhasorId) {
        for dep in self.dependents_in_order(id) {
            self.reevaluate(dep);
        }
    }

    /// Transitive dependents of `id` in topological order. Ties keep
    /// presentation order.
    fn dependents_in_order(&self, id: PhasorId) -> Vec<PhasorId> {
        let mut reached = HashSet::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            for (other, _, is_dependent) in self.observers(next) {
                if is_dependent && reached.insert(other) {
                    stack.push(other);
                }
            }
        }

        let mut ordered = Vec::with_capacity(reached.len());
        let mut done = HashSet::new();
        while ordered.len() < reached.len() {
            let before = ordered.len();
            for &other in &self.order {
                if !reached.contains(&other) || done.contains(&other) {
                    continue;
                }
                let ready = self.phasors.get(&other).is_some_and(|p| {
                    p.dependencies
                        .iter()
                        .all(|d| !reached.contains(d) || done.contains(d))
                });
                if ready {
                    done.insert(other);
                    ordered.push(other);
                }
            }
            // dependency edges are acyclic, so every pass makes progress
            if ordered.len() == before {
                break;
            }
        }
        ordered
    }

    /// Evaluate the cached expression again against the current scope
    fn reevaluate(&mut self, id: PhasorId) {
        let Some(result) = self
            .phasors
            .get(&id)
            .and_then(|p| p.compiled.as_ref())
            .map(|c| c.evaluate(self))
        else {
            return;
        };
        let Some(p) = self.phasors.get_mut(&id) else {
            return;
        };
        match result {
            Ok(value) => {
                p.value = value;
                p.error = None;
                if let Some(c) = &p.compiled {
                    p.system = c.system();
                }
                self.set_valid_expression(id, true);
            }
            Err(error) => {
                p.error = Some(error);
                self.set_valid_expression(id, false);
            }
        }
        self.changes.push(Change::Expression(id));
    }

    /// Retry every phasor whose expression is invalid, using its stored text.
    /// Returns how many are still invalid.
    pub(crate) fn reparse_invalids(&mut self) -> usize {
        let mut still_invalid = 0;
        for id in self.order.clone() {
            let Some(p) = self.phasors.get(&id) else {
                continue;
            };
            if p.valid_expression {
                continue;
            }
            let source = p.expression.clone();
            if !self.apply_expression(id, &source) {
                still_invalid += 1;
            }
            self.evaluate_dependents(id);
        }
        still_invalid
    }
}
