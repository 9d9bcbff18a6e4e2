//! Placement of every drawn phasor

use glam::DVec2;

use super::{Change, Placement, Registry};

impl Registry {
    /// Recompute placements and the maximum magnitude over the whole set.
    ///
    /// Only valid, visible phasors are placed. A zero-length phasor gets no
    /// placement and does not count toward the magnitude.
    pub(crate) fn update_coordinates(&mut self) {
        let mut max_magnitude: f64 = 0.0;

        for id in self.order.clone() {
            let placement = self.phasors.get(&id).and_then(|p| {
                if !(p.valid && p.style.visible) {
                    return None;
                }
                let origin = self
                    .ancestors(id)
                    .fold(DVec2::ZERO, |acc, a| acc + DVec2::new(a.value.re, a.value.im));
                let endpoint = origin + DVec2::new(p.value.re, p.value.im);
                (origin != endpoint).then_some(Placement { origin, endpoint })
            });

            if let Some(Placement { origin, endpoint }) = placement {
                max_magnitude = max_magnitude.max(origin.length()).max(endpoint.length());
            }
            if let Some(p) = self.phasors.get_mut(&id) {
                p.placement = placement;
            }
        }

        crate::log::trace!(max_magnitude, "coordinates updated");
        self.max_magnitude = max_magnitude;
        self.changes.push(Change::Layout);
    }
}

#[cfg(test)]
mod tests {
    use super::super::Attribute;
    use super::*;

    #[test]
    fn chained_placement() {
        let mut reg = Registry::new();
        let a = reg.add(Some(3.0), Some(4.0));
        let b = reg.add(Some(1.0), Some(0.0));
        reg.set(a, Attribute::Symbol("A".into())).unwrap();
        reg.set(b, Attribute::Parent("A".into())).unwrap();

        let pa = reg.get(a).unwrap().placement().unwrap();
        assert_eq!(pa.origin, DVec2::ZERO);
        assert_eq!(pa.endpoint, DVec2::new(3.0, 4.0));
        let pb = reg.get(b).unwrap().placement().unwrap();
        assert_eq!(pb.origin, DVec2::new(3.0, 4.0));
        assert_eq!(pb.endpoint, DVec2::new(4.0, 4.0));
        assert_eq!(reg.max_magnitude(), (32.0f64).sqrt());
    }

    #[test]
    fn hidden_and_zero_length_are_skipped() {
        let mut reg = Registry::new();
        let a = reg.add(Some(10.0), Some(0.0));
        let z = reg.add(Some(0.0), Some(0.0));
        assert!(reg.get(z).unwrap().is_valid());
        assert!(reg.get(z).unwrap().placement().is_none());
        assert_eq!(reg.max_magnitude(), 10.0);

        reg.set(a, Attribute::Visible(false)).unwrap();
        assert!(reg.get(a).unwrap().placement().is_none());
        assert_eq!(reg.max_magnitude(), 0.0);
    }
}
