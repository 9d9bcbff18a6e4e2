//! Property checks for the coordinate system sizing

use approx::relative_eq;
use phasorviz::render::defaults::VIEWBOX_BASE;
use phasorviz::{Layout, Settings};
use proptest::prelude::*;

fn magnitude() -> impl Strategy<Value = f64> {
    prop_oneof![
        (1e-6f64..1.0),
        (1.0f64..1000.0),
        (1000.0f64..1e7),
        (-6i32..7).prop_map(|e| 10f64.powi(e)),
    ]
}

fn quadrants() -> impl Strategy<Value = u32> {
    0u32..=4
}

proptest! {
    #[test]
    fn rings_cover_the_longest_phasor(m in magnitude(), q in quadrants()) {
        let layout = Layout::new(m, q, 11, None);
        prop_assert!(f64::from(layout.rings) * layout.units.circle > m);
        prop_assert!((2..=12).contains(&layout.rings), "rings {} for {}", layout.rings, m);
        prop_assert!(relative_eq!(layout.max_circle, VIEWBOX_BASE, max_relative = 1e-9));
        prop_assert!(layout.units.ticks < layout.units.circle);
    }

    #[test]
    fn units_grow_with_magnitude(a in magnitude(), b in magnitude(), q in quadrants()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let small = Layout::new(lo, q, 11, None);
        let large = Layout::new(hi, q, 11, None);
        prop_assert!(small.units.circle <= large.units.circle);
        let covered = |l: &Layout| f64::from(l.rings) * l.units.circle;
        prop_assert!(covered(&small) <= covered(&large) * (1.0 + 1e-12));
    }

    #[test]
    fn viewbox_is_square_and_holds_the_compass(m in magnitude(), q in quadrants(), text in 7u32..=20) {
        let layout = Layout::new(m, q, text, None);
        let vb = layout.viewbox;
        prop_assert_eq!(vb.width, vb.height);
        prop_assert!(vb.x <= 0.0 && vb.y <= 0.0);
        prop_assert!(vb.width >= layout.max_circle);
        if q == 0 {
            prop_assert!(vb.x + vb.width >= layout.max_circle);
        }
    }

    #[test]
    fn text_scales_with_settings(text in 7u32..=20) {
        let mut settings = Settings::default();
        settings.labels.textsize = text;
        let full = Layout::compute(3.0, &settings);
        settings.quadrants = 2;
        let quadrant = Layout::compute(3.0, &settings);
        prop_assert!(relative_eq!(full.textsize, 2.0 * quadrant.textsize));
        prop_assert!(full.max > VIEWBOX_BASE);
    }
}
