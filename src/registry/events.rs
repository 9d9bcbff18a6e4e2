//! Change notifications for the presentation layer

use crate::types::PhasorId;

/// Something the presentation layer should redraw.
///
/// Queued during a mutation and drained with
/// [`Registry::take_changes`](super::Registry::take_changes) once the
/// mutation and all of its cascades have finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added(PhasorId),
    Removed(PhasorId),
    /// Every phasor was discarded (reset or bulk load)
    Cleared,
    Label(PhasorId),
    Symbol(PhasorId),
    Parent(PhasorId),
    ParentValidity(PhasorId),
    Expression(PhasorId),
    ExpressionValidity(PhasorId),
    Visible(PhasorId),
    System(PhasorId),
    Skin(PhasorId),
    /// Color, width, outline or arrow
    Style(PhasorId),
    Selection,
    /// Placements and the maximum magnitude were recomputed
    Layout,
}
