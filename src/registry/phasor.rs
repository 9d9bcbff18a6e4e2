//! The phasor entity

use glam::DVec2;
use num_complex::Complex64;

use crate::color::Color;
use crate::defaults::{
    DEFAULT_ARROW, DEFAULT_ARROW_SIZE, DEFAULT_OUTLINE_WIDTH, DEFAULT_WIDTH, PALETTE,
};
use crate::errors::ExprError;
use crate::expression::Expression;
use crate::format;
use crate::types::{CoordSystem, PhasorId};

/// Where a phasor is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentLink {
    /// Starts at the plane origin
    #[default]
    Root,
    /// Starts at the endpoint of another live phasor
    Child(PhasorId),
    /// The parent was deleted. Never drawn until a new parent is assigned
    /// or the link is cleared.
    Orphaned,
}

impl ParentLink {
    pub fn id(self) -> Option<PhasorId> {
        match self {
            ParentLink::Child(id) => Some(id),
            ParentLink::Root | ParentLink::Orphaned => None,
        }
    }
}

/// Absolute placement in the plane, set by the coordinate pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub origin: DVec2,
    pub endpoint: DVec2,
}

/// Presentation attributes. Opaque to validity and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub label: String,
    pub color: Color,
    /// Palette slot the fill color matches, if any
    pub color_index: Option<usize>,
    pub outline_color: Color,
    pub outline_width: u32,
    pub width: u32,
    pub arrow: u32,
    pub arrow_size: u32,
    pub skin: u32,
    pub visible: bool,
}

impl Style {
    pub(crate) fn with_palette(color_index: usize, label: String) -> Self {
        let color = PALETTE[color_index];
        Style {
            label,
            color,
            color_index: Some(color_index),
            outline_color: color,
            outline_width: DEFAULT_OUTLINE_WIDTH,
            width: DEFAULT_WIDTH,
            arrow: DEFAULT_ARROW,
            arrow_size: DEFAULT_ARROW_SIZE,
            skin: 0,
            visible: true,
        }
    }
}

#[derive(Debug)]
pub struct Phasor {
    pub(crate) id: PhasorId,
    pub(crate) value: Complex64,
    pub(crate) parent: ParentLink,
    pub(crate) symbol: Option<String>,
    /// Phasors whose symbols this one's expression references
    pub(crate) dependencies: Vec<PhasorId>,
    /// Text of the expression field
    pub(crate) expression: String,
    pub(crate) compiled: Option<Expression>,
    pub(crate) error: Option<ExprError>,
    pub(crate) system: CoordSystem,
    pub(crate) valid_expression: bool,
    pub(crate) valid_parent: bool,
    pub(crate) valid: bool,
    pub(crate) style: Style,
    pub(crate) placement: Option<Placement>,
}

impl Phasor {
    pub(crate) fn new(id: PhasorId, value: Complex64, style: Style) -> Self {
        let valid = value.re.is_finite() && value.im.is_finite();
        let expression = if valid {
            format::template(CoordSystem::Cartesian, value).unwrap_or_default()
        } else {
            String::new()
        };
        Phasor {
            id,
            value,
            parent: ParentLink::Root,
            symbol: None,
            dependencies: Vec::new(),
            compiled: Expression::compile(&expression).ok(),
            expression,
            error: if valid { None } else { Some(ExprError::NonFinite) },
            system: CoordSystem::Cartesian,
            valid_expression: valid,
            valid_parent: true,
            valid,
            style,
            placement: None,
        }
    }

    pub fn id(&self) -> PhasorId {
        self.id
    }

    pub fn value(&self) -> Complex64 {
        self.value
    }

    pub fn length(&self) -> f64 {
        self.value.norm()
    }

    /// Live parent, if any
    pub fn parent(&self) -> Option<PhasorId> {
        self.parent.id()
    }

    pub fn parent_link(&self) -> ParentLink {
        self.parent
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn dependencies(&self) -> &[PhasorId] {
        &self.dependencies
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn system(&self) -> CoordSystem {
        self.system
    }

    /// Why the last expression failed, if it did
    pub fn error(&self) -> Option<&ExprError> {
        self.error.as_ref()
    }

    pub fn valid_expression(&self) -> bool {
        self.valid_expression
    }

    pub fn valid_parent(&self) -> bool {
        self.valid_parent
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn label(&self) -> &str {
        &self.style.label
    }

    pub fn visible(&self) -> bool {
        self.style.visible
    }

    /// Placement of a drawn phasor. `None` when invalid, hidden or zero length.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn origin(&self) -> Option<DVec2> {
        self.placement.map(|p| p.origin)
    }

    pub fn endpoint(&self) -> Option<DVec2> {
        self.placement.map(|p| p.endpoint)
    }

    /// `( x , y ) , length: L , φ: R rad / D°`, empty when invalid
    pub fn info(&self) -> String {
        if self.valid {
            format::info(self.value)
        } else {
            String::new()
        }
    }

    /// The value written in one of the three representations
    pub fn coordinates(&self, system: CoordSystem) -> Option<String> {
        if self.valid {
            format::template(system, self.value)
        } else {
            None
        }
    }
}
