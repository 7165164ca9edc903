//! Shape registry: node archetypes and the handles each one exposes.
//!
//! Handles are not stored; they are derived from the archetype. A handle is
//! either a connection source or a connection target.
//!
//! | Archetype | Palette tag | Handles |
//! |-----------|-------------|---------|
//! | Rectangle | `default` | `top` (target), `bottom` (source) |
//! | Circle | `circle` | `top` (target), `bottom` (source) |
//! | Diamond | `diamond` | `top` (target), `right`/`bottom`/`left` (source) |
//! | Rounded | `rounded` | `top` (target), `bottom` (source) |

use crate::model::Point;
use serde::{Deserialize, Serialize};

/// A node's visual/structural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Rectangle,
    Circle,
    Diamond,
    Rounded,
}

/// Which side of the node's box a handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Whether edges start or end at a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleRole {
    Source,
    Target,
}

impl HandleRole {
    pub fn as_str(self) -> &'static str {
        match self {
            HandleRole::Source => "source",
            HandleRole::Target => "target",
        }
    }
}

/// A named attachment point on an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleSpec {
    pub id: &'static str,
    pub side: Side,
    pub role: HandleRole,
}

const fn handle(id: &'static str, side: Side, role: HandleRole) -> HandleSpec {
    HandleSpec { id, side, role }
}

const TWO_HANDLES: &[HandleSpec] = &[
    handle("top", Side::Top, HandleRole::Target),
    handle("bottom", Side::Bottom, HandleRole::Source),
];

const DIAMOND_HANDLES: &[HandleSpec] = &[
    handle("top", Side::Top, HandleRole::Target),
    handle("right", Side::Right, HandleRole::Source),
    handle("bottom", Side::Bottom, HandleRole::Source),
    handle("left", Side::Left, HandleRole::Source),
];

impl Archetype {
    /// Palette order.
    pub const ALL: [Archetype; 4] = [
        Archetype::Rectangle,
        Archetype::Circle,
        Archetype::Diamond,
        Archetype::Rounded,
    ];

    /// Resolve a palette drag payload. `rectangle`/`rect` are accepted as
    /// aliases for `default`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "default" | "rectangle" | "rect" => Some(Self::Rectangle),
            "circle" => Some(Self::Circle),
            "diamond" => Some(Self::Diamond),
            "rounded" => Some(Self::Rounded),
            _ => None,
        }
    }

    /// The palette tag carried in drag payloads.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Rectangle => "default",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
            Self::Rounded => "rounded",
        }
    }

    /// Label given to a freshly spawned node.
    pub fn default_label(self) -> String {
        format!("{} Node", self.tag())
    }

    /// Box size used for handle anchors, hit testing, and painting.
    pub fn size(self) -> (f32, f32) {
        match self {
            Self::Rectangle => (120.0, 44.0),
            Self::Circle => (80.0, 80.0),
            Self::Diamond => (80.0, 80.0),
            Self::Rounded => (130.0, 52.0),
        }
    }

    pub fn handles(self) -> &'static [HandleSpec] {
        match self {
            Self::Diamond => DIAMOND_HANDLES,
            _ => TWO_HANDLES,
        }
    }

    pub fn handle(self, id: &str) -> Option<&'static HandleSpec> {
        self.handles().iter().find(|h| h.id == id)
    }

    /// True if `id` names a handle on this archetype with the given role.
    pub fn accepts(self, id: &str, role: HandleRole) -> bool {
        self.handle(id).is_some_and(|h| h.role == role)
    }

    /// First handle with the given role; used when a gesture names none.
    pub fn default_handle(self, role: HandleRole) -> Option<&'static HandleSpec> {
        self.handles().iter().find(|h| h.role == role)
    }
}

/// Canvas-space anchor of a handle on a node whose top-left is `origin`.
pub fn handle_anchor(archetype: Archetype, side: Side, origin: Point) -> Point {
    let (w, h) = archetype.size();
    match side {
        Side::Top => Point::new(origin.x + w / 2.0, origin.y),
        Side::Right => Point::new(origin.x + w, origin.y + h / 2.0),
        Side::Bottom => Point::new(origin.x + w / 2.0, origin.y + h),
        Side::Left => Point::new(origin.x, origin.y + h / 2.0),
    }
}
