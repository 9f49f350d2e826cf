//! Module records mutated during placement.

use crate::geom::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The module registry the placement core borrows for the duration of a run.
///
/// Keys are module names. The core is the exclusive writer of the `x`, `y`,
/// and `rotated` fields of the contained records while it holds the borrow.
pub type ModuleMap = HashMap<String, Module>;

/// A rectangular circuit module.
///
/// Dimensions are integers on the placement grid. The position `(x, y)` is
/// the bottom-left corner and is rewritten on every packing pass.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Module {
    /// Unique module name within its registry.
    pub name: String,
    /// Current width (reflects rotation).
    pub width: i32,
    /// Current height (reflects rotation).
    pub height: i32,
    /// X-coordinate of the left edge.
    pub x: i32,
    /// Y-coordinate of the bottom edge.
    pub y: i32,
    /// Whether the module is rotated 90 degrees from its library orientation.
    pub rotated: bool,
}

impl Module {
    /// Creates an unplaced module at the origin in library orientation.
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            x: 0,
            y: 0,
            rotated: false,
        }
    }

    /// Rotates the module 90 degrees, swapping width and height.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
        self.rotated = !self.rotated;
    }

    /// Sets the rotation flag without touching dimensions.
    ///
    /// Used to align a mate's orientation bookkeeping with its
    /// representative once their dimensions already match.
    pub fn set_rotated(&mut self, rotated: bool) {
        self.rotated = rotated;
    }

    /// Moves the module's bottom-left corner.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// X-coordinate of the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Y-coordinate of the top edge.
    pub fn top(&self) -> i32 {
        self.y + self.height
    }

    /// X-coordinate of the module center (half-integer for odd widths).
    pub fn center_x(&self) -> f64 {
        self.x as f64 + self.width as f64 / 2.0
    }

    /// Y-coordinate of the module center (half-integer for odd heights).
    pub fn center_y(&self) -> f64 {
        self.y as f64 + self.height as f64 / 2.0
    }

    /// The currently occupied rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
