pub mod assemble;
pub mod encode;

use crate::error::OcrLayerError;
use crate::model::CharBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangular extent `(xmin, ymin, xmax, ymax)` in pixels.
///
/// A fresh perimeter is empty: its minimums sit above its maximums so that the
/// first merge adopts the child's extent outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perimeter {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl Perimeter {
    pub const EMPTY: Perimeter = Perimeter {
        xmin: i32::MAX,
        ymin: i32::MAX,
        xmax: i32::MIN,
        ymax: i32::MIN,
    };

    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Perimeter {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Widen to include `other`. Never shrinks.
    pub fn merge(&mut self, other: &Perimeter) {
        self.xmin = self.xmin.min(other.xmin);
        self.ymin = self.ymin.min(other.ymin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymax = self.ymax.max(other.ymax);
    }

    pub fn is_consistent(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }
}

impl Default for Perimeter {
    fn default() -> Self {
        Perimeter::EMPTY
    }
}

impl fmt::Display for Perimeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

/// Anything with a rectangular extent that can be merged into a parent box.
pub trait Bounded {
    fn perimeter(&self) -> Perimeter;
}

impl Bounded for CharBox {
    fn perimeter(&self) -> Perimeter {
        Perimeter::new(self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

/// A box whose perimeter is the union of its ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox<C> {
    perimeter: Perimeter,
    children: Vec<C>,
}

impl<C: Bounded> BoundingBox<C> {
    pub fn new() -> Self {
        BoundingBox {
            perimeter: Perimeter::EMPTY,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: C) {
        self.perimeter.merge(&child.perimeter());
        self.children.push(child);
    }

    pub fn children(&self) -> &[C] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Check that the extremes are consistent (`min <= max` on both axes).
    ///
    /// An empty box always fails.
    pub fn validate(&self) -> Result<(), OcrLayerError> {
        if self.perimeter.is_consistent() {
            Ok(())
        } else {
            Err(OcrLayerError::InvalidBox(format!(
                "x/y min exceed x/y max ({})",
                self.perimeter
            )))
        }
    }
}

impl<C: Bounded> Default for BoundingBox<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Bounded for BoundingBox<C> {
    fn perimeter(&self) -> Perimeter {
        self.perimeter
    }
}

pub type WordBox = BoundingBox<CharBox>;
pub type LineBox = BoundingBox<WordBox>;
pub type PageBox = BoundingBox<LineBox>;

impl WordBox {
    /// Concatenated character labels.
    pub fn text(&self) -> String {
        self.children.iter().map(|c| c.ch).collect()
    }
}
