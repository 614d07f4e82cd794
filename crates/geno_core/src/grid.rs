//! Layout grid shared by the editor core and the renderer.
//!
//! Every entity position is a multiple of [`GRID_GAP`], and node sizes are
//! whole multiples of it, so all shapes sit on the same background grid.

use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Base grid unit in pixels.
pub const GRID_GAP: i32 = 30;

/// Quantized node size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeClass {
    /// One grid gap
    Small,
    /// Two grid gaps
    #[default]
    Default,
    /// Three grid gaps
    Large,
}

impl SizeClass {
    /// Number of grid gaps covered by this size
    pub const fn multiplier(self) -> i32 {
        match self {
            SizeClass::Small => 1,
            SizeClass::Default => 2,
            SizeClass::Large => 3,
        }
    }

    /// Edge length in pixels
    pub const fn extent(self) -> i32 {
        GRID_GAP * self.multiplier()
    }

    pub fn name(&self) -> &'static str {
        match self {
            SizeClass::Small => "SMALL",
            SizeClass::Default => "DEFAULT",
            SizeClass::Large => "LARGE",
        }
    }

    pub fn all() -> &'static [SizeClass] {
        &[SizeClass::Small, SizeClass::Default, SizeClass::Large]
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown or empty names fall back to [`SizeClass::Default`].
impl FromStr for SizeClass {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "SMALL" => SizeClass::Small,
            "LARGE" => SizeClass::Large,
            _ => SizeClass::Default,
        })
    }
}

impl<'de> Deserialize<'de> for SizeClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or_default())
    }
}

/// Round a coordinate to the nearest grid line. Ties round up.
pub fn snap(value: i32) -> i32 {
    let rem = value.rem_euclid(GRID_GAP);
    if rem * 2 >= GRID_GAP {
        value - rem + GRID_GAP
    } else {
        value - rem
    }
}

/// Snap a pointer coordinate to the grid.
pub fn snap_f32(value: f32) -> i32 {
    let gap = GRID_GAP as f32;
    ((value / gap).round() * gap) as i32
}

/// A pixel position on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build a point from pointer coordinates, snapped to the grid
    pub fn from_pointer(x: f32, y: f32) -> Self {
        Self {
            x: snap_f32(x),
            y: snap_f32(y),
        }
    }

    /// Nearest grid-aligned point
    pub fn snapped(self) -> Self {
        Self {
            x: snap(self.x),
            y: snap(self.y),
        }
    }

    /// Whether both coordinates sit on grid lines
    pub fn is_aligned(&self) -> bool {
        self.x.rem_euclid(GRID_GAP) == 0 && self.y.rem_euclid(GRID_GAP) == 0
    }
}

/// Axis-aligned bounding box in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn contains(&self, point: GridPoint) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}
