use std::fmt;

use serde::{Deserialize, Serialize};

/// Pixels per grid unit on the map.
pub const PIXELS_PER_UNIT: f64 = 50.0;

/// Css class given to every device marker.
pub const MARKER_CLASS: &str = "device";

/// Device id used when a payload does not name its device.
pub const DEFAULT_DEVICE: &str = "device";

/**
* A location in room-relative grid units.
* No bounds are enforced: whatever the feed reports is what gets drawn.
*/
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Map the position to pixel offsets, `scale` pixels per unit.
    pub fn scaled(&self, scale: f64) -> PixelOffset {
        PixelOffset {
            left: self.x * scale,
            top: self.y * scale,
        }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position { x, y }
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Position { x, y }
    }
}

impl From<Position> for (f64, f64) {
    fn from(value: Position) -> Self {
        (value.x, value.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelOffset {
    pub left: f64,
    pub top: f64,
}

impl PixelOffset {
    /// Css value for the `left` property, e.g. `100px`
    pub fn left_css(&self) -> String {
        css_px(self.left)
    }

    /// Css value for the `top` property
    pub fn top_css(&self) -> String {
        css_px(self.top)
    }
}

fn css_px(value: f64) -> String {
    format!("{value}px")
}

/// A position decoded from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    pub device_id: Option<DeviceId>,
    pub position: Position,
    /// Server-side timestamp, kept verbatim when the feed sends one
    pub timestamp: Option<String>,
}

impl PositionReport {
    pub fn new(position: Position) -> Self {
        Self {
            device_id: None,
            position,
            timestamp: None,
        }
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(DeviceId::new(device_id));
        self
    }
}

/**
* One visual marker on the map.
* Markers carry no identity of their own: the device id is what keyed
* rendering uses to find a previous marker.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub device: DeviceId,
    pub class: String,
    pub offset: PixelOffset,
}

impl Marker {
    pub fn new(device: DeviceId, position: Position, scale: f64) -> Self {
        Self {
            device,
            class: MARKER_CLASS.to_string(),
            offset: position.scaled(scale),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn left(&self) -> f64 {
        self.offset.left
    }

    pub fn top(&self) -> f64 {
        self.offset.top
    }
}
