use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    widgets::Widget,
};
use rtrack_core::types::Marker;

/// Pixels covered by one terminal column. Rows are twice as tall.
pub const CELL_WIDTH_PX: f64 = 25.0;
pub const CELL_HEIGHT_PX: f64 = 50.0;

/// Draws markers of one container, oldest first so the latest one is on top.
pub struct MapView<'a> {
    markers: &'a [Marker],
    /// Pixels per grid unit, used to dot the grid
    scale: f64,
}

impl<'a> MapView<'a> {
    pub fn new(markers: &'a [Marker], scale: f64) -> Self {
        Self { markers, scale }
    }
}

/// Terminal cell holding the given pixel offset, if it is not left of or above the map
pub fn cell_of(marker: &Marker) -> Option<(u16, u16)> {
    let col = (marker.left() / CELL_WIDTH_PX).floor();
    let row = (marker.top() / CELL_HEIGHT_PX).floor();
    if col < 0.0 || row < 0.0 || col > u16::MAX as f64 || row > u16::MAX as f64 {
        return None;
    }
    Some((col as u16, row as u16))
}

impl Widget for MapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().dark_gray();
        let cols_per_unit = (self.scale / CELL_WIDTH_PX).round().max(1.0) as u16;
        let rows_per_unit = (self.scale / CELL_HEIGHT_PX).round().max(1.0) as u16;

        for y in (0..area.height).step_by(rows_per_unit as usize) {
            for x in (0..area.width).step_by(cols_per_unit as usize) {
                buf.set_string(area.x + x, area.y + y, "·", dim);
            }
        }

        let Some((latest, trail)) = self.markers.split_last() else {
            return;
        };

        for marker in trail {
            if let Some((x, y)) = cell_of(marker)
                && x < area.width
                && y < area.height
            {
                buf.set_string(area.x + x, area.y + y, "o", Style::default().yellow());
            }
        }

        if let Some((x, y)) = cell_of(latest)
            && x < area.width
            && y < area.height
        {
            buf.set_string(area.x + x, area.y + y, "@", Style::default().green().bold());
        }
    }
}
