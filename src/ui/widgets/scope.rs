use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line};
use ratatui::widgets::{Block, Borders, Widget};

use crate::audio::analyser::SharedAnalyser;
use crate::constants::FREQUENCY_BIN_COUNT;
use crate::ui::theme;

/// Logical drawing surface; the canvas scales it to whatever cells are available
pub const SCOPE_WIDTH: f64 = 1024.0;
pub const SCOPE_HEIGHT: f64 = 640.0;
const GRID_COLUMNS: usize = 16;
const GRID_ROWS: usize = 10;

/// Byte buffer refreshed from the analyser once per frame
pub struct ScopeState {
    pub data: Vec<u8>,
}

impl ScopeState {
    /// Sized to the analyser's bin count
    pub fn for_analyser(analyser: &SharedAnalyser) -> Self {
        let len = analyser
            .lock()
            .map(|a| a.frequency_bin_count())
            .unwrap_or(FREQUENCY_BIN_COUNT);
        Self {
            data: vec![128; len],
        }
    }

    /// Copy the latest time-domain bytes. A contended analyser keeps last frame's data.
    pub fn sample(&mut self, analyser: &SharedAnalyser) {
        if let Ok(analyser) = analyser.try_lock() {
            analyser.byte_time_domain_data(&mut self.data);
        }
    }

    /// Forget the in-progress trace, e.g. after a resize
    pub fn reset(&mut self) {
        self.data.fill(128);
    }
}

/// Polyline vertices in surface coordinates (origin top-left, y down).
///
/// Point i sits at `i * width / n`, with height `data[i] / 128 * height / 2`;
/// the line closes at the right edge on the centre line.
pub fn trace_points(data: &[u8], width: f64, height: f64) -> Vec<(f64, f64)> {
    let n = data.len().max(1) as f64;
    let slice = width / n;
    let mut points: Vec<(f64, f64)> = data
        .iter()
        .enumerate()
        .map(|(i, &b)| (i as f64 * slice, (b as f64 / 128.0) * height / 2.0))
        .collect();
    points.push((width, height / 2.0));
    points
}

/// Background grid segments as (x1, y1, x2, y2)
pub fn grid_lines(width: f64, height: f64, columns: usize, rows: usize) -> Vec<(f64, f64, f64, f64)> {
    let mut lines = Vec::with_capacity(columns + rows + 2);
    for c in 0..=columns {
        let x = width * c as f64 / columns.max(1) as f64;
        lines.push((x, 0.0, x, height));
    }
    for r in 0..=rows {
        let y = height * r as f64 / rows.max(1) as f64;
        lines.push((0.0, y, width, y));
    }
    lines
}

pub struct ScopeWidget<'a> {
    pub data: &'a [u8],
    pub title: String,
}

impl Widget for ScopeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let grid = grid_lines(SCOPE_WIDTH, SCOPE_HEIGHT, GRID_COLUMNS, GRID_ROWS);
        let trace = trace_points(self.data, SCOPE_WIDTH, SCOPE_HEIGHT);

        // Canvas y grows upwards
        let flip = |y: f64| SCOPE_HEIGHT - y;

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::DIM))
                    .title(self.title),
            )
            .background_color(theme::SCOPE_BG)
            .marker(Marker::Braille)
            .x_bounds([0.0, SCOPE_WIDTH])
            .y_bounds([0.0, SCOPE_HEIGHT])
            .paint(|ctx| {
                for &(x1, y1, x2, y2) in &grid {
                    ctx.draw(&Line::new(x1, flip(y1), x2, flip(y2), theme::SCOPE_GRID));
                }
                ctx.layer();
                for pair in trace.windows(2) {
                    let (x1, y1) = pair[0];
                    let (x2, y2) = pair[1];
                    ctx.draw(&Line::new(x1, flip(y1), x2, flip(y2), theme::SCOPE_TRACE));
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::analyser::Analyser;

    #[test]
    fn silence_is_a_flat_centre_line() {
        let data = vec![128u8; 8];
        let points = trace_points(&data, 800.0, 600.0);
        assert_eq!(points.len(), 9);
        assert!(points.iter().all(|&(_, y)| y == 300.0));
        assert_eq!(points[1].0, 100.0);
        assert_eq!(points.last(), Some(&(800.0, 300.0)));
    }

    #[test]
    fn byte_values_scale_to_height() {
        let points = trace_points(&[0, 64, 255], 300.0, 100.0);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[1], (100.0, 25.0));
        assert!((points[2].1 - 99.609375).abs() < 1e-9);
    }

    #[test]
    fn grid_spans_surface() {
        let lines = grid_lines(100.0, 50.0, 4, 2);
        assert_eq!(lines.len(), 5 + 3);
        assert_eq!(lines[4], (100.0, 0.0, 100.0, 50.0));
        assert_eq!(lines[7], (0.0, 50.0, 100.0, 50.0));
    }

    #[test]
    fn state_samples_and_resets() {
        let analyser = Analyser::shared();
        analyser.lock().unwrap().push(&[1.0; 4096]);
        let mut state = ScopeState::for_analyser(&analyser);
        assert_eq!(state.data.len(), 1024);
        state.sample(&analyser);
        assert!(state.data.iter().all(|&b| b == 255));
        state.reset();
        assert!(state.data.iter().all(|&b| b == 128));
    }

    #[test]
    fn renders_without_panicking_in_small_areas() {
        let data = vec![128u8; 16];
        for (w, h) in [(1, 1), (5, 3), (40, 12)] {
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            ScopeWidget {
                data: &data,
                title: "scope".into(),
            }
            .render(area, &mut buf);
        }
    }
}
