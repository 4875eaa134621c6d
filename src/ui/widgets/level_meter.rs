use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::ui::theme;

/// Horizontal RMS bar for one output channel
pub struct LevelMeterWidget {
    pub label: &'static str,
    pub level: f32,
}

impl Widget for LevelMeterWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 1 {
            return;
        }

        let label_width = 3;
        let bar_start = area.x + label_width;
        let bar_width = area.width.saturating_sub(label_width + 1);

        buf.set_string(area.x, area.y, self.label, Style::default().fg(theme::FG));

        for x in bar_start..bar_start + bar_width {
            buf.set_string(x, area.y, "░", Style::default().fg(theme::DIM));
        }

        let level_width = (self.level.clamp(0.0, 1.0) * bar_width as f32) as u16;
        for x in bar_start..bar_start + level_width.min(bar_width) {
            let frac = (x - bar_start) as f32 / bar_width as f32;
            let color = if frac < 0.6 {
                theme::VU_GREEN
            } else if frac < 0.85 {
                theme::VU_YELLOW
            } else {
                theme::VU_RED
            };
            buf.set_string(x, area.y, "█", Style::default().fg(color));
        }
    }
}
