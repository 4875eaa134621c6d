use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::ui::theme;

const LABEL_WIDTH: u16 = 14;
const VALUE_WIDTH: u16 = 10;

/// One control row: label, optional range bar, formatted value
pub struct SliderWidget<'a> {
    pub label: &'a str,
    pub value: String,
    /// Position in 0..=1; `None` for selects and toggles
    pub fraction: Option<f32>,
    pub selected: bool,
    /// Value is derived from another control and cannot be edited
    pub derived: bool,
}

impl Widget for SliderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < LABEL_WIDTH + VALUE_WIDTH || area.height < 1 {
            return;
        }

        let base = if self.selected {
            Style::default().bg(theme::SELECTED_BG)
        } else {
            Style::default()
        };
        let text_color = if self.derived { theme::DIM } else { theme::FG };
        let accent = if self.selected { theme::ACCENT } else { text_color };

        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", base);
        }

        let marker = if self.selected { "▸" } else { " " };
        buf.set_string(area.x, area.y, marker, base.fg(theme::ACCENT));
        buf.set_string(area.x + 1, area.y, self.label, base.fg(accent));

        let bar_x = area.x + LABEL_WIDTH;
        let bar_width = area.width.saturating_sub(LABEL_WIDTH + VALUE_WIDTH + 1);
        if let Some(fraction) = self.fraction {
            let filled = (fraction.clamp(0.0, 1.0) * bar_width as f32).round() as u16;
            for i in 0..bar_width {
                let (symbol, color) = if i < filled {
                    ("━", accent)
                } else {
                    ("─", theme::DIM)
                };
                buf.set_string(bar_x + i, area.y, symbol, base.fg(color));
            }
        }

        let value_x = area.x + area.width - VALUE_WIDTH;
        let mut value_style = base.fg(text_color);
        if self.selected && !self.derived {
            value_style = value_style.add_modifier(Modifier::BOLD);
        }
        let value = format!("{:>width$}", self.value, width = VALUE_WIDTH as usize);
        buf.set_string(value_x, area.y, value, value_style);
    }
}
