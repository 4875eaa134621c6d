use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::ui::theme;

pub struct KeyboardHintWidget {
    pub hints: Vec<(&'static str, &'static str)>,
}

impl Widget for KeyboardHintWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let spans: Vec<Span> = self
            .hints
            .iter()
            .flat_map(|&(key, desc)| {
                [
                    Span::styled(key, Style::default().fg(theme::ACCENT)),
                    Span::styled(":", Style::default().fg(theme::DIM)),
                    Span::styled(desc, Style::default().fg(theme::FG)),
                    Span::raw("  "),
                ]
            })
            .collect();
        buf.set_line(area.x + 1, area.y, &Line::from(spans), area.width.saturating_sub(1));
    }
}
