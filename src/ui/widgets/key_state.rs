use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::keyer::KeyTone;
use crate::ui::theme;

/// Header strip: keytone state, live voice count, text-send activity
pub struct KeyStateWidget {
    pub keytone: KeyTone,
    pub active_voices: usize,
    pub sending: bool,
}

impl Widget for KeyStateWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < 1 {
            return;
        }

        let mut x = area.x + 1;
        buf.set_string(x, area.y, "DITDAH", Style::default().fg(theme::ACCENT));
        x += 8;

        buf.set_string(x, area.y, "key", Style::default().fg(theme::DIM));
        x += 4;
        let color = match self.keytone {
            KeyTone::Off => theme::DIM,
            KeyTone::On => theme::KEY_ON,
            KeyTone::Queued { .. } => theme::KEY_QUEUED,
        };
        let label = format!(" {} ", self.keytone.label());
        buf.set_string(x, area.y, &label, Style::default().fg(theme::BG).bg(color));
        x += label.len() as u16 + 2;

        let voices = format!("voices {}", self.active_voices);
        buf.set_string(x, area.y, &voices, Style::default().fg(theme::FG));
        x += voices.len() as u16 + 2;

        if self.sending && x + 7 < area.x + area.width {
            buf.set_string(x, area.y, "SENDING", Style::default().fg(theme::KEY_QUEUED));
        }
    }
}
