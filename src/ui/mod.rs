pub mod layout;
pub mod theme;
pub mod widgets;

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{Control, Controller};
use crate::input;
use crate::ui::layout::ScreenLayout;
use crate::ui::widgets::key_state::KeyStateWidget;
use crate::ui::widgets::keyboard_hint::KeyboardHintWidget;
use crate::ui::widgets::level_meter::LevelMeterWidget;
use crate::ui::widgets::scope::{ScopeState, ScopeWidget};
use crate::ui::widgets::slider::SliderWidget;

/// Draw one full frame
pub fn draw(frame: &mut Frame, controller: &Controller, scope: &ScopeState) {
    let layout = ScreenLayout::new(frame.area());

    frame.render_widget(
        KeyStateWidget {
            keytone: controller.keytone(),
            active_voices: controller.active_voices,
            sending: controller.is_sending(),
        },
        layout.header,
    );

    let (left, right) = controller.master_level;
    let meters = layout.meters;
    frame.render_widget(
        LevelMeterWidget { label: "L", level: left },
        Rect { height: 1, ..meters },
    );
    if meters.height > 1 {
        frame.render_widget(
            LevelMeterWidget { label: "R", level: right },
            Rect {
                y: meters.y + 1,
                height: 1,
                ..meters
            },
        );
    }

    draw_controls(frame, controller, layout.controls);

    let settings = controller.settings();
    frame.render_widget(
        ScopeWidget {
            data: &scope.data,
            title: format!(
                " dit {:.0} Hz {} · dah {:.0} Hz {} ",
                settings.dit.frequency, settings.dit.waveform, settings.dah.frequency, settings.dah.waveform
            ),
        },
        layout.scope,
    );

    let status = match (&controller.text_entry, &controller.status) {
        (Some(text), _) => Paragraph::new(format!(" send> {}▏", text))
            .style(Style::default().fg(theme::ACCENT)),
        (None, Some(status)) => {
            Paragraph::new(format!(" {}", status)).style(Style::default().fg(theme::DIM))
        }
        (None, None) => Paragraph::new(""),
    };
    frame.render_widget(status, layout.status);

    let hints = input::key_hints(controller.text_entry.is_some());
    frame.render_widget(KeyboardHintWidget { hints }, layout.footer);
}

fn draw_controls(frame: &mut Frame, controller: &Controller, area: Rect) {
    let settings = controller.settings();
    let selected = controller.selected_control();
    for (i, control) in Control::ALL.iter().enumerate() {
        let y = area.y + i as u16;
        if y >= area.y + area.height {
            break;
        }
        let slider = SliderWidget {
            label: control.label(),
            value: control.value_label(settings),
            fraction: control.fraction(settings),
            selected: *control == selected,
            derived: control.is_derived(settings),
        };
        frame.render_widget(
            slider,
            Rect {
                y,
                height: 1,
                ..area
            },
        );
    }
}
