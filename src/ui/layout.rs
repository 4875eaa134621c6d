use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout regions
pub struct ScreenLayout {
    pub header: Rect,
    pub meters: Rect,
    pub controls: Rect,
    pub scope: Rect,
    pub status: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Key state + voices
                Constraint::Length(2), // L/R output meters
                Constraint::Min(8),    // Controls | scope
                Constraint::Length(1), // Text entry / status
                Constraint::Length(1), // Key hints
            ])
            .split(area);

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(20)])
            .split(rows[2]);

        Self {
            header: rows[0],
            meters: rows[1],
            controls: main[0],
            scope: main[1],
            status: rows[3],
            footer: rows[4],
        }
    }
}
