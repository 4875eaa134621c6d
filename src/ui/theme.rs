use ratatui::style::Color;

pub const BG: Color = Color::Rgb(20, 20, 25);
pub const FG: Color = Color::Rgb(200, 200, 210);
pub const DIM: Color = Color::Rgb(80, 80, 90);
pub const ACCENT: Color = Color::Rgb(0, 200, 150);
pub const KEY_ON: Color = Color::Rgb(50, 220, 100);
pub const KEY_QUEUED: Color = Color::Rgb(220, 200, 50);
pub const SELECTED_BG: Color = Color::Rgb(40, 45, 55);
pub const VU_GREEN: Color = Color::Rgb(50, 220, 80);
pub const VU_YELLOW: Color = Color::Rgb(220, 220, 50);
pub const VU_RED: Color = Color::Rgb(220, 50, 50);
/// Scope surface, matching the light-grey page canvas
pub const SCOPE_BG: Color = Color::Rgb(200, 200, 200);
pub const SCOPE_GRID: Color = Color::Rgb(160, 160, 165);
pub const SCOPE_TRACE: Color = Color::Rgb(0, 0, 0);
