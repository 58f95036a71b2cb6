use ratatui::style::Color;

// Centralized chrome colors. Kept as small helpers so hosts can fork the
// palette in one place.

pub fn strip_bg() -> Color {
    Color::DarkGray
}
pub fn strip_fg() -> Color {
    Color::Gray
}
pub fn tab_current_bg() -> Color {
    Color::Gray
}
pub fn tab_current_fg() -> Color {
    Color::Black
}
pub fn close_button_fg() -> Color {
    Color::LightRed
}
pub fn overflow_fg() -> Color {
    Color::Yellow
}

// Split handles
pub fn handle_fg() -> Color {
    Color::DarkGray
}

// Floating chrome
pub fn floating_header_bg() -> Color {
    Color::Blue
}
pub fn floating_header_fg() -> Color {
    Color::White
}
pub fn floating_border() -> Color {
    Color::DarkGray
}

// Drag affordances
pub fn overlay_zone_fg() -> Color {
    Color::Cyan
}
pub fn overlay_zone_highlight_bg() -> Color {
    Color::Cyan
}
pub fn overlay_zone_highlight_fg() -> Color {
    Color::Black
}
pub fn overlay_preview_fg() -> Color {
    Color::LightCyan
}
pub fn drag_preview_fg() -> Color {
    Color::LightMagenta
}
