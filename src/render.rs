//! Cell-buffer rendering of the dock chrome: tab strips, split handles,
//! floating containers, the drag preview and the drop overlays.
//!
//! Content inside each area is the host's business; this module only draws
//! the structural affordances the engine owns.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::geometry::{FloatRect, rect_contains};
use crate::manager::DockManager;
use crate::overlay::{DockOverlay, DropZone};
use crate::style::DockStyle;
use crate::theme;

/// Draw everything the engine owns, floating chrome above docked chrome,
/// overlays on top.
pub fn render(frame: &mut Frame, manager: &DockManager) {
    let bounds = manager.bounds();
    let buffer = frame.buffer_mut();
    for id in manager.area_ids() {
        let Some(area) = manager.area(id) else {
            continue;
        };
        render_tab_strip(buffer, bounds, area, manager);
    }
    render_split_handles(buffer, bounds, manager);
    for id in manager.floating_ids_back_to_front().to_vec() {
        if let Some(container) = manager.floating_container(id) {
            let title = container
                .current_widget()
                .and_then(|w| manager.widget(w))
                .map(|w| w.title().to_string())
                .unwrap_or_default();
            render_floating_frame(buffer, bounds, container.rect(), &title);
        }
    }
    if let Some((preview, widget)) = manager.drag_preview() {
        let title = manager
            .widget(widget)
            .map(|w| w.title().to_string())
            .unwrap_or_default();
        render_drag_preview(buffer, bounds, preview, &title);
    }
    render_overlay(buffer, bounds, manager.area_overlay(), manager.style());
    render_overlay(buffer, bounds, manager.container_overlay(), manager.style());
}

fn set_string_clipped(buffer: &mut Buffer, bounds: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y < bounds.y || y >= bounds.y.saturating_add(bounds.height) {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let mut cursor = x;
    for ch in text.chars() {
        if cursor >= max_x {
            break;
        }
        if cursor >= bounds.x
            && let Some(cell) = buffer.cell_mut((cursor, y))
        {
            cell.set_symbol(&ch.to_string());
            cell.set_style(style);
        }
        cursor = cursor.saturating_add(1);
    }
}

fn fill_rect(buffer: &mut Buffer, bounds: Rect, rect: Rect, symbol: &str, style: Style) {
    let clip = rect.intersection(bounds).intersection(buffer.area);
    for y in clip.y..clip.y.saturating_add(clip.height) {
        for x in clip.x..clip.x.saturating_add(clip.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        }
    }
}

fn render_tab_strip(
    buffer: &mut Buffer,
    bounds: Rect,
    area: &crate::area::DockArea,
    manager: &DockManager,
) {
    let strip = area.strip_rect(manager.style());
    fill_rect(
        buffer,
        bounds,
        strip,
        " ",
        Style::default().bg(theme::strip_bg()),
    );
    let layout = area.tab_layout();
    let current = area.current_index();
    for (index, slot) in layout.slots.iter().enumerate() {
        let Some(rect) = slot.rect else {
            continue;
        };
        let is_current = current == Some(index);
        let style = if is_current {
            Style::default()
                .bg(theme::tab_current_bg())
                .fg(theme::tab_current_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::strip_bg())
                .fg(theme::strip_fg())
        };
        fill_rect(buffer, bounds, rect, " ", style);
        let title = area
            .widget_at(index)
            .and_then(|id| manager.widget(id))
            .map(|w| w.title().to_string())
            .unwrap_or_default();
        let text_width = rect.width.saturating_sub(if slot.close_button.is_some() {
            2
        } else {
            0
        }) as usize;
        let title: String = title.chars().take(text_width).collect();
        set_string_clipped(buffer, bounds, rect.x, rect.y, &title, style);
        if let Some(close) = slot.close_button {
            set_string_clipped(
                buffer,
                bounds,
                close.x,
                close.y,
                "×",
                style.fg(theme::close_button_fg()),
            );
        }
    }
    if let Some(button) = layout.overflow_button {
        set_string_clipped(
            buffer,
            bounds,
            button.x,
            button.y,
            "»",
            Style::default()
                .bg(theme::strip_bg())
                .fg(theme::overflow_fg())
                .add_modifier(Modifier::BOLD),
        );
    }
}

fn render_split_handles(buffer: &mut Buffer, bounds: Rect, manager: &DockManager) {
    let style = Style::default()
        .fg(theme::handle_fg())
        .add_modifier(Modifier::DIM);
    for handle in manager.split_handles() {
        fill_rect(buffer, bounds, handle.rect, "·", style);
    }
}

fn render_floating_frame(buffer: &mut Buffer, bounds: Rect, rect: FloatRect, title: &str) {
    let visible = rect.to_rect().intersection(bounds);
    if visible.width == 0 || visible.height == 0 {
        return;
    }
    fill_rect(buffer, bounds, visible, " ", Style::default());
    let border = Style::default().fg(theme::floating_border());
    outline(buffer, bounds, rect, border, ["┌", "┐", "└", "┘", "─", "│"]);
    // header row doubles as the drag handle
    let header_style = Style::default()
        .bg(theme::floating_header_bg())
        .fg(theme::floating_header_fg())
        .add_modifier(Modifier::BOLD);
    if rect.y >= bounds.y as i32 && rect.y < (bounds.y + bounds.height) as i32 {
        let y = rect.y as u16;
        let inner_x = (rect.x + 1).max(bounds.x as i32) as u16;
        let inner_w = rect.width.saturating_sub(2);
        fill_rect(
            buffer,
            bounds,
            Rect {
                x: inner_x,
                y,
                width: inner_w,
                height: 1,
            },
            " ",
            header_style,
        );
        let title: String = title.chars().take(inner_w as usize).collect();
        set_string_clipped(buffer, bounds, inner_x, y, &title, header_style);
    }
}

fn render_drag_preview(buffer: &mut Buffer, bounds: Rect, rect: FloatRect, title: &str) {
    let style = Style::default()
        .fg(theme::drag_preview_fg())
        .add_modifier(Modifier::BOLD);
    outline(buffer, bounds, rect, style, ["+", "+", "+", "+", "╌", "┊"]);
    if rect.y >= bounds.y as i32 && rect.y < (bounds.y + bounds.height) as i32 && rect.width > 2 {
        let x = (rect.x + 1).max(bounds.x as i32) as u16;
        let title: String = title
            .chars()
            .take(rect.width.saturating_sub(2) as usize)
            .collect();
        set_string_clipped(buffer, bounds, x, rect.y as u16, &title, style);
    }
}

fn outline(
    buffer: &mut Buffer,
    bounds: Rect,
    rect: FloatRect,
    style: Style,
    symbols: [&str; 6],
) {
    let [tl, tr, bl, br, horizontal, vertical] = symbols;
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width as i32 - 1;
    let bottom = rect.y + rect.height as i32 - 1;
    let in_bounds = |x: i32, y: i32| {
        x >= bounds.x as i32
            && x < (bounds.x + bounds.width) as i32
            && y >= bounds.y as i32
            && y < (bounds.y + bounds.height) as i32
    };
    let mut put = |x: i32, y: i32, symbol: &str| {
        if in_bounds(x, y)
            && let Some(cell) = buffer.cell_mut((x as u16, y as u16))
        {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    };
    for x in left..=right {
        let symbol = if x == left {
            tl
        } else if x == right {
            tr
        } else {
            horizontal
        };
        put(x, top, symbol);
        let symbol = if x == left {
            bl
        } else if x == right {
            br
        } else {
            horizontal
        };
        put(x, bottom, symbol);
    }
    for y in (top + 1)..bottom {
        put(left, y, vertical);
        put(right, y, vertical);
    }
}

fn render_overlay(buffer: &mut Buffer, bounds: Rect, overlay: &DockOverlay, style: &DockStyle) {
    if !overlay.is_shown() {
        return;
    }
    // shade the landing rect for the highlighted zone first so indicators
    // stay legible on top
    let hovered = overlay.hovered_zone();
    if hovered != DropZone::Invalid
        && let Some(preview) = overlay.preview_rect(hovered)
    {
        fill_rect(
            buffer,
            bounds,
            preview,
            "░",
            Style::default().fg(theme::overlay_preview_fg()),
        );
    }
    for zone in DropZone::ALL {
        let Some(rect) = overlay.zone_rect(style, zone) else {
            continue;
        };
        let glyph = match zone {
            DropZone::Top => "▲",
            DropZone::Bottom => "▼",
            DropZone::Left => "◀",
            DropZone::Right => "▶",
            DropZone::Center | DropZone::Invalid => "◻",
        };
        let zone_style = if zone == hovered {
            Style::default()
                .bg(theme::overlay_zone_highlight_bg())
                .fg(theme::overlay_zone_highlight_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::overlay_zone_fg())
        };
        fill_rect(buffer, bounds, rect, glyph, zone_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::DockStyle;
    use crate::tree::InsertPosition;
    use crate::widget::DockWidget;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn row_string(buffer: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    #[test]
    fn tab_strip_shows_titles_and_overflow_marker() {
        let mut manager = DockManager::new(DockStyle::compact());
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 24,
            height: 10,
        };
        manager.layout(bounds);
        let (_, area) =
            manager.add_widget_at_edge(DockWidget::new("alpha"), InsertPosition::Left);
        for title in ["bravo", "charlie", "delta"] {
            manager
                .add_widget_to_area(DockWidget::new(title), area)
                .unwrap();
        }

        let backend = TestBackend::new(bounds.width, bounds.height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, &manager))
            .unwrap();
        let row = row_string(terminal.backend().buffer(), 0, bounds.width);
        assert!(
            manager.area(area).unwrap().tab_layout().has_overflow,
            "four tabs cannot fit 24 cells"
        );
        assert!(row.contains('»'), "overflow marker rendered: {row:?}");
    }

    #[test]
    fn overlay_indicators_render_on_top() {
        let mut manager = DockManager::new(DockStyle::compact());
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 40,
            height: 16,
        };
        manager.layout(bounds);
        manager.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        manager.container_overlay.show(bounds);

        let backend = TestBackend::new(bounds.width, bounds.height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, &manager))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut found = false;
        for y in 0..bounds.height {
            let row = row_string(buffer, y, bounds.width);
            if row.contains('▲') || row.contains('▶') {
                found = true;
            }
        }
        assert!(found, "container overlay indicators visible");
    }
}
