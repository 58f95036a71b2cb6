//! Pure tab-strip layout.
//!
//! `calculate` maps an ordered widget list plus style metrics to tab
//! rectangles, the overflow state and the overflow-button position. It has
//! no access to mutable state: identical inputs always produce identical
//! outputs, which is what the layout tests lean on.

use ratatui::prelude::Rect;

use crate::geometry::rect_contains;
use crate::style::DockStyle;
use crate::widget::{DockWidget, WidgetFeatures};

/// Which edge of the area carries the tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl TabPosition {
    pub fn is_horizontal(self) -> bool {
        matches!(self, TabPosition::Top | TabPosition::Bottom)
    }
}

/// Inputs for one layout pass. `first_visible` carries the value from the
/// previous pass so the visible window only slides when the current tab
/// would otherwise leave it.
#[derive(Debug, Clone, Copy)]
pub struct TabLayoutParams<'a> {
    pub area_rect: Rect,
    pub position: TabPosition,
    pub current: Option<usize>,
    pub first_visible: usize,
    /// Area-level rule: per-tab close buttons only exist when the area has
    /// more than one tab.
    pub show_close_buttons: bool,
    /// Number of area chrome buttons trailing the strip (close, pin, ...).
    pub chrome_buttons: u16,
    pub style: &'a DockStyle,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TabSlot {
    /// `None` when the tab did not fit; such tabs are not drawn and are
    /// reachable through the overflow button instead.
    pub rect: Option<Rect>,
    pub close_button: Option<Rect>,
    pub closable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TabLayout {
    pub strip: Rect,
    pub slots: Vec<TabSlot>,
    pub has_overflow: bool,
    pub first_visible: usize,
    pub overflow_button: Option<Rect>,
}

impl TabLayout {
    pub fn tab_at(&self, column: u16, row: u16) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.rect.is_some_and(|rect| rect_contains(rect, column, row)))
    }

    pub fn close_button_at(&self, column: u16, row: u16) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.close_button
                .is_some_and(|rect| rect_contains(rect, column, row))
        })
    }

    pub fn overflow_button_at(&self, column: u16, row: u16) -> bool {
        self.overflow_button
            .is_some_and(|rect| rect_contains(rect, column, row))
    }

    /// Indices of tabs that received no rectangle this pass.
    pub fn hidden_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.rect.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    /// Insertion index for a drop at the given point, derived from the
    /// centers of the laid-out tabs.
    pub fn insertion_index(&self, position: TabPosition, column: u16, row: u16) -> usize {
        let cursor = if position.is_horizontal() {
            column
        } else {
            row
        };
        let mut last_visible = None;
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(rect) = slot.rect else {
                continue;
            };
            let center = if position.is_horizontal() {
                rect.x.saturating_add(rect.width / 2)
            } else {
                rect.y.saturating_add(rect.height / 2)
            };
            if cursor < center {
                return index;
            }
            last_visible = Some(index);
        }
        last_visible.map(|index| index + 1).unwrap_or(0)
    }
}

/// Natural main-axis extent of one tab: title plus padding, plus the close
/// button when the tab is current, floored at the style minimum.
fn natural_extent(
    widget: &DockWidget,
    is_current: bool,
    show_close: bool,
    style: &DockStyle,
) -> u16 {
    let mut extent = widget
        .title_width(style.char_width)
        .saturating_add(style.tab_padding.saturating_mul(2));
    if is_current && show_close && widget.has_feature(WidgetFeatures::CLOSABLE) {
        extent = extent
            .saturating_add(style.button_size)
            .saturating_add(style.content_margin);
    }
    extent.max(style.min_tab_width)
}

pub fn calculate(params: &TabLayoutParams<'_>, widgets: &[&DockWidget]) -> TabLayout {
    let style = params.style;
    let area = params.area_rect;
    let horizontal = params.position.is_horizontal();

    let strip = strip_rect(area, params.position, style);
    let mut layout = TabLayout {
        strip,
        slots: widgets
            .iter()
            .map(|widget| TabSlot {
                rect: None,
                close_button: None,
                closable: params.show_close_buttons
                    && widget.has_feature(WidgetFeatures::CLOSABLE),
            })
            .collect(),
        has_overflow: false,
        first_visible: 0,
        overflow_button: None,
    };
    if widgets.is_empty() {
        return layout;
    }

    let extents: Vec<u16> = widgets
        .iter()
        .enumerate()
        .map(|(index, widget)| {
            let is_current = params.current == Some(index);
            natural_extent(
                widget,
                is_current,
                params.show_close_buttons,
                style,
            )
        })
        .collect();

    let strip_extent = if horizontal { area.width } else { area.height };
    let chrome_extent = params.chrome_buttons.saturating_mul(style.button_size);
    let mut available = strip_extent
        .saturating_sub(chrome_extent)
        .saturating_sub(style.strip_inset_main);

    let total: u32 = extents.iter().map(|extent| *extent as u32).sum();
    let overflow_cutoff = available
        .saturating_sub(style.overflow_button_size)
        .saturating_sub(style.tab_spacing);
    let mut first = params.first_visible.min(widgets.len() - 1);
    if total > overflow_cutoff as u32 {
        layout.has_overflow = true;
        available = available
            .saturating_sub(style.overflow_button_size)
            .saturating_sub(style.tab_spacing);

        if let Some(current) = params.current {
            // Count the tabs that fit starting from the previous window.
            let mut visible_extent = 0u16;
            let mut visible_count = 0usize;
            for extent in extents.iter().skip(first) {
                if visible_extent.saturating_add(*extent) > available {
                    break;
                }
                visible_extent = visible_extent.saturating_add(*extent);
                visible_count += 1;
            }
            if current < first {
                first = current;
            } else if current >= first + visible_count {
                first = (current + 1).saturating_sub(visible_count.max(1));
            }
        }
    } else {
        first = 0;
    }
    layout.first_visible = first;

    // Cross-axis placement of the tab row.
    let (tab_cross, tab_breadth) = cross_placement(area, params.position, style);

    let mut cursor = style.strip_inset_main;
    let mut last_end = style.strip_inset_main;
    for index in first..widgets.len() {
        let extent = extents[index];
        if cursor.saturating_add(extent) > available {
            break;
        }
        let rect = if horizontal {
            Rect {
                x: area.x.saturating_add(cursor),
                y: tab_cross,
                width: extent,
                height: tab_breadth,
            }
        } else {
            Rect {
                x: tab_cross,
                y: area.y.saturating_add(cursor),
                width: tab_breadth,
                height: extent,
            }
        };
        layout.slots[index].rect = Some(rect);
        if layout.slots[index].closable {
            layout.slots[index].close_button = Some(close_button_rect(rect, horizontal, style));
        }
        last_end = cursor.saturating_add(extent);
        cursor = last_end.saturating_add(style.tab_spacing);
    }

    if layout.has_overflow {
        let max_end = strip_extent
            .saturating_sub(chrome_extent)
            .saturating_sub(style.tab_spacing);
        let mut pos = last_end.saturating_add(style.tab_spacing);
        if pos.saturating_add(style.overflow_button_size) > max_end {
            pos = max_end.saturating_sub(style.overflow_button_size);
        }
        layout.overflow_button = Some(if horizontal {
            Rect {
                x: area.x.saturating_add(pos),
                y: tab_cross,
                width: style.overflow_button_size,
                height: tab_breadth,
            }
        } else {
            Rect {
                x: tab_cross,
                y: area.y.saturating_add(pos),
                width: tab_breadth,
                height: style.overflow_button_size,
            }
        });
    }

    layout
}

/// The strip band used for "is the pointer over the tab strip" checks.
pub fn strip_rect(area: Rect, position: TabPosition, style: &DockStyle) -> Rect {
    let band = style
        .strip_inset_cross
        .saturating_add(if position.is_horizontal() {
            style.tab_height
        } else {
            style.vertical_tab_breadth
        });
    match position {
        TabPosition::Top => Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: band.min(area.height),
        },
        TabPosition::Bottom => {
            let band = band.min(area.height);
            Rect {
                x: area.x,
                y: area.y.saturating_add(area.height).saturating_sub(band),
                width: area.width,
                height: band,
            }
        }
        TabPosition::Left => Rect {
            x: area.x,
            y: area.y,
            width: band.min(area.width),
            height: area.height,
        },
        TabPosition::Right => {
            let band = band.min(area.width);
            Rect {
                x: area.x.saturating_add(area.width).saturating_sub(band),
                y: area.y,
                width: band,
                height: area.height,
            }
        }
    }
}

fn cross_placement(area: Rect, position: TabPosition, style: &DockStyle) -> (u16, u16) {
    match position {
        TabPosition::Top => (
            area.y.saturating_add(style.strip_inset_cross),
            style.tab_height,
        ),
        TabPosition::Bottom => (
            area.y
                .saturating_add(area.height)
                .saturating_sub(style.tab_height),
            style.tab_height,
        ),
        TabPosition::Left => (
            area.x.saturating_add(style.strip_inset_cross),
            style.vertical_tab_breadth,
        ),
        TabPosition::Right => (
            area.x
                .saturating_add(area.width)
                .saturating_sub(style.strip_inset_cross)
                .saturating_sub(style.vertical_tab_breadth),
            style.vertical_tab_breadth,
        ),
    }
}

fn close_button_rect(tab: Rect, horizontal: bool, style: &DockStyle) -> Rect {
    let size = style.button_size.min(tab.width).min(tab.height.max(1));
    if horizontal {
        Rect {
            x: tab
                .x
                .saturating_add(tab.width)
                .saturating_sub(size)
                .saturating_sub(style.content_margin),
            y: tab
                .y
                .saturating_add(tab.height.saturating_sub(size) / 2),
            width: size,
            height: size.min(tab.height),
        }
    } else {
        Rect {
            x: tab
                .x
                .saturating_add(tab.width.saturating_sub(size) / 2),
            y: tab
                .y
                .saturating_add(tab.height)
                .saturating_sub(size)
                .saturating_sub(style.content_margin),
            width: size.min(tab.width),
            height: size,
        }
    }
}
