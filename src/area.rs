//! Tabbed dock areas.
//!
//! A `DockArea` owns an ordered list of widget ids plus the current-tab
//! index and caches the last computed tab layout for hit testing between
//! frames. Areas are created by the manager when a widget is docked into a
//! fresh location and destroyed as soon as their last widget leaves.

use ratatui::prelude::Rect;

use crate::style::DockStyle;
use crate::tabs::{self, TabLayout, TabLayoutParams, TabPosition};
use crate::widget::{DockWidget, WidgetId};

/// Stable handle for a dock area. Allocated monotonically, never reused:
/// after the area is destroyed the handle fails lookup instead of pointing
/// at whatever took its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AreaId(pub(crate) u64);

#[derive(Debug, Clone)]
pub struct DockArea {
    widgets: Vec<WidgetId>,
    /// `None` iff `widgets` is empty, otherwise `0 <= current < len`.
    current: Option<usize>,
    tab_position: TabPosition,
    rect: Rect,
    tab_layout: TabLayout,
    first_visible: usize,
}

impl DockArea {
    pub fn new(tab_position: TabPosition) -> Self {
        Self {
            widgets: Vec::new(),
            current: None,
            tab_position,
            rect: Rect::default(),
            tab_layout: TabLayout::default(),
            first_visible: 0,
        }
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn widget_ids(&self) -> &[WidgetId] {
        &self.widgets
    }

    pub fn index_of(&self, widget: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|id| *id == widget)
    }

    pub fn widget_at(&self, index: usize) -> Option<WidgetId> {
        self.widgets.get(index).copied()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_widget(&self) -> Option<WidgetId> {
        self.current.and_then(|index| self.widget_at(index))
    }

    pub fn tab_position(&self) -> TabPosition {
        self.tab_position
    }

    pub fn set_tab_position(&mut self, position: TabPosition) {
        self.tab_position = position;
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn tab_layout(&self) -> &TabLayout {
        &self.tab_layout
    }

    /// Per-tab close buttons exist only when there is something else to
    /// switch to; single-tab areas rely on the area-level close action.
    pub fn show_tab_close_buttons(&self) -> bool {
        self.widgets.len() > 1
    }

    /// Append a widget and make it current.
    pub fn push_widget(&mut self, widget: WidgetId) {
        self.widgets.push(widget);
        self.current = Some(self.widgets.len() - 1);
    }

    /// Insert at `index` (clamped) and make the widget current.
    pub fn insert_widget(&mut self, index: usize, widget: WidgetId) {
        let index = index.min(self.widgets.len());
        self.widgets.insert(index, widget);
        self.current = Some(index);
    }

    /// Remove a widget, repairing the current index: the same position is
    /// kept where possible, clamped to the shrunk list.
    pub fn remove_widget(&mut self, widget: WidgetId) -> Option<usize> {
        let index = self.index_of(widget)?;
        self.widgets.remove(index);
        self.current = if self.widgets.is_empty() {
            None
        } else {
            let current = self.current.unwrap_or(0);
            let repaired = if index < current { current - 1 } else { current };
            Some(repaired.min(self.widgets.len() - 1))
        };
        Some(index)
    }

    /// Move a widget to `to`, interpreting `to` as an index in the list
    /// *before* removal (the drop-cursor convention). Returns false for a
    /// no-op move.
    pub fn move_widget(&mut self, widget: WidgetId, to: usize) -> bool {
        let Some(from) = self.index_of(widget) else {
            return false;
        };
        let to = to.min(self.widgets.len());
        // dropping a tab back onto itself or the gap right after it
        if to == from || to == from + 1 {
            self.current = Some(from);
            return false;
        }
        let id = self.widgets.remove(from);
        let dest = if to > from { to - 1 } else { to };
        self.widgets.insert(dest, id);
        self.current = Some(dest);
        true
    }

    pub fn set_current_index(&mut self, index: usize) -> bool {
        if index < self.widgets.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    pub fn set_current_widget(&mut self, widget: WidgetId) -> bool {
        match self.index_of(widget) {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }

    /// Screen band occupied by the tab strip.
    pub fn strip_rect(&self, style: &DockStyle) -> Rect {
        tabs::strip_rect(self.rect, self.tab_position, style)
    }

    /// Recompute the cached tab layout for the given screen rect. Must run
    /// after every structural change before the next paint.
    pub fn relayout(&mut self, rect: Rect, style: &DockStyle, widgets: &[&DockWidget]) {
        debug_assert_eq!(widgets.len(), self.widgets.len());
        self.rect = rect;
        let params = TabLayoutParams {
            area_rect: rect,
            position: self.tab_position,
            current: self.current,
            first_visible: self.first_visible,
            show_close_buttons: self.show_tab_close_buttons(),
            chrome_buttons: 1,
            style,
        };
        self.tab_layout = tabs::calculate(&params, widgets);
        self.first_visible = self.tab_layout.first_visible;
    }

    /// Widgets hidden by tab overflow, for the host's overflow menu.
    pub fn overflow_widgets(&self) -> Vec<WidgetId> {
        self.tab_layout
            .hidden_indices()
            .into_iter()
            .filter_map(|index| self.widget_at(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_with(n: u64) -> DockArea {
        let mut area = DockArea::new(TabPosition::Top);
        for i in 0..n {
            area.push_widget(WidgetId(i));
        }
        area
    }

    #[test]
    fn push_makes_new_widget_current() {
        let area = area_with(3);
        assert_eq!(area.current_index(), Some(2));
        assert_eq!(area.current_widget(), Some(WidgetId(2)));
    }

    #[test]
    fn current_is_none_iff_empty() {
        let mut area = area_with(1);
        assert_eq!(area.current_index(), Some(0));
        area.remove_widget(WidgetId(0));
        assert!(area.is_empty());
        assert_eq!(area.current_index(), None);
    }

    #[test]
    fn remove_before_current_shifts_index() {
        let mut area = area_with(3);
        area.set_current_index(2);
        area.remove_widget(WidgetId(0));
        assert_eq!(area.current_widget(), Some(WidgetId(2)));
    }

    #[test]
    fn remove_current_keeps_position_clamped() {
        let mut area = area_with(3);
        area.set_current_index(2);
        area.remove_widget(WidgetId(2));
        // same position no longer exists; clamp to the new last tab
        assert_eq!(area.current_index(), Some(1));
        assert_eq!(area.current_widget(), Some(WidgetId(1)));
    }

    #[test]
    fn move_widget_is_noop_for_same_slot() {
        let mut area = area_with(3);
        assert!(!area.move_widget(WidgetId(1), 1));
        assert!(!area.move_widget(WidgetId(1), 2));
        assert_eq!(area.widget_ids(), &[WidgetId(0), WidgetId(1), WidgetId(2)]);
    }

    #[test]
    fn move_widget_reorders_and_follows() {
        let mut area = area_with(3);
        assert!(area.move_widget(WidgetId(0), 3));
        assert_eq!(area.widget_ids(), &[WidgetId(1), WidgetId(2), WidgetId(0)]);
        assert_eq!(area.current_widget(), Some(WidgetId(0)));
        assert!(area.move_widget(WidgetId(2), 0));
        assert_eq!(area.widget_ids(), &[WidgetId(2), WidgetId(1), WidgetId(0)]);
        assert_eq!(area.current_widget(), Some(WidgetId(2)));
    }

    #[test]
    fn close_button_rule_follows_widget_count() {
        let mut area = area_with(1);
        assert!(!area.show_tab_close_buttons());
        area.push_widget(WidgetId(9));
        assert!(area.show_tab_close_buttons());
        area.remove_widget(WidgetId(9));
        assert!(!area.show_tab_close_buttons());
    }

    #[test]
    fn relayout_caches_tab_rects() {
        let style = DockStyle::compact();
        let mut area = DockArea::new(TabPosition::Top);
        area.push_widget(WidgetId(0));
        area.push_widget(WidgetId(1));
        let w0 = DockWidget::new("one");
        let w1 = DockWidget::new("two");
        let rect = Rect {
            x: 0,
            y: 0,
            width: 40,
            height: 10,
        };
        area.relayout(rect, &style, &[&w0, &w1]);
        assert_eq!(area.rect(), rect);
        let hit = area
            .tab_layout()
            .tab_at(style.strip_inset_main + 1, rect.y);
        assert_eq!(hit, Some(0));
    }
}
