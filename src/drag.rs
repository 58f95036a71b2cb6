//! The tab drag session.
//!
//! One session exists per manager. A press on a tab arms it (`Pressed`);
//! real pointer travel promotes it to `Dragging`, which owns the floating
//! preview rectangle and the last resolved drop target. Release resolves
//! the drop in priority order and every exit path, including pointer
//! capture loss, tears the preview and overlays down unconditionally.
//!
//! The widget is never removed from its source before release: the only
//! removal happens inside the drop mutation itself, and any failure there
//! walks the restoration ladder (original index, append, floating) so a
//! widget can never end up unowned.

use crossterm::event::{Event, MouseEvent, MouseEventKind};
use std::time::Instant;

use crate::area::AreaId;
use crate::geometry::{FloatRect, inflate, rect_contains};
use crate::manager::{DockEvent, DockManager, DropTarget, edge_for_zone};
use crate::overlay::{DropZone, ZoneMask};
use crate::tree::InsertPosition;
use crate::widget::{WidgetFeatures, WidgetId};

/// The session value object. Constructed fresh per drag; illegal field
/// combinations (a preview without a source, a target without a drag) are
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    /// Armed by a press on a movable, unlocked tab. No visual change yet.
    Pressed {
        source: AreaId,
        index: usize,
        widget: WidgetId,
        origin: (u16, u16),
    },
    /// Pointer travel exceeded the threshold inside the tolerance box.
    Dragging {
        source: AreaId,
        widget: WidgetId,
        origin_index: usize,
        preview: FloatRect,
        target: DropTarget,
        merge_hint: bool,
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

impl DockManager {
    /// Single entry point for pointer and focus events. Returns true when
    /// the dock layer consumed the event.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if matches!(event, Event::FocusLost) {
            return self.cancel_all_drags();
        }
        if self.handle_tab_drag_event(event) {
            return true;
        }
        if self.handle_float_drag_event(event) {
            return true;
        }
        self.handle_split_drag_event(event)
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Preview rectangle and dragged widget while a drag is live, for the
    /// renderer.
    pub fn drag_preview(&self) -> Option<(FloatRect, WidgetId)> {
        match self.drag {
            DragState::Dragging {
                preview, widget, ..
            } => Some((preview, widget)),
            _ => None,
        }
    }

    pub(crate) fn handle_tab_drag_event(&mut self, event: &Event) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        match mouse.kind {
            MouseEventKind::Down(_) => self.on_tab_press(mouse),
            MouseEventKind::Drag(_) => self.on_tab_drag_move(mouse.column, mouse.row),
            MouseEventKind::Up(_) => self.on_tab_release(mouse.column, mouse.row),
            _ => false,
        }
    }

    fn on_tab_press(&mut self, mouse: &MouseEvent) -> bool {
        let (column, row) = (mouse.column, mouse.row);
        // floating containers sit above the docked tree
        if self.floating_at(column, row).is_some() {
            return false;
        }
        let Some(area_id) = self.find_area_at(column, row) else {
            return false;
        };
        let Some(area) = self.areas.get(&area_id) else {
            return false;
        };
        let layout = area.tab_layout();

        if let Some(index) = layout.close_button_at(column, row) {
            if let Some(widget) = area.widget_at(index) {
                let _ = self.close_widget(widget);
            }
            return true;
        }
        if layout.overflow_button_at(column, row) {
            self.events.push(DockEvent::OverflowRequested(area_id));
            return true;
        }
        let Some(index) = layout.tab_at(column, row) else {
            return false;
        };
        let Some(widget) = area.widget_at(index) else {
            return false;
        };

        // double press floats the tab
        let now = Instant::now();
        if let Some((last_area, last_index, at)) = self.last_tab_press
            && last_area == area_id
            && last_index == index
            && now.duration_since(at).as_millis() as u64 <= self.style.double_click_ms
        {
            self.last_tab_press = None;
            let floatable = self
                .widgets
                .get(&widget)
                .is_some_and(|w| w.has_feature(WidgetFeatures::FLOATABLE));
            if floatable {
                let rect = self.default_float_rect((column, row));
                if self.detach_widget(widget).is_some() {
                    self.float_widget_at(widget, rect);
                    self.refresh_layout();
                }
                return true;
            }
        }
        self.last_tab_press = Some((area_id, index, now));

        if let Some(area) = self.areas.get_mut(&area_id)
            && area.set_current_index(index)
        {
            self.events.push(DockEvent::TabLayoutChanged(area_id));
            self.refresh_layout();
        }

        let draggable = self.widgets.get(&widget).is_some_and(|w| {
            w.has_feature(WidgetFeatures::MOVABLE) && !w.is_position_locked()
        });
        if draggable {
            self.drag = DragState::Pressed {
                source: area_id,
                index,
                widget,
                origin: (column, row),
            };
            tracing::trace!(area = ?area_id, index, "tab press armed drag");
        }
        true
    }

    fn on_tab_drag_move(&mut self, column: u16, row: u16) -> bool {
        match self.drag {
            DragState::Idle => false,
            DragState::Pressed {
                source,
                index,
                widget,
                origin,
            } => {
                let Some(tab_rect) = self
                    .areas
                    .get(&source)
                    .and_then(|area| area.tab_layout().slots.get(index))
                    .and_then(|slot| slot.rect)
                else {
                    // source or tab vanished under us
                    self.drag = DragState::Idle;
                    return true;
                };
                let tolerance = inflate(tab_rect, self.style.drag_tolerance, self.style.drag_tolerance);
                let within = rect_contains(tolerance, column, row);
                let distance = self.style.drag_start_distance;
                let travelled = column.abs_diff(origin.0) > distance
                    || row.abs_diff(origin.1) > distance;
                if !within {
                    // jitter guard: wandering off the tab before the
                    // threshold is met is not a drag
                    tracing::trace!("pointer left tab tolerance box, drag cancelled");
                    self.drag = DragState::Idle;
                    return true;
                }
                if travelled {
                    let area_rect = self.regions.get(source).unwrap_or(self.bounds);
                    let preview = FloatRect {
                        x: column as i32 - area_rect.width as i32 / 2,
                        y: row as i32,
                        width: area_rect.width.max(4),
                        height: area_rect.height.max(2),
                    };
                    self.drag = DragState::Dragging {
                        source,
                        widget,
                        origin_index: index,
                        preview,
                        target: DropTarget::None,
                        merge_hint: false,
                    };
                    tracing::debug!(?widget, "drag started");
                    self.update_drag_targets(column, row);
                }
                true
            }
            DragState::Dragging { .. } => {
                self.update_drag_targets(column, row);
                true
            }
        }
    }

    /// Per-move bookkeeping while dragging: move the preview, resolve the
    /// window under the pointer, and show the matching overlay.
    fn update_drag_targets(&mut self, column: u16, row: u16) {
        let DragState::Dragging {
            source,
            widget,
            origin_index,
            mut preview,
            merge_hint,
            ..
        } = self.drag
        else {
            return;
        };
        preview.x = column as i32 - preview.width as i32 / 2;
        preview.y = row as i32;

        let target = self.resolve_drop_target(column, row);
        let mut hint = false;
        match target {
            DropTarget::Area { area, over_strip } => {
                self.container_overlay.hide();
                if let Some(rect) = self.regions.get(area) {
                    self.area_overlay.show(rect);
                    let mask = if over_strip {
                        ZoneMask::CENTER
                    } else {
                        ZoneMask::ALL
                    };
                    self.area_overlay.set_allowed_zones(mask);
                    self.area_overlay.update_hover(&self.style, column, row);
                    hint = over_strip;
                } else {
                    self.area_overlay.hide();
                }
            }
            DropTarget::ContainerEdge => {
                self.area_overlay.hide();
                self.container_overlay.show(self.bounds);
                let mask = if self.root.is_none() {
                    ZoneMask::ALL
                } else {
                    ZoneMask::SIDES
                };
                self.container_overlay.set_allowed_zones(mask);
                self.container_overlay.update_hover(&self.style, column, row);
            }
            DropTarget::None => {
                self.area_overlay.hide();
                self.container_overlay.hide();
            }
        }
        if hint != merge_hint {
            self.events.push(DockEvent::DragFeedback { merge_hint: hint });
        }
        self.drag = DragState::Dragging {
            source,
            widget,
            origin_index,
            preview,
            target,
            merge_hint: hint,
        };
    }

    fn on_tab_release(&mut self, column: u16, row: u16) -> bool {
        match std::mem::replace(&mut self.drag, DragState::Idle) {
            DragState::Idle => false,
            // plain click: selection already happened on press
            DragState::Pressed { .. } => true,
            DragState::Dragging {
                source,
                widget,
                origin_index,
                preview,
                target,
                merge_hint,
            } => {
                self.finish_drop(
                    source,
                    widget,
                    origin_index,
                    preview,
                    target,
                    (column, row),
                );
                // unconditional teardown, error paths included
                self.area_overlay.hide();
                self.container_overlay.hide();
                if merge_hint {
                    self.events.push(DockEvent::DragFeedback { merge_hint: false });
                }
                self.refresh_layout();
                true
            }
        }
    }

    /// Resolve the drop in priority order: area overlay, container
    /// overlay, tear-off outside the container, otherwise leave the widget
    /// untouched.
    fn finish_drop(
        &mut self,
        source: AreaId,
        widget: WidgetId,
        origin_index: usize,
        preview: FloatRect,
        target: DropTarget,
        point: (u16, u16),
    ) {
        let (column, row) = point;

        if let DropTarget::Area { area, .. } = target
            && self.areas.contains_key(&area)
        {
            let zone = self
                .area_overlay
                .zone_under_cursor(&self.style, column, row);
            match zone {
                DropZone::Center if area == source => {
                    // same-strip drop: reorder at the cursor; same index
                    // stays a no-op
                    let insert = self.areas[&area]
                        .tab_layout()
                        .insertion_index(self.areas[&area].tab_position(), column, row);
                    if let Some(entry) = self.areas.get_mut(&area)
                        && entry.move_widget(widget, insert)
                    {
                        self.events.push(DockEvent::TabLayoutChanged(area));
                        tracing::debug!(?widget, to = insert, "reordered tab in place");
                    }
                    return;
                }
                DropZone::Center => {
                    let Some(origin) = self.detach_widget(widget) else {
                        return;
                    };
                    if !self.dock_into_area(widget, area, None) {
                        // the target vanished between resolve and drop
                        self.restore_or_float(widget, origin, point);
                    }
                    return;
                }
                zone => {
                    if let Some(edge) = edge_for_zone(zone) {
                        if area == source && self.areas[&source].widget_count() == 1 {
                            // splitting an area against its only tab would
                            // destroy the target mid-drop; leave it be
                            return;
                        }
                        let Some(origin) = self.detach_widget(widget) else {
                            return;
                        };
                        if self.split_area_with_widget(widget, area, edge).is_none() {
                            self.restore_or_float(widget, origin, point);
                        }
                        return;
                    }
                }
            }
        }

        if self.container_overlay.is_shown() {
            let zone = self
                .container_overlay
                .zone_under_cursor(&self.style, column, row);
            if let Some(edge) = edge_for_zone(zone) {
                if self.detach_widget(widget).is_some() {
                    self.dock_at_container_edge(widget, edge);
                }
                return;
            }
            if zone == DropZone::Center && self.root.is_none() {
                if self.detach_widget(widget).is_some() {
                    self.dock_at_container_edge(widget, InsertPosition::Right);
                }
                return;
            }
        }

        if matches!(target, DropTarget::None) && !rect_contains(self.bounds, column, row) {
            // released over nothing dockable: tear the widget off into a
            // floating window so it is never lost
            let floatable = self
                .widgets
                .get(&widget)
                .is_some_and(|w| w.has_feature(WidgetFeatures::FLOATABLE));
            if floatable && self.detach_widget(widget).is_some() {
                self.float_widget_at(widget, preview);
                tracing::debug!(?widget, "tear-off created floating container");
            }
            return;
        }

        // no drop: the widget was never removed, so there is nothing to
        // restore
        tracing::trace!(?widget, from = origin_index, "drop resolved to no-op");
    }

    /// Abort whatever drag is live: capture loss behaves exactly like a
    /// user cancellation.
    pub fn cancel_all_drags(&mut self) -> bool {
        let mut any = false;
        if !self.drag.is_idle() {
            if let DragState::Dragging { merge_hint: true, .. } = self.drag {
                self.events.push(DockEvent::DragFeedback { merge_hint: false });
            }
            self.drag = DragState::Idle;
            any = true;
            tracing::debug!("tab drag cancelled");
        }
        if self.float_drag.take().is_some() {
            any = true;
        }
        if self.split_drag.take().is_some() {
            any = true;
        }
        if any {
            self.area_overlay.hide();
            self.container_overlay.hide();
        }
        any
    }
}
