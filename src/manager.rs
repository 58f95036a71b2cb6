//! The dock manager: owns the widget registry, the area arena, the splitter
//! tree, floating containers and the two drop overlays.
//!
//! Areas are addressed through monotonically allocated ids rather than
//! references: removing the last widget from an area destroys the area
//! synchronously, so every id held across a removal call must be
//! re-validated through the arena before use.

use std::collections::BTreeMap;
use std::time::Instant;

use crossterm::event::{Event, MouseEventKind};
use ratatui::prelude::Rect;

use crate::area::{AreaId, DockArea};
use crate::drag::DragState;
use crate::error::DockError;
use crate::geometry::{FloatRect, RegionMap, rect_center, rect_contains};
use crate::overlay::{DockOverlay, DropZone, OverlayMode, ZoneMask};
use crate::style::DockStyle;
use crate::tabs::TabPosition;
use crate::tree::{InsertPosition, LayoutNode, SplitHandle};
use crate::widget::{DockWidget, WidgetFeatures, WidgetId};

/// Stable handle for a floating container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FloatingId(pub(crate) u64);

/// A top-level window holding widgets outside the docked tree.
#[derive(Debug, Clone)]
pub struct FloatingContainer {
    widgets: Vec<WidgetId>,
    current: usize,
    rect: FloatRect,
}

impl FloatingContainer {
    fn new(widget: WidgetId, rect: FloatRect) -> Self {
        Self {
            widgets: vec![widget],
            current: 0,
            rect,
        }
    }

    pub fn widget_ids(&self) -> &[WidgetId] {
        &self.widgets
    }

    pub fn current_widget(&self) -> Option<WidgetId> {
        self.widgets.get(self.current).copied()
    }

    pub fn rect(&self) -> FloatRect {
        self.rect
    }

    /// Top row of the container, used as its drag handle.
    pub fn header_rect(&self) -> FloatRect {
        FloatRect {
            height: 1.min(self.rect.height),
            ..self.rect
        }
    }

    fn remove_widget(&mut self, widget: WidgetId) -> bool {
        let Some(index) = self.widgets.iter().position(|id| *id == widget) else {
            return false;
        };
        self.widgets.remove(index);
        if self.current >= self.widgets.len() {
            self.current = self.widgets.len().saturating_sub(1);
        }
        true
    }
}

/// Notifications drained by the host once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockEvent {
    TabLayoutChanged(AreaId),
    AreaClosed(AreaId),
    WidgetDocked { widget: WidgetId, area: AreaId },
    WidgetFloated { widget: WidgetId, container: FloatingId },
    WidgetClosed(WidgetId),
    DragFeedback { merge_hint: bool },
    OverflowRequested(AreaId),
}

/// Result of resolving the window under the pointer during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    None,
    Area { area: AreaId, over_strip: bool },
    ContainerEdge,
}

/// Where a detached widget came from, for restoration after a failed drop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DetachOrigin {
    pub area: Option<AreaId>,
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitDrag {
    pub handle_index: usize,
    pub last: (u16, u16),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FloatDrag {
    pub id: FloatingId,
    pub start: (u16, u16),
    pub initial: (i32, i32),
}

pub struct DockManager {
    pub(crate) style: DockStyle,
    pub(crate) bounds: Rect,
    pub(crate) widgets: BTreeMap<WidgetId, DockWidget>,
    pub(crate) areas: BTreeMap<AreaId, DockArea>,
    pub(crate) root: Option<LayoutNode<AreaId>>,
    pub(crate) floating: BTreeMap<FloatingId, FloatingContainer>,
    // back-to-front draw order of floating containers
    pub(crate) z_order: Vec<FloatingId>,
    pub(crate) regions: RegionMap<AreaId>,
    pub(crate) handles: Vec<SplitHandle>,
    pub(crate) area_overlay: DockOverlay,
    pub(crate) container_overlay: DockOverlay,
    pub(crate) drag: DragState,
    pub(crate) split_drag: Option<SplitDrag>,
    pub(crate) float_drag: Option<FloatDrag>,
    pub(crate) last_tab_press: Option<(AreaId, usize, Instant)>,
    pub(crate) events: Vec<DockEvent>,
    next_widget: u64,
    next_area: u64,
    next_floating: u64,
}

impl DockManager {
    pub fn new(style: DockStyle) -> Self {
        Self {
            style,
            bounds: Rect::default(),
            widgets: BTreeMap::new(),
            areas: BTreeMap::new(),
            root: None,
            floating: BTreeMap::new(),
            z_order: Vec::new(),
            regions: RegionMap::default(),
            handles: Vec::new(),
            area_overlay: DockOverlay::new(OverlayMode::Area),
            container_overlay: DockOverlay::new(OverlayMode::Container),
            drag: DragState::Idle,
            split_drag: None,
            float_drag: None,
            last_tab_press: None,
            events: Vec::new(),
            next_widget: 0,
            next_area: 0,
            next_floating: 0,
        }
    }

    pub fn style(&self) -> &DockStyle {
        &self.style
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn widget(&self, id: WidgetId) -> Option<&DockWidget> {
        self.widgets.get(&id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut DockWidget> {
        self.widgets.get_mut(&id)
    }

    pub fn area(&self, id: AreaId) -> Option<&DockArea> {
        self.areas.get(&id)
    }

    pub fn area_ids(&self) -> Vec<AreaId> {
        self.areas.keys().copied().collect()
    }

    pub fn area_rect(&self, id: AreaId) -> Option<Rect> {
        self.regions.get(id)
    }

    pub fn floating_container(&self, id: FloatingId) -> Option<&FloatingContainer> {
        self.floating.get(&id)
    }

    pub fn floating_ids_back_to_front(&self) -> &[FloatingId] {
        &self.z_order
    }

    pub fn split_handles(&self) -> &[SplitHandle] {
        &self.handles
    }

    pub fn area_overlay(&self) -> &DockOverlay {
        &self.area_overlay
    }

    pub fn container_overlay(&self) -> &DockOverlay {
        &self.container_overlay
    }

    pub fn take_events(&mut self) -> Vec<DockEvent> {
        std::mem::take(&mut self.events)
    }

    /// The owning area of a docked widget, if any.
    pub fn area_of_widget(&self, widget: WidgetId) -> Option<AreaId> {
        self.areas
            .iter()
            .find(|(_, area)| area.index_of(widget).is_some())
            .map(|(id, _)| *id)
    }

    pub fn floating_of_widget(&self, widget: WidgetId) -> Option<FloatingId> {
        self.floating
            .iter()
            .find(|(_, container)| container.widgets.contains(&widget))
            .map(|(id, _)| *id)
    }

    fn alloc_widget(&mut self, widget: DockWidget) -> WidgetId {
        let id = WidgetId(self.next_widget);
        self.next_widget += 1;
        self.widgets.insert(id, widget);
        id
    }

    /// Allocate a fresh area already holding its first widget; empty areas
    /// never exist in the arena.
    fn alloc_area_with(&mut self, position: TabPosition, widget: WidgetId) -> AreaId {
        let id = AreaId(self.next_area);
        self.next_area += 1;
        let mut area = DockArea::new(position);
        area.push_widget(widget);
        self.areas.insert(id, area);
        tracing::debug!(area = ?id, "created dock area");
        id
    }

    /// Dock a fresh widget at an edge of the whole container, creating a
    /// new area there.
    pub fn add_widget_at_edge(
        &mut self,
        widget: DockWidget,
        edge: InsertPosition,
    ) -> (WidgetId, AreaId) {
        let widget_id = self.alloc_widget(widget);
        let area_id = self.dock_at_container_edge(widget_id, edge);
        (widget_id, area_id)
    }

    /// Dock a fresh widget as a tab of an existing area.
    pub fn add_widget_to_area(
        &mut self,
        widget: DockWidget,
        area: AreaId,
    ) -> Result<WidgetId, DockError> {
        if !self.areas.contains_key(&area) {
            return Err(DockError::UnknownArea(area));
        }
        let widget_id = self.alloc_widget(widget);
        self.dock_into_area(widget_id, area, None);
        Ok(widget_id)
    }

    /// Close a widget entirely: detach it from its owner and drop it from
    /// the registry. The owning area is destroyed if this was its last tab.
    pub fn close_widget(&mut self, widget: WidgetId) -> Result<(), DockError> {
        if !self.widgets.contains_key(&widget) {
            return Err(DockError::UnknownWidget(widget));
        }
        self.detach_widget(widget)
            .ok_or(DockError::WidgetNotDocked(widget))?;
        self.widgets.remove(&widget);
        self.events.push(DockEvent::WidgetClosed(widget));
        tracing::debug!(widget = ?widget, "closed widget");
        self.refresh_layout();
        Ok(())
    }

    pub fn set_tab_position(&mut self, area: AreaId, position: TabPosition) -> Result<(), DockError> {
        let entry = self
            .areas
            .get_mut(&area)
            .ok_or(DockError::UnknownArea(area))?;
        entry.set_tab_position(position);
        self.events.push(DockEvent::TabLayoutChanged(area));
        self.refresh_layout();
        Ok(())
    }

    /// Make a docked widget the current tab of its area. Selecting a tab
    /// hidden by overflow slides the visible window so it is laid out.
    pub fn select_widget(&mut self, widget: WidgetId) -> Result<(), DockError> {
        if !self.widgets.contains_key(&widget) {
            return Err(DockError::UnknownWidget(widget));
        }
        let area = self
            .area_of_widget(widget)
            .ok_or(DockError::WidgetNotDocked(widget))?;
        if let Some(entry) = self.areas.get_mut(&area)
            && entry.set_current_widget(widget)
        {
            self.events.push(DockEvent::TabLayoutChanged(area));
            self.refresh_layout();
        }
        Ok(())
    }

    /// Host-driven tab reorder, `to` interpreted as an index in the list
    /// before removal.
    pub fn move_tab(&mut self, area: AreaId, from: usize, to: usize) -> Result<(), DockError> {
        let entry = self
            .areas
            .get_mut(&area)
            .ok_or(DockError::UnknownArea(area))?;
        let widget = entry
            .widget_at(from)
            .ok_or(DockError::TabIndexOutOfRange { area, index: from })?;
        if entry.move_widget(widget, to) {
            self.events.push(DockEvent::TabLayoutChanged(area));
            self.refresh_layout();
        }
        Ok(())
    }

    /// Detach a docked widget into a new floating container sized from its
    /// area rect.
    pub fn float_widget(&mut self, widget: WidgetId) -> Result<FloatingId, DockError> {
        let entry = self
            .widgets
            .get(&widget)
            .ok_or(DockError::UnknownWidget(widget))?;
        if !entry.has_feature(WidgetFeatures::FLOATABLE) || entry.is_position_locked() {
            return Err(DockError::WidgetLocked(widget));
        }
        let rect = self
            .area_of_widget(widget)
            .and_then(|area| self.regions.get(area))
            .map(|rect| FloatRect {
                x: rect.x as i32 + 2,
                y: rect.y as i32 + 1,
                width: rect.width.saturating_sub(2).max(4),
                height: rect.height.saturating_sub(2).max(2),
            })
            .unwrap_or_else(|| {
                let (cx, cy) = rect_center(self.bounds);
                self.default_float_rect((cx, cy))
            });
        self.detach_widget(widget)
            .ok_or(DockError::WidgetNotDocked(widget))?;
        let id = self.float_widget_at(widget, rect);
        self.refresh_layout();
        Ok(id)
    }

    /// Recompute every region, tab layout and floating rect for the given
    /// container bounds. Runs once per frame and again after structural
    /// changes so hit tests between events stay accurate.
    pub fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.regions.clear();
        self.handles.clear();
        if let Some(root) = &self.root {
            let (regions, handles) = root.layout_with_handles(bounds);
            for (id, rect) in regions {
                self.regions.set(id, rect);
            }
            self.handles = handles;
        }
        let widgets = &self.widgets;
        let style = &self.style;
        for (id, area) in self.areas.iter_mut() {
            let Some(rect) = self.regions.get(*id) else {
                continue;
            };
            let refs: Vec<&DockWidget> = area
                .widget_ids()
                .iter()
                .filter_map(|wid| widgets.get(wid))
                .collect();
            area.relayout(rect, style, &refs);
        }
    }

    pub(crate) fn refresh_layout(&mut self) {
        if self.bounds.width > 0 && self.bounds.height > 0 {
            self.layout(self.bounds);
        }
    }

    /// Topmost docked area under the pointer. Floating containers do not
    /// shadow docked areas for drop-target purposes.
    pub fn find_area_at(&self, column: u16, row: u16) -> Option<AreaId> {
        self.regions.hit_test(column, row)
    }

    /// Resolve what a drag at the given point would target.
    pub fn resolve_drop_target(&self, column: u16, row: u16) -> DropTarget {
        if let Some(area) = self.find_area_at(column, row) {
            let over_strip = self
                .areas
                .get(&area)
                .is_some_and(|a| rect_contains(a.strip_rect(&self.style), column, row));
            return DropTarget::Area { area, over_strip };
        }
        if rect_contains(self.bounds, column, row) {
            return DropTarget::ContainerEdge;
        }
        DropTarget::None
    }

    pub fn floating_at(&self, column: u16, row: u16) -> Option<FloatingId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|id| {
                self.floating
                    .get(id)
                    .is_some_and(|container| container.rect.contains(column, row))
            })
    }

    pub fn bring_floating_to_front(&mut self, id: FloatingId) {
        if self.floating.contains_key(&id) {
            self.z_order.retain(|other| *other != id);
            self.z_order.push(id);
        }
    }

    // ---- structural mutation -------------------------------------------

    /// Remove a widget from whatever owns it. Destroys the owner when it
    /// becomes empty; any `AreaId` captured before this call may now be
    /// dead. Returns `None` when the widget is owned by nothing.
    pub(crate) fn detach_widget(&mut self, widget: WidgetId) -> Option<DetachOrigin> {
        if let Some(area_id) = self.area_of_widget(widget) {
            let area = self.areas.get_mut(&area_id)?;
            let index = area.remove_widget(widget)?;
            tracing::debug!(widget = ?widget, area = ?area_id, index, "detached widget");
            if area.is_empty() {
                self.destroy_area(area_id);
            } else {
                self.events.push(DockEvent::TabLayoutChanged(area_id));
            }
            return Some(DetachOrigin {
                area: Some(area_id),
                index,
            });
        }
        if let Some(float_id) = self.floating_of_widget(widget) {
            let container = self.floating.get_mut(&float_id)?;
            container.remove_widget(widget);
            if container.widgets.is_empty() {
                self.floating.remove(&float_id);
                self.z_order.retain(|id| *id != float_id);
                tracing::debug!(container = ?float_id, "destroyed empty floating container");
            }
            return Some(DetachOrigin {
                area: None,
                index: 0,
            });
        }
        None
    }

    fn destroy_area(&mut self, id: AreaId) {
        self.areas.remove(&id);
        self.regions.remove(id);
        match self.root.take() {
            Some(LayoutNode::Leaf(leaf)) if leaf == id => {}
            Some(mut node) => {
                node.remove_leaf(id);
                self.root = Some(node);
            }
            None => {}
        }
        self.events.push(DockEvent::AreaClosed(id));
        tracing::debug!(area = ?id, "destroyed empty dock area");
    }

    /// Insert a detached widget into an area. `index` of `None` appends.
    /// Returns false (leaving the widget unowned) when the area is gone.
    pub(crate) fn dock_into_area(
        &mut self,
        widget: WidgetId,
        area: AreaId,
        index: Option<usize>,
    ) -> bool {
        let Some(entry) = self.areas.get_mut(&area) else {
            return false;
        };
        match index {
            Some(index) => entry.insert_widget(index, widget),
            None => entry.push_widget(widget),
        }
        self.events.push(DockEvent::WidgetDocked { widget, area });
        self.events.push(DockEvent::TabLayoutChanged(area));
        tracing::debug!(widget = ?widget, area = ?area, "docked widget into area");
        self.refresh_layout();
        true
    }

    /// Split `target` on `edge` and place the widget in the new half.
    /// Returns `None` when the target area has vanished from the tree.
    pub(crate) fn split_area_with_widget(
        &mut self,
        widget: WidgetId,
        target: AreaId,
        edge: InsertPosition,
    ) -> Option<AreaId> {
        let in_tree = self
            .root
            .as_ref()
            .is_some_and(|root| root.contains_leaf(target));
        if !in_tree {
            return None;
        }
        let position = self
            .areas
            .get(&target)
            .map(|area| area.tab_position())
            .unwrap_or_default();
        let new_area = self.alloc_area_with(position, widget);
        if let Some(root) = self.root.as_mut() {
            root.insert_leaf(target, new_area, edge);
        }
        self.events.push(DockEvent::WidgetDocked {
            widget,
            area: new_area,
        });
        tracing::debug!(widget = ?widget, target = ?target, ?edge, new_area = ?new_area, "split area");
        self.refresh_layout();
        Some(new_area)
    }

    /// Dock a widget at an edge of the whole container, creating the root
    /// area if the tree is empty.
    pub(crate) fn dock_at_container_edge(
        &mut self,
        widget: WidgetId,
        edge: InsertPosition,
    ) -> AreaId {
        let area = self.alloc_area_with(TabPosition::default(), widget);
        match self.root.as_mut() {
            Some(root) => root.split_root(area, edge),
            None => self.root = Some(LayoutNode::leaf(area)),
        }
        self.events.push(DockEvent::WidgetDocked { widget, area });
        tracing::debug!(widget = ?widget, ?edge, area = ?area, "docked at container edge");
        self.refresh_layout();
        area
    }

    /// Move a detached widget into a new floating container.
    pub(crate) fn float_widget_at(&mut self, widget: WidgetId, rect: FloatRect) -> FloatingId {
        let id = FloatingId(self.next_floating);
        self.next_floating += 1;
        self.floating.insert(id, FloatingContainer::new(widget, rect));
        self.z_order.push(id);
        self.events.push(DockEvent::WidgetFloated {
            widget,
            container: id,
        });
        tracing::debug!(widget = ?widget, container = ?id, "floated widget");
        id
    }

    /// Restoration ladder for a drop that could not complete: original
    /// index, then append to the original area, then a floating window.
    /// The widget never ends up unowned.
    pub(crate) fn restore_or_float(
        &mut self,
        widget: WidgetId,
        origin: DetachOrigin,
        drop_point: (u16, u16),
    ) {
        if let Some(area) = origin.area
            && self.areas.contains_key(&area)
        {
            self.dock_into_area(widget, area, Some(origin.index));
            return;
        }
        let rect = self.default_float_rect(drop_point);
        self.float_widget_at(widget, rect);
        self.refresh_layout();
    }

    pub(crate) fn default_float_rect(&self, point: (u16, u16)) -> FloatRect {
        let width = (self.bounds.width / 3).max(self.style.min_pane_size).max(8);
        let height = (self.bounds.height / 3).max(3);
        FloatRect {
            x: point.0 as i32 - width as i32 / 2,
            y: point.1 as i32,
            width,
            height,
        }
    }

    // ---- splitter and floating drags -----------------------------------

    pub(crate) fn handle_split_drag_event(&mut self, event: &Event) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        match mouse.kind {
            MouseEventKind::Down(_) => {
                let hit = self
                    .handles
                    .iter()
                    .position(|handle| rect_contains(handle.rect, mouse.column, mouse.row));
                if let Some(handle_index) = hit {
                    self.split_drag = Some(SplitDrag {
                        handle_index,
                        last: (mouse.column, mouse.row),
                    });
                    return true;
                }
            }
            MouseEventKind::Drag(_) => {
                if let Some(mut drag) = self.split_drag {
                    let Some(handle) = self.handles.get(drag.handle_index).cloned() else {
                        self.split_drag = None;
                        return false;
                    };
                    let delta = match handle.direction {
                        ratatui::prelude::Direction::Horizontal => {
                            mouse.column as i16 - drag.last.0 as i16
                        }
                        ratatui::prelude::Direction::Vertical => {
                            mouse.row as i16 - drag.last.1 as i16
                        }
                    };
                    drag.last = (mouse.column, mouse.row);
                    self.split_drag = Some(drag);
                    if delta != 0
                        && let Some(root) = self.root.as_mut()
                    {
                        let resized = root.apply_handle_drag(
                            self.bounds,
                            &handle,
                            delta,
                            self.style.min_pane_size,
                        );
                        if resized {
                            self.refresh_layout();
                        }
                    }
                    return true;
                }
            }
            MouseEventKind::Up(_) => {
                if self.split_drag.take().is_some() {
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    pub(crate) fn handle_float_drag_event(&mut self, event: &Event) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        match mouse.kind {
            MouseEventKind::Down(_) => {
                let Some(id) = self.floating_at(mouse.column, mouse.row) else {
                    return false;
                };
                self.bring_floating_to_front(id);
                let container = &self.floating[&id];
                if container.header_rect().contains(mouse.column, mouse.row) {
                    self.float_drag = Some(FloatDrag {
                        id,
                        start: (mouse.column, mouse.row),
                        initial: (container.rect.x, container.rect.y),
                    });
                }
                // body clicks are consumed too: the container is opaque
                true
            }
            MouseEventKind::Drag(_) => {
                let Some(drag) = self.float_drag else {
                    return false;
                };
                if let Some(container) = self.floating.get_mut(&drag.id) {
                    let dx = mouse.column as i32 - drag.start.0 as i32;
                    let dy = mouse.row as i32 - drag.start.1 as i32;
                    container.rect.x = drag.initial.0 + dx;
                    container.rect.y = drag.initial.1 + dy;
                }
                // offer redocking at the container edges once the pointer
                // has actually travelled
                let moved = mouse.column.abs_diff(drag.start.0) + mouse.row.abs_diff(drag.start.1);
                if moved > self.style.drag_start_distance {
                    self.container_overlay.show(self.bounds);
                    self.container_overlay.set_allowed_zones(ZoneMask::SIDES);
                    self.container_overlay
                        .update_hover(&self.style, mouse.column, mouse.row);
                } else {
                    self.container_overlay.hide();
                }
                true
            }
            MouseEventKind::Up(_) => {
                let Some(drag) = self.float_drag.take() else {
                    return false;
                };
                let zone =
                    self.container_overlay
                        .zone_under_cursor(&self.style, mouse.column, mouse.row);
                self.container_overlay.hide();
                if let Some(edge) = edge_for_zone(zone) {
                    self.redock_floating(drag.id, edge);
                }
                true
            }
            _ => false,
        }
    }

    /// Dock every widget of a floating container at a container edge; the
    /// first widget creates the area, the rest join it as tabs.
    fn redock_floating(&mut self, id: FloatingId, edge: InsertPosition) {
        let Some(container) = self.floating.remove(&id) else {
            return;
        };
        self.z_order.retain(|other| *other != id);
        let mut widgets = container.widgets.into_iter();
        let Some(first) = widgets.next() else {
            return;
        };
        let area = self.dock_at_container_edge(first, edge);
        for widget in widgets {
            self.dock_into_area(widget, area, None);
        }
        tracing::debug!(container = ?id, area = ?area, ?edge, "redocked floating container");
    }

    /// Sum of widgets owned across all areas and floating containers.
    /// Every registered widget is owned exactly once; used by the no-loss
    /// assertions in the test suites.
    pub fn owned_widget_count(&self) -> usize {
        let docked: usize = self.areas.values().map(|area| area.widget_count()).sum();
        let floating: usize = self
            .floating
            .values()
            .map(|container| container.widgets.len())
            .sum();
        docked + floating
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }
}

pub(crate) fn edge_for_zone(zone: DropZone) -> Option<InsertPosition> {
    match zone {
        DropZone::Top => Some(InsertPosition::Top),
        DropZone::Bottom => Some(InsertPosition::Bottom),
        DropZone::Left => Some(InsertPosition::Left),
        DropZone::Right => Some(InsertPosition::Right),
        DropZone::Center | DropZone::Invalid => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: 120,
            height: 40,
        }
    }

    fn manager() -> DockManager {
        let mut manager = DockManager::new(DockStyle::compact());
        manager.layout(bounds());
        manager
    }

    #[test]
    fn first_widget_becomes_the_root_area() {
        let mut m = manager();
        let (w, a) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        assert_eq!(m.area_of_widget(w), Some(a));
        assert_eq!(m.area_rect(a), Some(bounds()));
    }

    #[test]
    fn edge_docking_splits_the_root() {
        let mut m = manager();
        let (_, a) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        let (_, b) = m.add_widget_at_edge(DockWidget::new("two"), InsertPosition::Right);
        let ra = m.area_rect(a).unwrap();
        let rb = m.area_rect(b).unwrap();
        assert!(ra.x < rb.x);
        assert_eq!(ra.intersection(rb).area(), 0);
    }

    #[test]
    fn closing_last_widget_destroys_the_area() {
        let mut m = manager();
        let (w1, a) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        let (w2, b) = m.add_widget_at_edge(DockWidget::new("two"), InsertPosition::Right);
        m.close_widget(w1).unwrap();
        assert!(m.area(a).is_none());
        let events = m.take_events();
        assert!(events.contains(&DockEvent::AreaClosed(a)));
        // the survivor reclaims the full bounds
        assert_eq!(m.area_rect(b), Some(bounds()));
        assert_eq!(m.area_of_widget(w2), Some(b));
    }

    #[test]
    fn close_unknown_widget_is_an_error() {
        let mut m = manager();
        assert_eq!(
            m.close_widget(WidgetId(99)),
            Err(DockError::UnknownWidget(WidgetId(99)))
        );
    }

    #[test]
    fn detach_and_restore_round_trips() {
        let mut m = manager();
        let (w1, a) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        let w2 = m.add_widget_to_area(DockWidget::new("two"), a).unwrap();
        let origin = m.detach_widget(w1).unwrap();
        assert_eq!(origin.area, Some(a));
        assert_eq!(origin.index, 0);
        assert_eq!(m.area(a).unwrap().widget_count(), 1);
        m.restore_or_float(w1, origin, (5, 5));
        assert_eq!(m.area(a).unwrap().widget_ids(), &[w1, w2]);
    }

    #[test]
    fn restore_falls_back_to_floating_when_origin_is_gone() {
        let mut m = manager();
        let (w1, a) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        m.add_widget_at_edge(DockWidget::new("two"), InsertPosition::Right);
        let origin = m.detach_widget(w1).unwrap();
        assert!(m.area(a).is_none(), "area destroyed with its last widget");
        m.restore_or_float(w1, origin, (10, 10));
        let container = m.floating_of_widget(w1).expect("widget floated");
        assert!(m.floating_container(container).is_some());
        assert_eq!(m.owned_widget_count(), m.widget_count());
    }

    #[test]
    fn select_widget_slides_overflow_window() {
        let mut m = DockManager::new(DockStyle::compact());
        m.layout(Rect {
            x: 0,
            y: 0,
            width: 24,
            height: 10,
        });
        let (_, a) = m.add_widget_at_edge(DockWidget::new("alpha"), InsertPosition::Left);
        let mut last = WidgetId(0);
        for title in ["bravo", "charlie", "delta"] {
            last = m.add_widget_to_area(DockWidget::new(title), a).unwrap();
        }
        m.select_widget(WidgetId(0)).unwrap();
        assert!(m.area(a).unwrap().tab_layout().has_overflow);
        assert!(m.area(a).unwrap().tab_layout().slots[0].rect.is_some());
        // selecting the last tab slides the visible window forward
        m.select_widget(last).unwrap();
        let layout = m.area(a).unwrap().tab_layout();
        assert!(layout.slots[3].rect.is_some());
        assert!(layout.first_visible > 0);
    }

    #[test]
    fn move_tab_validates_indices() {
        let mut m = manager();
        let (w1, a) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        let w2 = m.add_widget_to_area(DockWidget::new("two"), a).unwrap();
        m.move_tab(a, 0, 2).unwrap();
        assert_eq!(m.area(a).unwrap().widget_ids(), &[w2, w1]);
        assert_eq!(
            m.move_tab(a, 5, 0),
            Err(DockError::TabIndexOutOfRange { area: a, index: 5 })
        );
    }

    #[test]
    fn float_widget_respects_lock_and_features() {
        let mut m = manager();
        let (w1, a) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        let w2 = m.add_widget_to_area(DockWidget::new("two"), a).unwrap();
        m.widget_mut(w2).unwrap().set_position_locked(true);
        assert_eq!(m.float_widget(w2), Err(DockError::WidgetLocked(w2)));
        let f = m.float_widget(w1).unwrap();
        assert_eq!(m.floating_of_widget(w1), Some(f));
        assert_eq!(m.area(a).unwrap().widget_ids(), &[w2]);
        assert_eq!(m.owned_widget_count(), m.widget_count());
    }

    #[test]
    fn resolve_drop_target_distinguishes_strip_and_body() {
        let mut m = manager();
        let (_, a) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        let rect = m.area_rect(a).unwrap();
        let strip = m.area(a).unwrap().strip_rect(m.style());
        match m.resolve_drop_target(strip.x + 1, strip.y) {
            DropTarget::Area { area, over_strip } => {
                assert_eq!(area, a);
                assert!(over_strip);
            }
            other => panic!("expected strip target, got {other:?}"),
        }
        match m.resolve_drop_target(rect.x + 2, rect.y + rect.height - 2) {
            DropTarget::Area { over_strip, .. } => assert!(!over_strip),
            other => panic!("expected body target, got {other:?}"),
        }
        assert_eq!(m.resolve_drop_target(200, 200), DropTarget::None);
    }

    #[test]
    fn floating_z_order_tracks_clicks() {
        let mut m = manager();
        let (w1, _) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        let origin = m.detach_widget(w1).unwrap();
        assert!(origin.area.is_some());
        let f1 = m.float_widget_at(
            w1,
            FloatRect {
                x: 5,
                y: 5,
                width: 20,
                height: 6,
            },
        );
        let (w2, _) = m.add_widget_at_edge(DockWidget::new("two"), InsertPosition::Left);
        m.detach_widget(w2).unwrap();
        let f2 = m.float_widget_at(
            w2,
            FloatRect {
                x: 10,
                y: 6,
                width: 20,
                height: 6,
            },
        );
        assert_eq!(m.floating_ids_back_to_front(), &[f1, f2]);
        // overlapping point resolves to the topmost container
        assert_eq!(m.floating_at(12, 7), Some(f2));
        m.bring_floating_to_front(f1);
        assert_eq!(m.floating_ids_back_to_front(), &[f2, f1]);
    }

    #[test]
    fn redock_floating_brings_all_widgets_back() {
        let mut m = manager();
        let (w1, area) = m.add_widget_at_edge(DockWidget::new("one"), InsertPosition::Left);
        let w2 = m.add_widget_to_area(DockWidget::new("two"), area).unwrap();
        let (_w3, _) = m.add_widget_at_edge(DockWidget::new("three"), InsertPosition::Right);
        m.detach_widget(w1).unwrap();
        let f = m.float_widget_at(
            w1,
            FloatRect {
                x: 3,
                y: 3,
                width: 20,
                height: 6,
            },
        );
        m.detach_widget(w2).unwrap();
        m.floating.get_mut(&f).unwrap().widgets.push(w2);
        m.redock_floating(f, InsertPosition::Bottom);
        let area = m.area_of_widget(w1).expect("redocked");
        assert_eq!(m.area_of_widget(w2), Some(area));
        assert!(m.floating_container(f).is_none());
        assert_eq!(m.owned_widget_count(), m.widget_count());
    }
}
