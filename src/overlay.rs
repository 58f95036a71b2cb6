//! Drop-zone overlays shown over drag targets.
//!
//! An overlay is bound to one target rectangle while shown. It owns the
//! five indicator rectangles, resolves which zone the pointer is over, and
//! tracks the highlighted zone so callers only repaint on actual changes.
//! Zones excluded from the allowed mask never match a hit test, even when
//! the pointer is geometrically inside them.

use ratatui::prelude::Rect;

use crate::geometry::{rect_center, rect_contains};
use crate::style::DockStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    Invalid,
}

impl DropZone {
    pub const SIDES: [DropZone; 4] = [
        DropZone::Top,
        DropZone::Bottom,
        DropZone::Left,
        DropZone::Right,
    ];
    pub const ALL: [DropZone; 5] = [
        DropZone::Top,
        DropZone::Bottom,
        DropZone::Left,
        DropZone::Right,
        DropZone::Center,
    ];
}

/// Bitmask of zones an overlay instance will offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneMask(u8);

impl ZoneMask {
    pub const NONE: Self = Self(0);
    pub const TOP: Self = Self(0x01);
    pub const BOTTOM: Self = Self(0x02);
    pub const LEFT: Self = Self(0x04);
    pub const RIGHT: Self = Self(0x08);
    pub const CENTER: Self = Self(0x10);
    pub const SIDES: Self = Self(0x0f);
    pub const ALL: Self = Self(0x1f);

    pub fn of(zone: DropZone) -> Self {
        match zone {
            DropZone::Top => Self::TOP,
            DropZone::Bottom => Self::BOTTOM,
            DropZone::Left => Self::LEFT,
            DropZone::Right => Self::RIGHT,
            DropZone::Center => Self::CENTER,
            DropZone::Invalid => Self::NONE,
        }
    }

    pub fn allows(self, zone: DropZone) -> bool {
        let bit = Self::of(zone);
        bit != Self::NONE && self.0 & bit.0 == bit.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    /// Indicators clustered around the center of a target area.
    Area,
    /// Side indicators pinned to the container edges.
    Container,
}

#[derive(Debug)]
pub struct DockOverlay {
    mode: OverlayMode,
    target: Option<Rect>,
    allowed: ZoneMask,
    hovered: DropZone,
    needs_repaint: bool,
}

impl DockOverlay {
    pub fn new(mode: OverlayMode) -> Self {
        Self {
            mode,
            target: None,
            allowed: ZoneMask::ALL,
            hovered: DropZone::Invalid,
            needs_repaint: false,
        }
    }

    pub fn mode(&self) -> OverlayMode {
        self.mode
    }

    pub fn is_shown(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<Rect> {
        self.target
    }

    pub fn allowed_zones(&self) -> ZoneMask {
        self.allowed
    }

    pub fn hovered_zone(&self) -> DropZone {
        self.hovered
    }

    /// Bind the overlay to a target rectangle. Re-showing with a different
    /// rect repositions every indicator.
    pub fn show(&mut self, target: Rect) {
        if self.target != Some(target) {
            self.target = Some(target);
            self.needs_repaint = true;
        }
    }

    /// Must be called by the drag session before the target window goes
    /// away; queries against a hidden overlay resolve `Invalid`.
    pub fn hide(&mut self) {
        if self.target.is_some() {
            self.target = None;
            self.hovered = DropZone::Invalid;
            self.needs_repaint = true;
        }
    }

    pub fn set_allowed_zones(&mut self, allowed: ZoneMask) {
        if self.allowed != allowed {
            self.allowed = allowed;
            if !allowed.allows(self.hovered) {
                self.hovered = DropZone::Invalid;
            }
            self.needs_repaint = true;
        }
    }

    /// Indicator rectangle for a zone, `None` while hidden or masked out.
    pub fn zone_rect(&self, style: &DockStyle, zone: DropZone) -> Option<Rect> {
        let target = self.target?;
        if !self.allowed.allows(zone) {
            return None;
        }
        Some(zone_rect_for(self.mode, target, zone, style))
    }

    /// Resolve the zone under the pointer. Hidden overlays and masked zones
    /// resolve `Invalid`.
    pub fn zone_under_cursor(&self, style: &DockStyle, column: u16, row: u16) -> DropZone {
        let Some(target) = self.target else {
            return DropZone::Invalid;
        };
        for zone in DropZone::ALL {
            if !self.allowed.allows(zone) {
                continue;
            }
            if rect_contains(zone_rect_for(self.mode, target, zone, style), column, row) {
                return zone;
            }
        }
        DropZone::Invalid
    }

    /// Track the highlighted zone; flags a repaint only when it changes.
    pub fn update_hover(&mut self, style: &DockStyle, column: u16, row: u16) {
        let zone = self.zone_under_cursor(style, column, row);
        if zone != self.hovered {
            self.hovered = zone;
            self.needs_repaint = true;
        }
    }

    pub fn take_needs_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    /// Rectangle the dragged widget would occupy after a drop on `zone`:
    /// half of the target on the matching edge, or the whole target for a
    /// Center merge.
    pub fn preview_rect(&self, zone: DropZone) -> Option<Rect> {
        let target = self.target?;
        let rect = match zone {
            DropZone::Top => Rect {
                height: target.height / 2,
                ..target
            },
            DropZone::Bottom => Rect {
                y: target.y + target.height - target.height / 2,
                height: target.height / 2,
                ..target
            },
            DropZone::Left => Rect {
                width: target.width / 2,
                ..target
            },
            DropZone::Right => Rect {
                x: target.x + target.width - target.width / 2,
                width: target.width / 2,
                ..target
            },
            DropZone::Center => target,
            DropZone::Invalid => return None,
        };
        Some(rect)
    }
}

fn zone_rect_for(mode: OverlayMode, target: Rect, zone: DropZone, style: &DockStyle) -> Rect {
    let size = style.drop_size;
    let half = size / 2;
    let (cx, cy) = rect_center(target);
    match mode {
        OverlayMode::Area => {
            let spacing = size.saturating_add(style.indicator_gap);
            let (x, y) = match zone {
                DropZone::Top => (cx.saturating_sub(half), cy.saturating_sub(spacing + half)),
                DropZone::Bottom => (cx.saturating_sub(half), cy.saturating_add(spacing) - half),
                DropZone::Left => (cx.saturating_sub(spacing + half), cy.saturating_sub(half)),
                DropZone::Right => (cx.saturating_add(spacing) - half, cy.saturating_sub(half)),
                DropZone::Center | DropZone::Invalid => {
                    (cx.saturating_sub(half), cy.saturating_sub(half))
                }
            };
            Rect {
                x,
                y,
                width: size,
                height: size,
            }
        }
        OverlayMode::Container => {
            let margin = style.overlay_margin;
            let (x, y) = match zone {
                DropZone::Top => (cx.saturating_sub(half), target.y.saturating_add(margin)),
                DropZone::Bottom => (
                    cx.saturating_sub(half),
                    target
                        .y
                        .saturating_add(target.height)
                        .saturating_sub(margin + size),
                ),
                DropZone::Left => (target.x.saturating_add(margin), cy.saturating_sub(half)),
                DropZone::Right => (
                    target
                        .x
                        .saturating_add(target.width)
                        .saturating_sub(margin + size),
                    cy.saturating_sub(half),
                ),
                DropZone::Center | DropZone::Invalid => {
                    (cx.saturating_sub(half), cy.saturating_sub(half))
                }
            };
            Rect {
                x,
                y,
                width: size,
                height: size,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> DockStyle {
        DockStyle::default()
    }

    fn target() -> Rect {
        Rect {
            x: 100,
            y: 100,
            width: 400,
            height: 300,
        }
    }

    fn rects_disjoint(a: Rect, b: Rect) -> bool {
        let i = a.intersection(b);
        i.width == 0 || i.height == 0
    }

    #[test]
    fn zone_rects_never_pairwise_intersect() {
        let style = style();
        for mode in [OverlayMode::Area, OverlayMode::Container] {
            let mut overlay = DockOverlay::new(mode);
            overlay.show(target());
            let rects: Vec<(DropZone, Rect)> = DropZone::ALL
                .iter()
                .map(|zone| (*zone, overlay.zone_rect(&style, *zone).unwrap()))
                .collect();
            for (i, (za, a)) in rects.iter().enumerate() {
                for (zb, b) in rects.iter().skip(i + 1) {
                    assert!(
                        rects_disjoint(*a, *b),
                        "{za:?} and {zb:?} overlap in {mode:?} mode"
                    );
                }
            }
        }
    }

    #[test]
    fn cursor_outside_all_zones_is_invalid() {
        let style = style();
        let mut overlay = DockOverlay::new(OverlayMode::Area);
        overlay.show(target());
        assert_eq!(
            overlay.zone_under_cursor(&style, target().x + 1, target().y + 1),
            DropZone::Invalid
        );
        // and every zone rect resolves back to its own zone
        for zone in DropZone::ALL {
            let rect = overlay.zone_rect(&style, zone).unwrap();
            let (cx, cy) = rect_center(rect);
            assert_eq!(overlay.zone_under_cursor(&style, cx, cy), zone);
        }
    }

    #[test]
    fn masked_zones_never_match() {
        let style = style();
        let mut overlay = DockOverlay::new(OverlayMode::Area);
        overlay.show(target());
        overlay.set_allowed_zones(ZoneMask::CENTER);
        for zone in DropZone::SIDES {
            let rect = zone_rect_for(OverlayMode::Area, target(), zone, &style);
            let (cx, cy) = rect_center(rect);
            assert_eq!(overlay.zone_under_cursor(&style, cx, cy), DropZone::Invalid);
            assert!(overlay.zone_rect(&style, zone).is_none());
        }
        let center = overlay.zone_rect(&style, DropZone::Center).unwrap();
        let (cx, cy) = rect_center(center);
        assert_eq!(overlay.zone_under_cursor(&style, cx, cy), DropZone::Center);
    }

    #[test]
    fn hidden_overlay_resolves_invalid() {
        let style = style();
        let mut overlay = DockOverlay::new(OverlayMode::Container);
        overlay.show(target());
        overlay.hide();
        for zone in DropZone::ALL {
            let rect = zone_rect_for(OverlayMode::Container, target(), zone, &style);
            let (cx, cy) = rect_center(rect);
            assert_eq!(overlay.zone_under_cursor(&style, cx, cy), DropZone::Invalid);
        }
    }

    #[test]
    fn hover_changes_flag_repaint_once() {
        let style = style();
        let mut overlay = DockOverlay::new(OverlayMode::Area);
        overlay.show(target());
        assert!(overlay.take_needs_repaint());

        let center = overlay.zone_rect(&style, DropZone::Center).unwrap();
        let (cx, cy) = rect_center(center);
        overlay.update_hover(&style, cx, cy);
        assert_eq!(overlay.hovered_zone(), DropZone::Center);
        assert!(overlay.take_needs_repaint());

        // unchanged hover does not request another repaint
        overlay.update_hover(&style, cx, cy);
        assert!(!overlay.take_needs_repaint());
    }

    #[test]
    fn masking_clears_a_now_disallowed_hover() {
        let style = style();
        let mut overlay = DockOverlay::new(OverlayMode::Area);
        overlay.show(target());
        let top = overlay.zone_rect(&style, DropZone::Top).unwrap();
        let (cx, cy) = rect_center(top);
        overlay.update_hover(&style, cx, cy);
        assert_eq!(overlay.hovered_zone(), DropZone::Top);
        overlay.set_allowed_zones(ZoneMask::CENTER);
        assert_eq!(overlay.hovered_zone(), DropZone::Invalid);
    }

    #[test]
    fn preview_rects_split_the_target_in_half() {
        let mut overlay = DockOverlay::new(OverlayMode::Area);
        let t = target();
        overlay.show(t);
        let left = overlay.preview_rect(DropZone::Left).unwrap();
        assert_eq!(left.x, t.x);
        assert_eq!(left.width, t.width / 2);
        let bottom = overlay.preview_rect(DropZone::Bottom).unwrap();
        assert_eq!(bottom.y + bottom.height, t.y + t.height);
        assert_eq!(bottom.height, t.height / 2);
        assert_eq!(overlay.preview_rect(DropZone::Center).unwrap(), t);
        assert!(overlay.preview_rect(DropZone::Invalid).is_none());
    }
}
