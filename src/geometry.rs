//! Shared geometry primitives: screen-space hit testing and the signed
//! floating rectangle used by windows that may be dragged off-screen.

use ratatui::prelude::Rect;
use std::collections::BTreeMap;

/// Signed floating rectangle origin with unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x as i32,
            y: rect.y as i32,
            width: rect.width,
            height: rect.height,
        }
    }

    /// Clamp the signed rect to non-negative coordinates for buffer drawing.
    /// Cells left of or above the origin are simply not visible.
    pub fn to_rect(self) -> Rect {
        Rect {
            x: self.x.max(0) as u16,
            y: self.y.max(0) as u16,
            width: self.width,
            height: self.height,
        }
    }

    pub fn contains(self, column: u16, row: u16) -> bool {
        let c = column as i32;
        let r = row as i32;
        c >= self.x
            && c < self.x + self.width as i32
            && r >= self.y
            && r < self.y + self.height as i32
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// Grow a rect by `dx`/`dy` on every side, saturating at the buffer origin.
pub fn inflate(rect: Rect, dx: u16, dy: u16) -> Rect {
    let x = rect.x.saturating_sub(dx);
    let y = rect.y.saturating_sub(dy);
    Rect {
        x,
        y,
        width: rect
            .width
            .saturating_add(rect.x.saturating_sub(x))
            .saturating_add(dx),
        height: rect
            .height
            .saturating_add(rect.y.saturating_sub(y))
            .saturating_add(dy),
    }
}

pub fn rect_center(rect: Rect) -> (u16, u16) {
    (
        rect.x.saturating_add(rect.width / 2),
        rect.y.saturating_add(rect.height / 2),
    )
}

#[derive(Debug, Clone)]
pub struct RegionMap<T: Copy + Eq + Ord> {
    regions: BTreeMap<T, Rect>,
}

impl<T: Copy + Eq + Ord> Default for RegionMap<T> {
    fn default() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }
}

impl<T: Copy + Eq + Ord> RegionMap<T> {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn ids(&self) -> Vec<T> {
        self.regions.keys().copied().collect()
    }

    pub fn set(&mut self, id: T, rect: Rect) {
        self.regions.insert(id, rect);
    }

    pub fn remove(&mut self, id: T) {
        self.regions.remove(&id);
    }

    pub fn get(&self, id: T) -> Option<Rect> {
        self.regions.get(&id).copied()
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<T> {
        self.regions
            .iter()
            .find(|(_, rect)| rect_contains(**rect, column, row))
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_excludes_empty_and_far_edge() {
        let r = Rect {
            x: 1,
            y: 1,
            width: 3,
            height: 3,
        };
        assert!(rect_contains(r, 1, 1));
        assert!(rect_contains(r, 3, 3));
        assert!(!rect_contains(r, 4, 1));
        let empty = Rect {
            x: 0,
            y: 0,
            width: 0,
            height: 5,
        };
        assert!(!rect_contains(empty, 0, 0));
    }

    #[test]
    fn inflate_saturates_at_origin() {
        let r = Rect {
            x: 1,
            y: 0,
            width: 4,
            height: 2,
        };
        let grown = inflate(r, 3, 2);
        assert_eq!(grown.x, 0);
        assert_eq!(grown.y, 0);
        // one column absorbed on the left, full growth on the right
        assert_eq!(grown.width, 4 + 1 + 3);
        assert_eq!(grown.height, 2 + 0 + 2);
    }

    #[test]
    fn float_rect_contains_handles_negative_origin() {
        let fr = FloatRect {
            x: -3,
            y: -1,
            width: 6,
            height: 4,
        };
        assert!(fr.contains(0, 0));
        assert!(fr.contains(2, 2));
        assert!(!fr.contains(3, 0));
        assert_eq!(fr.to_rect().x, 0);
    }

    #[test]
    fn region_map_set_get_hit_test() {
        let mut map = RegionMap::default();
        let a = Rect {
            x: 0,
            y: 0,
            width: 5,
            height: 5,
        };
        let b = Rect {
            x: 6,
            y: 0,
            width: 5,
            height: 5,
        };
        map.set(1u8, a);
        map.set(2u8, b);
        assert_eq!(map.get(1u8), Some(a));
        assert_eq!(map.hit_test(2, 2), Some(1u8));
        assert_eq!(map.hit_test(7, 1), Some(2u8));
        assert_eq!(map.hit_test(100, 100), None);
        map.remove(1u8);
        assert_eq!(map.hit_test(2, 2), None);
    }
}
