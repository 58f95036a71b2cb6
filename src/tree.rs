//! Splitter tree for the docked region of the container.
//!
//! Leaves are dock areas; splits carry per-child weights. Layout leaves a
//! one-cell gutter between siblings which doubles as the grab handle for
//! interactive resizing.

use ratatui::prelude::{Direction, Rect};

use crate::geometry::rect_contains;

/// Gutter between siblings of a resizable split.
pub const HANDLE_THICKNESS: u16 = 1;

/// Where a new leaf lands relative to an existing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Left,
    Right,
    Top,
    Bottom,
}

impl InsertPosition {
    fn direction(self) -> Direction {
        match self {
            InsertPosition::Left | InsertPosition::Right => Direction::Horizontal,
            InsertPosition::Top | InsertPosition::Bottom => Direction::Vertical,
        }
    }

    fn leading(self) -> bool {
        matches!(self, InsertPosition::Left | InsertPosition::Top)
    }
}

#[derive(Debug, Clone)]
pub enum LayoutNode<Id: Copy + Eq + Ord> {
    Leaf(Id),
    Split {
        direction: Direction,
        children: Vec<LayoutNode<Id>>,
        weights: Vec<f32>,
    },
}

/// Grab handle between two split children. `path` addresses the split node
/// from the root, `index` the child pair it separates.
#[derive(Debug, Clone)]
pub struct SplitHandle {
    pub rect: Rect,
    pub path: Vec<usize>,
    pub index: usize,
    pub direction: Direction,
}

impl<Id: Copy + Eq + Ord> LayoutNode<Id> {
    pub fn leaf(id: Id) -> Self {
        Self::Leaf(id)
    }

    pub fn unwrap_leaf(&self) -> Option<Id> {
        match self {
            LayoutNode::Leaf(id) => Some(*id),
            _ => None,
        }
    }

    pub fn leaf_ids(&self) -> Vec<Id> {
        let mut ids = Vec::new();
        self.collect_leaves(&mut ids);
        ids
    }

    fn collect_leaves(&self, out: &mut Vec<Id>) {
        match self {
            LayoutNode::Leaf(id) => out.push(*id),
            LayoutNode::Split { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    pub fn contains_leaf(&self, id: Id) -> bool {
        match self {
            LayoutNode::Leaf(leaf) => *leaf == id,
            LayoutNode::Split { children, .. } => {
                children.iter().any(|child| child.contains_leaf(id))
            }
        }
    }

    pub fn layout(&self, area: Rect) -> Vec<(Id, Rect)> {
        self.layout_with_handles(area).0
    }

    pub fn layout_with_handles(&self, area: Rect) -> (Vec<(Id, Rect)>, Vec<SplitHandle>) {
        let mut regions = Vec::new();
        let mut handles = Vec::new();
        self.layout_recursive(area, &mut regions, &mut handles, &mut Vec::new());
        (regions, handles)
    }

    fn layout_recursive(
        &self,
        area: Rect,
        regions: &mut Vec<(Id, Rect)>,
        handles: &mut Vec<SplitHandle>,
        path: &mut Vec<usize>,
    ) {
        match self {
            LayoutNode::Leaf(id) => regions.push((*id, area)),
            LayoutNode::Split {
                direction,
                children,
                weights,
            } => {
                let (rects, gaps) = split_rects(*direction, area, weights, children.len());
                for (index, (child, rect)) in
                    children.iter().zip(rects.iter().copied()).enumerate()
                {
                    path.push(index);
                    child.layout_recursive(rect, regions, handles, path);
                    path.pop();
                }
                for (index, rect) in gaps.into_iter().enumerate() {
                    handles.push(SplitHandle {
                        rect,
                        path: path.clone(),
                        index,
                        direction: *direction,
                    });
                }
            }
        }
    }

    /// Split the leaf holding `target` and place `insert` on the given side
    /// with equal weight. Returns false if `target` is not in the subtree.
    pub fn insert_leaf(&mut self, target: Id, insert: Id, position: InsertPosition) -> bool {
        match self {
            LayoutNode::Leaf(current) => {
                if *current != target {
                    return false;
                }
                let existing = LayoutNode::leaf(*current);
                let inserted = LayoutNode::leaf(insert);
                let children = if position.leading() {
                    vec![inserted, existing]
                } else {
                    vec![existing, inserted]
                };
                *self = LayoutNode::Split {
                    direction: position.direction(),
                    children,
                    weights: vec![1.0, 1.0],
                };
                true
            }
            LayoutNode::Split { children, .. } => children
                .iter_mut()
                .any(|child| child.insert_leaf(target, insert, position)),
        }
    }

    /// Remove the leaf holding `id`, collapsing single-child and empty
    /// splits on the way out.
    pub fn remove_leaf(&mut self, id: Id) -> bool {
        let LayoutNode::Split {
            children, weights, ..
        } = self
        else {
            return false;
        };
        let mut removed = false;
        let mut index = 0;
        while index < children.len() {
            let is_target = children[index].unwrap_leaf() == Some(id);
            if is_target {
                children.remove(index);
                if index < weights.len() {
                    weights.remove(index);
                }
                removed = true;
                break;
            }
            if children[index].remove_leaf(id) {
                removed = true;
                let emptied = matches!(
                    &children[index],
                    LayoutNode::Split { children: c, .. } if c.is_empty()
                );
                if emptied {
                    children.remove(index);
                    if index < weights.len() {
                        weights.remove(index);
                    }
                }
                break;
            }
            index += 1;
        }
        if removed && children.len() == 1 {
            *self = children.remove(0);
        }
        removed
    }

    /// Drag the handle at `path`/`index` by `delta` cells along `direction`,
    /// redistributing the two adjacent weights. Panes never shrink below
    /// `min_pane`.
    pub fn apply_handle_drag(
        &mut self,
        area: Rect,
        handle: &SplitHandle,
        delta: i16,
        min_pane: u16,
    ) -> bool {
        let Some(split_area) = area_at_path(self, area, &handle.path) else {
            return false;
        };
        let Some(node) = node_at_path_mut(self, &handle.path) else {
            return false;
        };
        let LayoutNode::Split {
            direction,
            children,
            weights,
        } = node
        else {
            return false;
        };
        if *direction != handle.direction
            || children.len() < 2
            || handle.index + 1 >= children.len()
        {
            return false;
        }
        let (rects, _) = split_rects(*direction, split_area, weights, children.len());
        let mut sizes: Vec<i16> = rects
            .iter()
            .map(|rect| match direction {
                Direction::Horizontal => rect.width as i16,
                Direction::Vertical => rect.height as i16,
            })
            .collect();
        let min = min_pane.max(1) as i16;
        let pair = sizes[handle.index] + sizes[handle.index + 1];
        let max_first = (pair - min).max(min);
        let first = (sizes[handle.index] + delta).clamp(min, max_first);
        sizes[handle.index] = first;
        sizes[handle.index + 1] = pair - first;
        *weights = sizes.iter().map(|size| (*size).max(1) as f32).collect();
        true
    }

    /// Wrap the whole tree in a new split with `insert` on the given side.
    pub fn split_root(&mut self, insert: Id, position: InsertPosition) {
        let existing = self.clone();
        let inserted = LayoutNode::leaf(insert);
        let children = if position.leading() {
            vec![inserted, existing]
        } else {
            vec![existing, inserted]
        };
        *self = LayoutNode::Split {
            direction: position.direction(),
            children,
            weights: vec![1.0, 1.0],
        };
    }

    pub fn hit_test_handle(&self, area: Rect, column: u16, row: u16) -> Option<SplitHandle> {
        let (_, handles) = self.layout_with_handles(area);
        handles
            .into_iter()
            .find(|handle| rect_contains(handle.rect, column, row))
    }
}

fn split_rects(
    direction: Direction,
    area: Rect,
    weights: &[f32],
    child_count: usize,
) -> (Vec<Rect>, Vec<Rect>) {
    let count = child_count.max(1);
    let total = match direction {
        Direction::Horizontal => area.width,
        Direction::Vertical => area.height,
    };
    let gap = if count >= 2 && total > count as u16 * 2 {
        HANDLE_THICKNESS
    } else {
        0
    };
    let gap_total = gap.saturating_mul(count.saturating_sub(1) as u16);
    let usable = total.saturating_sub(gap_total);

    let weights: Vec<f32> = if weights.len() == count && weights.iter().any(|w| *w > 0.0) {
        weights.to_vec()
    } else {
        vec![1.0; count]
    };
    let weight_sum: f32 = weights.iter().sum::<f32>().max(1.0);

    let mut sizes = Vec::with_capacity(count);
    let mut used = 0u16;
    for (index, weight) in weights.iter().enumerate() {
        let size = if index + 1 == count {
            usable.saturating_sub(used)
        } else {
            let portion = ((*weight / weight_sum) * usable as f32).floor() as u16;
            used = used.saturating_add(portion);
            portion
        };
        sizes.push(size);
    }

    let mut rects = Vec::with_capacity(count);
    let mut gaps = Vec::with_capacity(count.saturating_sub(1));
    let mut cursor = match direction {
        Direction::Horizontal => area.x,
        Direction::Vertical => area.y,
    };
    for (index, size) in sizes.iter().enumerate() {
        let rect = match direction {
            Direction::Horizontal => Rect {
                x: cursor,
                y: area.y,
                width: *size,
                height: area.height,
            },
            Direction::Vertical => Rect {
                x: area.x,
                y: cursor,
                width: area.width,
                height: *size,
            },
        };
        cursor = cursor.saturating_add(*size);
        if index + 1 < count && gap > 0 {
            let gap_rect = match direction {
                Direction::Horizontal => Rect {
                    x: cursor,
                    y: area.y,
                    width: gap,
                    height: area.height,
                },
                Direction::Vertical => Rect {
                    x: area.x,
                    y: cursor,
                    width: area.width,
                    height: gap,
                },
            };
            gaps.push(gap_rect);
            cursor = cursor.saturating_add(gap);
        }
        rects.push(rect);
    }
    (rects, gaps)
}

fn area_at_path<Id: Copy + Eq + Ord>(
    node: &LayoutNode<Id>,
    area: Rect,
    path: &[usize],
) -> Option<Rect> {
    let mut area = area;
    let mut current = node;
    for &index in path {
        let LayoutNode::Split {
            direction,
            children,
            weights,
        } = current
        else {
            return None;
        };
        let (rects, _) = split_rects(*direction, area, weights, children.len());
        area = *rects.get(index)?;
        current = children.get(index)?;
    }
    Some(area)
}

fn node_at_path_mut<'a, Id: Copy + Eq + Ord>(
    node: &'a mut LayoutNode<Id>,
    path: &[usize],
) -> Option<&'a mut LayoutNode<Id>> {
    let mut current = node;
    for &index in path {
        let LayoutNode::Split { children, .. } = current else {
            return None;
        };
        current = children.get_mut(index)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: 81,
            height: 41,
        }
    }

    #[test]
    fn insert_leaf_splits_the_target() {
        let mut node: LayoutNode<u8> = LayoutNode::leaf(1);
        assert!(node.insert_leaf(1, 2, InsertPosition::Right));
        let LayoutNode::Split {
            direction,
            children,
            ..
        } = &node
        else {
            panic!("expected split after insert");
        };
        assert_eq!(*direction, Direction::Horizontal);
        assert_eq!(children[0].unwrap_leaf(), Some(1));
        assert_eq!(children[1].unwrap_leaf(), Some(2));
    }

    #[test]
    fn insert_leading_positions_come_first() {
        let mut node: LayoutNode<u8> = LayoutNode::leaf(1);
        assert!(node.insert_leaf(1, 2, InsertPosition::Top));
        let regions = node.layout(area());
        let top = regions.iter().find(|(id, _)| *id == 2).unwrap().1;
        let bottom = regions.iter().find(|(id, _)| *id == 1).unwrap().1;
        assert!(top.y < bottom.y);
    }

    #[test]
    fn remove_leaf_collapses_single_child_split() {
        let mut node: LayoutNode<u8> = LayoutNode::leaf(1);
        node.insert_leaf(1, 2, InsertPosition::Right);
        node.insert_leaf(2, 3, InsertPosition::Bottom);
        assert!(node.remove_leaf(3));
        assert!(node.remove_leaf(2));
        assert_eq!(node.unwrap_leaf(), Some(1));
    }

    #[test]
    fn layout_covers_area_with_gutters() {
        let mut node: LayoutNode<u8> = LayoutNode::leaf(1);
        node.insert_leaf(1, 2, InsertPosition::Right);
        let (regions, handles) = node.layout_with_handles(area());
        assert_eq!(regions.len(), 2);
        assert_eq!(handles.len(), 1);
        let widths: u16 = regions.iter().map(|(_, r)| r.width).sum();
        assert_eq!(widths + HANDLE_THICKNESS, area().width);
        // handle sits exactly between the two panes
        let left = regions.iter().find(|(id, _)| *id == 1).unwrap().1;
        assert_eq!(handles[0].rect.x, left.x + left.width);
    }

    #[test]
    fn handle_drag_resizes_with_min_pane_floor() {
        let mut node: LayoutNode<u8> = LayoutNode::leaf(1);
        node.insert_leaf(1, 2, InsertPosition::Right);
        let handle = node.hit_test_handle(area(), 40, 5).expect("handle");
        assert!(node.apply_handle_drag(area(), &handle, 10, 4));
        let regions = node.layout(area());
        let left = regions.iter().find(|(id, _)| *id == 1).unwrap().1;
        let right = regions.iter().find(|(id, _)| *id == 2).unwrap().1;
        assert!(left.width > right.width);

        // a huge drag clamps at the minimum pane size
        assert!(node.apply_handle_drag(area(), &handle, 500, 4));
        let regions = node.layout(area());
        let right = regions.iter().find(|(id, _)| *id == 2).unwrap().1;
        assert_eq!(right.width, 4);
    }

    #[test]
    fn split_root_wraps_existing_tree() {
        let mut node: LayoutNode<u8> = LayoutNode::leaf(1);
        node.insert_leaf(1, 2, InsertPosition::Right);
        node.split_root(3, InsertPosition::Bottom);
        let regions = node.layout(area());
        assert_eq!(regions.len(), 3);
        let three = regions.iter().find(|(id, _)| *id == 3).unwrap().1;
        assert!(regions
            .iter()
            .filter(|(id, _)| *id != 3)
            .all(|(_, r)| r.y < three.y));
        assert_eq!(node.leaf_ids(), vec![1, 2, 3]);
    }
}
