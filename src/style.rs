//! Read-only style snapshot consumed by tab layout and overlay geometry.
//!
//! All metrics are passed in explicitly so the layout calculator stays a
//! pure function; nothing in this crate reads ambient style state.

/// Geometry metrics for tab strips, drop overlays and drag thresholds.
///
/// `default()` mirrors the metrics of the desktop docking system this engine
/// was modelled on; `compact()` is tuned for terminal cells where a single
/// row of text is a whole tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockStyle {
    /// Height of a horizontal tab strip (breadth of a vertical one is
    /// `vertical_tab_breadth`).
    pub tab_height: u16,
    /// Breadth of a vertical (Left/Right) tab strip.
    pub vertical_tab_breadth: u16,
    /// Padding on each side of a tab title.
    pub tab_padding: u16,
    /// Gap between adjacent tabs.
    pub tab_spacing: u16,
    /// Floor for a single tab's main-axis extent.
    pub min_tab_width: u16,
    /// Width of one title character in layout units.
    pub char_width: u16,
    /// Square size of per-tab and chrome buttons.
    pub button_size: u16,
    /// Margin between a title and its trailing button.
    pub content_margin: u16,
    /// Main-axis extent of the overflow button.
    pub overflow_button_size: u16,
    /// Leading inset of the first tab along the strip.
    pub strip_inset_main: u16,
    /// Cross-axis inset of the strip from the area edge.
    pub strip_inset_cross: u16,
    /// Square size of one drop-zone indicator.
    pub drop_size: u16,
    /// Extra gap between the center indicator and the side indicators in
    /// area-overlay mode.
    pub indicator_gap: u16,
    /// Edge margin of the side indicators in container-overlay mode.
    pub overlay_margin: u16,
    /// Pointer travel required before a press becomes a drag.
    pub drag_start_distance: u16,
    /// Half-extent of the inflated tab box the pointer must stay inside
    /// while the travel threshold is being met.
    pub drag_tolerance: u16,
    /// Smallest main-axis size a pane may be resized to.
    pub min_pane_size: u16,
    /// Two presses on the same tab within this window float it.
    pub double_click_ms: u64,
}

impl Default for DockStyle {
    fn default() -> Self {
        Self {
            tab_height: 30,
            vertical_tab_breadth: 30,
            tab_padding: 8,
            tab_spacing: 4,
            min_tab_width: 60,
            char_width: 7,
            button_size: 16,
            content_margin: 4,
            overflow_button_size: 20,
            strip_inset_main: 5,
            strip_inset_cross: 4,
            drop_size: 32,
            indicator_gap: 12,
            overlay_margin: 8,
            drag_start_distance: 12,
            drag_tolerance: 10,
            min_pane_size: 40,
            double_click_ms: 500,
        }
    }
}

impl DockStyle {
    /// Terminal-cell metrics: one-row strips, single-cell buttons, short
    /// drag thresholds.
    pub fn compact() -> Self {
        Self {
            tab_height: 1,
            vertical_tab_breadth: 3,
            tab_padding: 1,
            tab_spacing: 1,
            min_tab_width: 6,
            char_width: 1,
            button_size: 1,
            content_margin: 1,
            overflow_button_size: 2,
            strip_inset_main: 1,
            strip_inset_cross: 0,
            drop_size: 3,
            indicator_gap: 2,
            overlay_margin: 1,
            drag_start_distance: 2,
            drag_tolerance: 3,
            min_pane_size: 4,
            double_click_ms: 500,
        }
    }
}
