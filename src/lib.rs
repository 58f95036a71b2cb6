//! A drag-and-drop docking panel manager for terminal applications.
//!
//! The engine arranges panels ("dock widgets") into tabbed groups ("dock
//! areas") that can be split, merged, floated and rearranged with the
//! mouse. [`manager::DockManager`] owns the whole structure and consumes
//! raw crossterm events; [`render`] draws the chrome into a ratatui frame.
//!
//! ```no_run
//! use dock_wm::manager::DockManager;
//! use dock_wm::style::DockStyle;
//! use dock_wm::tree::InsertPosition;
//! use dock_wm::widget::DockWidget;
//!
//! let mut docks = DockManager::new(DockStyle::compact());
//! let (_, area) = docks.add_widget_at_edge(DockWidget::new("files"), InsertPosition::Left);
//! docks.add_widget_to_area(DockWidget::new("search"), area).unwrap();
//! ```

pub mod area;
pub mod drag;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod manager;
pub mod overlay;
pub mod render;
pub mod style;
pub mod tabs;
pub mod theme;
pub mod tracing_sub;
pub mod tree;
pub mod widget;
