use crate::area::AreaId;
use crate::widget::WidgetId;
use thiserror::Error;

/// Errors surfaced by fallible structural operations on the dock manager.
///
/// Drag-protocol failures are recovered internally (a drop that cannot land
/// restores or floats the widget) and never show up here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DockError {
    #[error("unknown dock area {0:?}")]
    UnknownArea(AreaId),
    #[error("unknown dock widget {0:?}")]
    UnknownWidget(WidgetId),
    #[error("widget {0:?} is not docked in any area")]
    WidgetNotDocked(WidgetId),
    #[error("widget {0:?} is locked in place")]
    WidgetLocked(WidgetId),
    #[error("tab index {index} out of range for area {area:?}")]
    TabIndexOutOfRange { area: AreaId, index: usize },
}
