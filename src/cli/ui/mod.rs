mod frame_view;
mod painter;
mod pattern_view;
mod progress;
mod status_view;
mod table;

pub(crate) use self::frame_view::{DemoFrameView, DemoSummaryView, EnumerationView, SentFrameView};
pub(crate) use self::painter::Painter;
pub(crate) use self::pattern_view::PatternTableView;
pub(crate) use self::progress::label_current_span;
pub(crate) use self::status_view::{
    DecodeErrorView, ListenReadyView, ListenSummaryView, StatusLineView,
};
