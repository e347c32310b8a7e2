//! FuturesLab View — table and chart rendering of futures data.
//!
//! The display operations (`DisplayContext::display_search`,
//! `display_historical`, `display_curve`) tie together:
//! - Ticker validation against the provider's reference table
//! - A pure table-or-chart decision (`presentation`)
//! - Rendering through a `Console` and a `DrawSurface`
//! - Export of the shown data through an `Exporter`

pub mod console;
pub mod display;
pub mod export;
pub mod instrument;
pub mod presentation;
pub mod surface;
pub mod theme;

pub use console::{Console, Level, StdoutConsole};
pub use display::{
    CurveRequest, DisplayContext, HistoricalRequest, Outcome, SearchRequest, ViewError,
};
pub use export::{ExportError, ExportFormat, Exporter, FileExporter};
pub use presentation::{ChartPlan, Note, Presentation, TableView};
pub use surface::{ChartSurface, DrawSurface, LineSeries, LineStyle, XAxis};
pub use theme::Theme;
