//! On-demand report generation: fetch a persisted product and hand its
//! disclosure data to the rendering collaborator for a shareable byte
//! stream. Nothing is cached or stored; every request regenerates.

pub mod dispatcher;
pub mod renderer;
pub mod router;

pub use dispatcher::{RenderedReport, ReportDispatcher, ReportError, REPORT_CONTENT_TYPE};
pub use renderer::{HttpReportRenderer, ReportContext, ReportRenderer};
pub use router::report_router;
