//! Downloadable prediction report

pub mod pdf;
pub mod token;

pub use pdf::{render_pdf, ReportError, REPORT_FILENAME};
pub use token::{ReportSigner, TokenError};
