//! Nagios-style health check for HP Smart Array controllers.
//!
//! Parses the indented report printed by `hpacucli ctrl all show config`
//! into a controller → array → drive forest and reduces every drive status
//! to one plugin severity.

pub mod alerts;
pub mod collectors;
pub mod config;
pub mod error;
pub mod models;
pub mod util;

pub use alerts::{Alert, Severity};
pub use collectors::hpacucli::parse_report;
pub use config::Config;
pub use error::{ParseError, ReportError};
pub use models::raid::Controller;
