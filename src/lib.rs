//! Client for the ultra-detailed market-analysis backend: submits form
//! input, simulates progress while the long-running call is in flight,
//! renders the returned report section by section, and exposes the
//! extraction diagnostics and PDF export.

pub mod backend;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod notify;
pub mod progress;
pub mod render;
pub mod report;
pub mod state;
