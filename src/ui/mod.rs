//! Terminal user interface: form, result regions, copy controls.

mod app;
mod form;
mod results;
mod run;
mod view;

pub use results::{RegionId, ResultPanel};
pub use run::run_tui;
