pub mod app;
pub mod form;
pub mod results;

pub use app::{App, Message};
pub use results::{render_connectivity, render_error, render_results, PredictionReport};
