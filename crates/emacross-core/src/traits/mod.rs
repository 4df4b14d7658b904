//! Core traits for the crossover engine.

mod data_source;
mod indicator;

pub use data_source::DataSource;
pub use indicator::{BarIndicator, Indicator, MultiOutputIndicator, StreamingIndicator};
