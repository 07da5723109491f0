pub mod fetch;
pub mod geo;
pub mod plot;
pub mod stats;
