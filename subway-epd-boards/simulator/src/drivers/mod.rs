mod display;
mod sources;

pub use display::PbmDisplay;
pub use sources::{JsonFileSource, SimulatedTransit, SimulatedWeather};
