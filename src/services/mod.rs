pub mod alerts;
pub mod conditions;
pub mod geo;
pub mod gpx;
pub mod reading;
pub mod recommendation;
pub mod region;
pub mod stats;
pub mod thresholds;
pub mod trips;
pub mod weather;
