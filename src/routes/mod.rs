pub mod alerts;
pub mod conditions;
pub mod health;
pub mod regions;
pub mod stats;
pub mod trips;
