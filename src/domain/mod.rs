// Domain layer - Battery telemetry models and analysis errors
pub mod device;
pub mod error;
pub mod reading;
pub mod school;
pub mod segment;
