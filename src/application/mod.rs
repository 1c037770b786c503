// Application layer - Analysis pipeline and use cases
pub mod device_analyzer;
pub mod fleet_service;
pub mod health_classifier;
pub mod reading_repository;
pub mod school_aggregator;
pub mod segment_extractor;
pub mod usage_rate;
