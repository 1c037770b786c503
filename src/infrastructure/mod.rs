// Infrastructure layer - Configuration and data source adapters
pub mod cached_repository;
pub mod config;
pub mod json_repository;
