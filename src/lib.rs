// Battery health analysis for school device fleets
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
