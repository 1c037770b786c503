// Presentation layer - Rendering of analysis results
pub mod report;
