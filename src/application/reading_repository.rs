// Repository trait for battery reading access
use crate::domain::reading::Reading;
use async_trait::async_trait;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Load the full batch of readings for one analysis run
    async fn load_readings(&self) -> anyhow::Result<Arc<Vec<Reading>>>;
}
