//! Drawing persistence backend interface.

use async_trait::async_trait;
use chartkit_annotations::DrawingRecord;
use chartkit_core::SyncError;

use crate::wire::ShapeProperties;

/// Remote store of drawings, keyed by chart symbol and drawing id.
///
/// Every call is a single request/response; an `error` status surfaces as
/// [`SyncError::Rejected`].
#[async_trait]
pub trait DrawingBackend: Send + Sync {
    async fn delete_drawing(&self, symbol: &str, id: &str) -> Result<(), SyncError>;

    async fn delete_all_drawings(&self, symbol: &str) -> Result<(), SyncError>;

    async fn update_drawing(&self, symbol: &str, id: &str, record: &DrawingRecord) -> Result<(), SyncError>;

    async fn save_shape_properties(
        &self,
        symbol: &str,
        id: &str,
        properties: &ShapeProperties,
    ) -> Result<(), SyncError>;

    async fn get_shape_properties(&self, symbol: &str, id: &str) -> Result<ShapeProperties, SyncError>;
}
