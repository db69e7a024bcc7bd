use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Persistence contract shared by every content section.
///
/// Each implementation owns exactly one table. Only live rows
/// (`deleted_at IS NULL`) are ever visible through it.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Display shape returned by reads.
    type Record: Send;
    /// Mutable fields accepted by writes.
    type Input: Send;

    async fn create(&self, input: Self::Input) -> AppResult<()>;

    /// Newest `created_at` first.
    async fn fetch_all(&self) -> AppResult<Vec<Self::Record>>;

    async fn fetch_by_id(&self, id: i64) -> AppResult<Self::Record>;

    /// Overwrites all mutable fields of a live row and bumps `updated_at`.
    async fn edit_by_id(&self, id: i64, input: Self::Input) -> AppResult<()>;

    /// Soft delete. A row that is already gone yields `NotFound`.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    /// Live children of one parent row.
    async fn fetch_by_parent(&self, _parent_id: i64) -> AppResult<Vec<Self::Record>> {
        Err(AppError::Unimplemented("fetch by parent"))
    }
}
