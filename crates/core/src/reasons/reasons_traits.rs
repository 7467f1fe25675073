use async_trait::async_trait;

use crate::errors::Result;

use super::{NewReason, Reason};

/// Repository contract for the reason catalog.
#[async_trait]
pub trait ReasonRepositoryTrait: Send + Sync {
    /// All active reasons, ordered by code.
    fn list_active(&self) -> Result<Vec<Reason>>;

    fn find_by_id(&self, reason_id: &str) -> Result<Option<Reason>>;

    /// Insert the given catalog when the store holds no reasons yet.
    /// Returns the number of rows inserted (zero when already seeded).
    async fn ensure_seeded(&self, reasons: Vec<NewReason>) -> Result<usize>;
}
