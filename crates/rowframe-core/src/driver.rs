pub mod operation;
pub use operation::Operation;

mod response;
pub use response::Response;

use crate::{async_trait, Schema};

use std::{fmt::Debug, sync::Arc};

/// The store a frame is read from.
///
/// Each call executes exactly one operation; the reader issues them strictly
/// one after another and never retries a failed call.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Execute a database operation
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response>;
}
