use super::ExecLog;

use rowframe::{
    driver::{Driver, Operation, Response},
    Result, Schema,
};
use std::sync::Arc;

/// Forwards to another driver, recording every operation it is asked to run.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,
    log: ExecLog,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            log: ExecLog::default(),
        }
    }

    /// Get a handle to the operations log
    pub fn log(&self) -> ExecLog {
        self.log.clone()
    }
}

#[async_trait::async_trait]
impl Driver for LoggingDriver {
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        self.log.push(op.clone());
        self.inner.exec(schema, op).await
    }
}
