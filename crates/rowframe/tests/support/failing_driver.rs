use rowframe::{
    driver::{Driver, Operation, Response},
    Error, Result, Schema,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Forwards to another driver until the `fail_at`-th query (counting from 1),
/// which fails with a driver error instead.
#[derive(Debug)]
pub struct FailingDriver {
    inner: Box<dyn Driver>,
    fail_at: usize,
    queries: AtomicUsize,
}

impl FailingDriver {
    pub fn new(driver: impl Driver, fail_at: usize) -> Self {
        Self {
            inner: Box::new(driver),
            fail_at,
            queries: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Driver for FailingDriver {
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        if op.is_query() && self.queries.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_at {
            return Err(Error::driver(std::io::Error::other("connection reset")));
        }

        self.inner.exec(schema, op).await
    }
}
