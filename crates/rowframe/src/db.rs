use crate::Chunks;

use rowframe_core::{
    driver::{operation::Labels, Driver, Operation},
    schema::ModelId,
    stmt::{Query, Value, ValueRecord},
    Error, Result, Schema,
};
use std::{collections::HashMap, sync::Arc};

/// A schema paired with the driver that stores its records.
///
/// Cloning is cheap; clones share the schema and the driver.
#[derive(Debug, Clone)]
pub struct Db {
    schema: Arc<Schema>,
    driver: Arc<dyn Driver>,
}

impl Db {
    pub fn new(schema: Arc<Schema>, driver: impl Driver) -> Self {
        Self {
            schema,
            driver: Arc::new(driver),
        }
    }

    pub fn from_arc(schema: Arc<Schema>, driver: Arc<dyn Driver>) -> Self {
        Self { schema, driver }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Runs a query, materializing every row it returns.
    pub async fn query(&self, query: Query) -> Result<Vec<ValueRecord>> {
        let response = self
            .driver
            .exec(&self.schema, Operation::Query(query))
            .await?;
        Ok(response.into_rows())
    }

    /// Streams the rows of `query` page by page. See [`Chunks`].
    pub fn chunks(&self, query: Query) -> Chunks {
        Chunks::new(self.clone(), query)
    }

    /// Fetches the display string of each record of `model` keyed by `keys`.
    pub async fn labels(&self, model: ModelId, keys: Vec<Value>) -> Result<HashMap<Value, String>> {
        let response = self
            .driver
            .exec(&self.schema, Operation::Labels(Labels { model, keys }))
            .await?;

        let mut labels = HashMap::with_capacity(response.len());

        for row in response.into_rows() {
            match row.into_vec().as_mut_slice() {
                [key, Value::String(label)] => {
                    labels.insert(std::mem::take(key), std::mem::take(label));
                }
                row => {
                    return Err(Error::invalid_result(format!(
                        "expected (key, label) row, got {} values",
                        row.len()
                    )))
                }
            }
        }

        Ok(labels)
    }
}
