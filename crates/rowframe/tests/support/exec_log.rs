use rowframe::{
    driver::{operation::Labels, Operation},
    stmt::Query,
};
use std::sync::{Arc, Mutex};

/// Operations recorded by a [`LoggingDriver`](super::LoggingDriver), in
/// execution order.
#[derive(Debug, Clone, Default)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<Operation>>>,
}

impl ExecLog {
    pub(super) fn push(&self, op: Operation) {
        self.ops.lock().unwrap().push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn queries(&self) -> Vec<Query> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                Operation::Query(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<Labels> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                Operation::Labels(labels) => Some(labels.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }
}
