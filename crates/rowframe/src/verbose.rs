use crate::{Db, Frame};

use rowframe_core::{
    schema::{Choice, FieldKind, ModelId, ResolvedField},
    stmt::Value,
    Result,
};
use std::collections::HashSet;

/// How the values of one column are replaced by display labels.
#[derive(Debug, Clone)]
pub(crate) enum Labels {
    /// Keys of records of the target model
    Related(ModelId),

    /// Declared choices of a plain field
    Choices(Vec<Choice>),

    Keep,
}

impl Labels {
    pub(crate) fn for_field(resolved: &ResolvedField<'_>) -> Labels {
        match resolved.kind {
            FieldKind::ToOne => match resolved.target() {
                Some(target) => Labels::Related(target),
                None => Labels::Keep,
            },
            FieldKind::Scalar if !resolved.field.choices().is_empty() => {
                Labels::Choices(resolved.field.choices().to_vec())
            }
            _ => Labels::Keep,
        }
    }

    pub(crate) fn is_keep(&self) -> bool {
        matches!(self, Labels::Keep)
    }
}

/// Replaces key and choice values with labels, one entry of `labels` per
/// frame column.
///
/// Each related column costs one label lookup covering its distinct keys.
/// Keys the store has no label for become null.
pub(crate) async fn apply(db: &Db, frame: &mut Frame, labels: &[Labels]) -> Result<()> {
    for (column, labels) in frame.columns_mut().iter_mut().zip(labels) {
        match labels {
            Labels::Related(target) => {
                let keys: Vec<Value> = {
                    let mut seen = HashSet::new();
                    column
                        .iter()
                        .filter(|key| !key.is_null() && seen.insert(*key))
                        .cloned()
                        .collect()
                };

                if keys.is_empty() {
                    continue;
                }

                tracing::debug!(column = column.name(), keys = keys.len(), "looking up labels");
                let found = db.labels(*target, keys).await?;

                for value in column.values_mut() {
                    if value.is_null() {
                        continue;
                    }

                    *value = found
                        .get(&*value)
                        .map(|label| Value::String(label.clone()))
                        .unwrap_or_default();
                }
            }
            Labels::Choices(choices) => {
                for value in column.values_mut() {
                    if let Some(choice) = choices.iter().find(|choice| choice.value == *value) {
                        *value = Value::String(choice.label.clone());
                    }
                }
            }
            Labels::Keep => {}
        }
    }

    Ok(())
}
