use crate::schema::{FieldId, ModelId, Schema};

/// A chain of field hops starting at a query's root model.
///
/// Each step names a field on the model reached so far. A step naming a field
/// that lives on a *different* model is a reverse hop: it follows that model's
/// `BelongsTo` or `ManyToMany` back to the current model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub root: ModelId,
    pub steps: Vec<FieldId>,
}

impl Path {
    pub fn new(root: ModelId, steps: Vec<FieldId>) -> Self {
        Self { root, steps }
    }

    /// A single-hop path to a field of `root`.
    pub fn field(field: FieldId) -> Self {
        Self {
            root: field.model,
            steps: vec![field],
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The last hop of the path.
    pub fn last(&self) -> Option<FieldId> {
        self.steps.last().copied()
    }

    /// Rebuilds the dotted name (`author__country__name`) of this path.
    ///
    /// Forward hops use the field name; reverse hops use the accessor name the
    /// relation exposes on the model it is traversed from.
    pub fn display(&self, schema: &Schema) -> String {
        let mut model = self.root;
        let mut parts = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let field = schema.field(*step);

            if step.model == model {
                parts.push(field.name.app_name.clone());
                if let Some(target) = field.relation_target_id() {
                    model = target;
                }
            } else {
                parts.push(schema.reverse_accessor_name(field));
                model = step.model;
            }
        }

        parts.join("__")
    }
}
