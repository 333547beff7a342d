mod builder;
pub use builder::{Builder, ModelBuilder};

mod field;
pub use field::{Choice, Field, FieldId, FieldName, FieldPrimitive, FieldTy};

mod model;
pub use model::{Model, ModelId};

mod name;
pub use name::Name;

mod relation;
pub use relation::{BelongsTo, HasMany, HasOne, ManyToMany, ReverseRelation};

mod resolve;
pub use resolve::{FieldKind, ResolvedField};

use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    /// Get a field by ID
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model)
            .fields
            .get(id.index)
            .expect("invalid field ID")
    }

    /// Relations declared on *other* models that point at `model`.
    ///
    /// These are the accessors a model gains without declaring them: one per
    /// `BelongsTo` or `ManyToMany` field targeting it.
    pub fn reverse_relations(&self, model: ModelId) -> impl Iterator<Item = ReverseRelation<'_>> {
        self.models().flat_map(move |owner| {
            owner.fields.iter().filter_map(move |field| {
                let kind = match &field.ty {
                    FieldTy::BelongsTo(rel) if rel.target == model && rel.unique => {
                        FieldKind::ReverseToOne
                    }
                    FieldTy::BelongsTo(rel) if rel.target == model => FieldKind::ReverseToMany,
                    FieldTy::ManyToMany(rel) if rel.target == model => FieldKind::ReverseToMany,
                    _ => return None,
                };

                Some(ReverseRelation {
                    accessor: self.reverse_accessor_name(field),
                    field,
                    kind,
                })
            })
        })
    }

    /// Name of the accessor `field` exposes on the model it points at.
    ///
    /// An explicit `related_name` wins, then the name of a declared `HasMany`
    /// or `HasOne` pair, then `<model>_set` (or `<model>` for one-to-one keys).
    pub fn reverse_accessor_name(&self, field: &Field) -> String {
        let owner = self.model(field.id.model).name.snake_case();

        match &field.ty {
            FieldTy::BelongsTo(rel) => {
                if let Some(name) = &rel.related_name {
                    name.clone()
                } else if let Some(pair) = rel.pair {
                    self.field(pair).name.app_name.clone()
                } else if rel.unique {
                    owner
                } else {
                    format!("{owner}_set")
                }
            }
            FieldTy::ManyToMany(rel) => match &rel.related_name {
                Some(name) => name.clone(),
                None => format!("{owner}_set"),
            },
            _ => field.name.app_name.clone(),
        }
    }
}
