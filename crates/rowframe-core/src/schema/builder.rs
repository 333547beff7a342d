use super::{
    BelongsTo, Choice, Field, FieldId, FieldName, FieldPrimitive, FieldTy, HasMany, HasOne,
    ManyToMany, Model, ModelId, Name, Schema,
};
use crate::{stmt, Error, Result};

use indexmap::IndexMap;
use std::collections::HashSet;

/// Assembles a [`Schema`] from model definitions.
///
/// Models receive their [`ModelId`] when added, so later models can point at
/// earlier ones. `HasMany`/`HasOne` pairs are linked and checked by
/// [`Builder::build`].
#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<ModelBuilder>,
}

/// Definition of one model, built with chained calls.
///
/// Modifiers such as [`nullable`](Self::nullable) or
/// [`related_name`](Self::related_name) apply to the most recently added field.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    fields: Vec<FieldDef>,
    errors: Vec<String>,
}

#[derive(Debug, Clone)]
struct FieldDef {
    name: String,
    ty: FieldDefTy,
    nullable: bool,
    primary_key: bool,
}

#[derive(Debug, Clone)]
enum FieldDefTy {
    Primitive {
        ty: stmt::Type,
        choices: Vec<Choice>,
    },
    BelongsTo {
        target: ModelId,
        unique: bool,
        related_name: Option<String>,
    },
    ManyToMany {
        target: ModelId,
        related_name: Option<String>,
    },
    HasMany {
        target: ModelId,
        pair: String,
    },
    HasOne {
        target: ModelId,
        pair: String,
    },
}

impl Builder {
    /// Adds a model, returning the id it will have in the built schema.
    pub fn model(&mut self, model: ModelBuilder) -> ModelId {
        let id = ModelId(self.models.len());
        self.models.push(model);
        id
    }

    pub fn build(self) -> Result<Schema> {
        let mut models = IndexMap::with_capacity(self.models.len());

        for (index, def) in self.models.iter().enumerate() {
            let model = self.build_model(ModelId(index), def)?;
            models.insert(model.id, model);
        }

        let mut schema = Schema { models };
        link_pairs(&mut schema, &self.models)?;
        verify_reverse_accessors(&schema)?;

        Ok(schema)
    }

    fn build_model(&self, id: ModelId, def: &ModelBuilder) -> Result<Model> {
        if let Some(message) = def.errors.first() {
            return Err(Error::invalid_schema(format!("model `{}`: {message}", def.name)));
        }

        let mut seen = HashSet::new();
        let mut primary_key = None;
        let mut fields = Vec::with_capacity(def.fields.len());

        for (index, field) in def.fields.iter().enumerate() {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "model `{}` declares field `{}` twice",
                    def.name, field.name
                )));
            }

            if field.primary_key {
                if primary_key.is_some() {
                    return Err(Error::invalid_schema(format!(
                        "model `{}` declares more than one primary key field; composite keys are not supported",
                        def.name
                    )));
                }
                primary_key = Some(id.field(index));
            }

            let ty = match &field.ty {
                FieldDefTy::Primitive { ty, choices } => FieldTy::Primitive(FieldPrimitive {
                    ty: *ty,
                    choices: choices.clone(),
                }),
                FieldDefTy::BelongsTo {
                    target,
                    unique,
                    related_name,
                } => FieldTy::BelongsTo(BelongsTo {
                    target: self.check_target(def, field, *target)?,
                    unique: *unique,
                    related_name: related_name.clone(),
                    pair: None,
                }),
                FieldDefTy::ManyToMany {
                    target,
                    related_name,
                } => FieldTy::ManyToMany(ManyToMany {
                    target: self.check_target(def, field, *target)?,
                    related_name: related_name.clone(),
                }),
                // Pairs are linked once every model exists.
                FieldDefTy::HasMany { target, .. } => FieldTy::HasMany(HasMany {
                    target: self.check_target(def, field, *target)?,
                    pair: id.field(index),
                }),
                FieldDefTy::HasOne { target, .. } => FieldTy::HasOne(HasOne {
                    target: self.check_target(def, field, *target)?,
                    pair: id.field(index),
                }),
            };

            fields.push(Field {
                id: id.field(index),
                name: FieldName {
                    app_name: field.name.clone(),
                },
                ty,
                nullable: field.nullable,
                primary_key: field.primary_key,
            });
        }

        let Some(primary_key) = primary_key else {
            return Err(Error::invalid_schema(format!(
                "model `{}` has no primary key",
                def.name
            )));
        };

        Ok(Model {
            id,
            name: Name::new(&def.name),
            fields,
            primary_key,
        })
    }

    fn check_target(
        &self,
        def: &ModelBuilder,
        field: &FieldDef,
        target: ModelId,
    ) -> Result<ModelId> {
        if target.0 < self.models.len() {
            Ok(target)
        } else {
            Err(Error::invalid_schema(format!(
                "field `{}::{}` references a model that was not added to the schema",
                def.name, field.name
            )))
        }
    }
}

/// Points every `HasMany`/`HasOne` at the `BelongsTo` it names, and back.
fn link_pairs(schema: &mut Schema, defs: &[ModelBuilder]) -> Result<()> {
    let mut links = vec![];

    for (index, def) in defs.iter().enumerate() {
        let src = ModelId(index);

        for (field_index, field) in def.fields.iter().enumerate() {
            let (target, pair_name) = match &field.ty {
                FieldDefTy::HasMany { target, pair } | FieldDefTy::HasOne { target, pair } => {
                    (*target, pair)
                }
                _ => continue,
            };

            let pair = schema
                .model(target)
                .field_by_name(pair_name)
                .filter(|pair| {
                    matches!(&pair.ty, FieldTy::BelongsTo(belongs_to) if belongs_to.target == src)
                })
                .ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "field `{}::{}` names pair `{}`, which is not a `BelongsTo` on `{}` pointing back",
                        def.name,
                        field.name,
                        pair_name,
                        schema.model(target).name.upper_camel_case(),
                    ))
                })?;

            links.push((src.field(field_index), pair.id));
        }
    }

    for (field_id, pair_id) in links {
        match &mut schema.models[&field_id.model].fields[field_id.index].ty {
            FieldTy::HasMany(has_many) => has_many.pair = pair_id,
            FieldTy::HasOne(has_one) => has_one.pair = pair_id,
            _ => unreachable!(),
        }

        let FieldTy::BelongsTo(belongs_to) =
            &mut schema.models[&pair_id.model].fields[pair_id.index].ty
        else {
            unreachable!()
        };

        if belongs_to.pair.is_some() {
            return Err(Error::invalid_schema(format!(
                "`BelongsTo` field `{}` is paired more than once",
                schema.field(pair_id).full_name(schema)
            )));
        }
        belongs_to.pair = Some(field_id);
    }

    Ok(())
}

/// Reverse accessors must be unique per model and must not shadow an
/// unrelated declared field.
fn verify_reverse_accessors(schema: &Schema) -> Result<()> {
    for model in schema.models() {
        let mut seen = HashSet::new();

        for reverse in schema.reverse_relations(model.id) {
            if !seen.insert(reverse.accessor.clone()) {
                return Err(Error::invalid_schema(format!(
                    "model `{}` has two reverse relations named `{}`",
                    model.name.upper_camel_case(),
                    reverse.accessor
                )));
            }

            let paired = reverse
                .field
                .ty
                .as_belongs_to()
                .and_then(|belongs_to| belongs_to.pair);

            if let Some(declared) = model.field_by_name(&reverse.accessor) {
                if paired != Some(declared.id) {
                    return Err(Error::invalid_schema(format!(
                        "reverse relation `{}` of `{}` clashes with field `{}`",
                        reverse.accessor,
                        reverse.field.full_name(schema),
                        declared.full_name(schema),
                    )));
                }
            }
        }
    }

    Ok(())
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: vec![],
            errors: vec![],
        }
    }

    pub fn primary_key(mut self, name: impl Into<String>, ty: stmt::Type) -> Self {
        self.push(name, FieldDefTy::Primitive { ty, choices: vec![] });
        if let Some(field) = self.fields.last_mut() {
            field.primary_key = true;
        }
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: stmt::Type) -> Self {
        self.push(name, FieldDefTy::Primitive { ty, choices: vec![] });
        self
    }

    /// A foreign key to `target`.
    pub fn belongs_to(mut self, name: impl Into<String>, target: ModelId) -> Self {
        self.push(
            name,
            FieldDefTy::BelongsTo {
                target,
                unique: false,
                related_name: None,
            },
        );
        self
    }

    /// A unique foreign key to `target`.
    pub fn one_to_one(mut self, name: impl Into<String>, target: ModelId) -> Self {
        self.push(
            name,
            FieldDefTy::BelongsTo {
                target,
                unique: true,
                related_name: None,
            },
        );
        self
    }

    pub fn many_to_many(mut self, name: impl Into<String>, target: ModelId) -> Self {
        self.push(
            name,
            FieldDefTy::ManyToMany {
                target,
                related_name: None,
            },
        );
        self
    }

    /// Declares the reverse side of `target`'s `BelongsTo` field named `pair`.
    pub fn has_many(
        mut self,
        name: impl Into<String>,
        target: ModelId,
        pair: impl Into<String>,
    ) -> Self {
        self.push(
            name,
            FieldDefTy::HasMany {
                target,
                pair: pair.into(),
            },
        );
        self
    }

    /// Declares the reverse side of `target`'s one-to-one field named `pair`.
    pub fn has_one(
        mut self,
        name: impl Into<String>,
        target: ModelId,
        pair: impl Into<String>,
    ) -> Self {
        self.push(
            name,
            FieldDefTy::HasOne {
                target,
                pair: pair.into(),
            },
        );
        self
    }

    pub fn nullable(mut self) -> Self {
        match self.fields.last_mut() {
            Some(field) => field.nullable = true,
            None => self.errors.push("`nullable` called before any field".into()),
        }
        self
    }

    /// Names the accessor the last relation adds to its target model.
    pub fn related_name(mut self, name: impl Into<String>) -> Self {
        match self.fields.last_mut().map(|field| &mut field.ty) {
            Some(
                FieldDefTy::BelongsTo { related_name, .. }
                | FieldDefTy::ManyToMany { related_name, .. },
            ) => *related_name = Some(name.into()),
            _ => self.errors.push(
                "`related_name` applies to `belongs_to`, `one_to_one` or `many_to_many` fields"
                    .into(),
            ),
        }
        self
    }

    /// Declares display labels for the last primitive field's values.
    pub fn choices<V, L>(mut self, choices: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<stmt::Value>,
        L: Into<String>,
    {
        match self.fields.last_mut().map(|field| &mut field.ty) {
            Some(FieldDefTy::Primitive { choices: dst, .. }) => {
                dst.extend(choices.into_iter().map(|(value, label)| Choice {
                    value: value.into(),
                    label: label.into(),
                }))
            }
            _ => self
                .errors
                .push("`choices` applies to primitive fields".into()),
        }
        self
    }

    fn push(&mut self, name: impl Into<String>, ty: FieldDefTy) {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            nullable: false,
            primary_key: false,
        });
    }
}

impl Model {
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name)
    }
}
