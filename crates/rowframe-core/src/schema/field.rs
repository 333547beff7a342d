use super::{BelongsTo, FieldKind, HasMany, HasOne, ManyToMany, ModelId, Schema};
use crate::stmt;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model.
    pub id: FieldId,

    /// The field name
    pub name: FieldName,

    /// Primitive or relation
    pub ty: FieldTy,

    /// True if the field can be null.
    pub nullable: bool,

    /// True if the field is the model's primary key
    pub primary_key: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct FieldName {
    pub app_name: String,
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    Primitive(FieldPrimitive),
    BelongsTo(BelongsTo),
    ManyToMany(ManyToMany),
    HasMany(HasMany),
    HasOne(HasOne),
}

#[derive(Debug, Clone)]
pub struct FieldPrimitive {
    /// The field's type
    pub ty: stmt::Type,

    /// Display labels for a closed set of stored values
    pub choices: Vec<Choice>,
}

/// A stored value and the label shown in place of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub value: stmt::Value,
    pub label: String,
}

impl Field {
    /// The kind of the field when reached through its declaring model.
    pub fn kind(&self) -> FieldKind {
        match &self.ty {
            FieldTy::Primitive(_) => FieldKind::Scalar,
            FieldTy::BelongsTo(_) => FieldKind::ToOne,
            FieldTy::ManyToMany(_) => FieldKind::ToMany,
            FieldTy::HasOne(_) => FieldKind::ReverseToOne,
            FieldTy::HasMany(_) => FieldKind::ReverseToMany,
        }
    }

    /// Returns a fully qualified name for the field.
    pub fn full_name(&self, schema: &Schema) -> String {
        let model = schema.model(self.id.model);
        format!("{}::{}", model.name.upper_camel_case(), self.name.app_name)
    }

    /// If the field is a relation, return the relation's target ModelId.
    pub fn relation_target_id(&self) -> Option<ModelId> {
        match &self.ty {
            FieldTy::Primitive(_) => None,
            FieldTy::BelongsTo(belongs_to) => Some(belongs_to.target),
            FieldTy::ManyToMany(many_to_many) => Some(many_to_many.target),
            FieldTy::HasMany(has_many) => Some(has_many.target),
            FieldTy::HasOne(has_one) => Some(has_one.target),
        }
    }

    /// Display labels declared for the field's values, if any.
    pub fn choices(&self) -> &[Choice] {
        match &self.ty {
            FieldTy::Primitive(primitive) => &primitive.choices,
            _ => &[],
        }
    }
}

impl FieldTy {
    /// `HasMany` and `HasOne` are declared on the referenced side and store no
    /// column of their own.
    pub fn is_reverse(&self) -> bool {
        matches!(self, Self::HasMany(..) | Self::HasOne(..))
    }

    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match self {
            Self::BelongsTo(belongs_to) => Some(belongs_to),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}

impl From<&Self> for FieldId {
    fn from(val: &Self) -> Self {
        *val
    }
}

impl From<&Field> for FieldId {
    fn from(val: &Field) -> Self {
        val.id
    }
}
