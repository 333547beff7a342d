use super::{Field, FieldId, FieldKind, ModelId};

#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Model the key points at
    pub target: ModelId,

    /// True for one-to-one keys: at most one record may point at each target
    pub unique: bool,

    /// Name of the accessor the relation adds to the target model
    pub related_name: Option<String>,

    /// The `HasMany` or `HasOne` declared on the target that pairs with this
    pub pair: Option<FieldId>,
}

/// A many-to-many relation. The stored value is the list of target keys.
#[derive(Debug, Clone)]
pub struct ManyToMany {
    /// Associated model
    pub target: ModelId,

    /// Name of the accessor the relation adds to the target model
    pub related_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HasMany {
    /// Associated model
    pub target: ModelId,

    /// The `BelongsTo` association that pairs with this
    pub pair: FieldId,
}

#[derive(Debug, Clone)]
pub struct HasOne {
    /// Associated model
    pub target: ModelId,

    /// The `BelongsTo` association that pairs with this
    pub pair: FieldId,
}

/// An accessor a model gains from a relation declared on another model.
#[derive(Debug, Clone)]
pub struct ReverseRelation<'a> {
    /// Name the accessor is reached by
    pub accessor: String,

    /// The `BelongsTo` or `ManyToMany` field on the owning model
    pub field: &'a Field,

    /// `ReverseToOne` or `ReverseToMany`
    pub kind: FieldKind,
}
