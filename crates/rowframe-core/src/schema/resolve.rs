use super::{Field, FieldTy, ModelId, Schema};
use crate::{stmt, Error, Result};

/// How a resolved field relates to the model it was reached from.
///
/// Computed once at resolution time. Reverse kinds come from `HasMany` /
/// `HasOne` fields or from undeclared reverse accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A plain column
    Scalar,

    /// A foreign key or one-to-one key held by this model
    ToOne,

    /// A many-to-many relation declared on this model
    ToMany,

    /// The referenced side of a one-to-one key
    ReverseToOne,

    /// The referenced side of a foreign key or many-to-many relation
    ReverseToMany,
}

/// The terminal field reached by a dotted path.
#[derive(Debug, Clone)]
pub struct ResolvedField<'a> {
    /// The dotted path as requested
    pub name: String,

    /// Hops from the root model, usable in projections and filters
    pub path: stmt::Path,

    /// Descriptor of the last hop. For reverse accessors this is the key
    /// field declared on the other model.
    pub field: &'a Field,

    pub kind: FieldKind,
}

impl ResolvedField<'_> {
    /// The model whose records this field's values identify, for relation kinds.
    pub fn target(&self) -> Option<ModelId> {
        match self.kind {
            FieldKind::Scalar => None,
            FieldKind::ToOne | FieldKind::ToMany => self.field.relation_target_id(),
            FieldKind::ReverseToOne | FieldKind::ReverseToMany => match &self.field.ty {
                FieldTy::HasMany(_) | FieldTy::HasOne(_) => self.field.relation_target_id(),
                _ => Some(self.field.id.model),
            },
        }
    }
}

impl Schema {
    /// Resolves each dotted path against `root`, lazily and in input order.
    pub fn resolve_fields<'a, I>(
        &'a self,
        root: ModelId,
        names: I,
    ) -> impl Iterator<Item = Result<ResolvedField<'a>>> + 'a
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: 'a,
    {
        names
            .into_iter()
            .map(move |name| self.resolve_field(root, name.as_ref()))
    }

    /// Resolves one dotted path such as `author__country__name`.
    ///
    /// Each `__`-separated segment is looked up on the model reached so far:
    /// first as a declared field, then as a reverse relation accessor. Every
    /// relation hop moves the lookup to the related model. A segment after a
    /// scalar field, or one matching nothing, fails with a field not found
    /// error.
    pub fn resolve_field(&self, root: ModelId, name: &str) -> Result<ResolvedField<'_>> {
        let mut model = root;
        let mut steps = vec![];
        let mut resolved: Option<(&Field, FieldKind)> = None;

        for segment in name.split("__") {
            let current = self.model(model);

            if let Some((_, FieldKind::Scalar)) = resolved {
                return Err(Error::field_not_found(
                    current.name.upper_camel_case(),
                    segment,
                    name,
                ));
            }

            let (field, kind, next) = if let Some(field) = current.field_by_name(segment) {
                (field, field.kind(), field.relation_target_id().unwrap_or(model))
            } else if let Some(reverse) = self
                .reverse_relations(model)
                .find(|reverse| reverse.accessor == segment)
            {
                (reverse.field, reverse.kind, reverse.field.id.model)
            } else {
                return Err(Error::field_not_found(
                    current.name.upper_camel_case(),
                    segment,
                    name,
                ));
            };

            steps.push(field.id);
            model = next;
            resolved = Some((field, kind));
        }

        let Some((field, kind)) = resolved else {
            return Err(Error::field_not_found(
                self.model(root).name.upper_camel_case(),
                name,
                name,
            ));
        };

        Ok(ResolvedField {
            name: name.to_string(),
            path: stmt::Path::new(root, steps),
            field,
            kind,
        })
    }
}
