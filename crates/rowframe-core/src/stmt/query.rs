use super::{Direction, Expr, Limit, OrderBy, Path};
use crate::schema::ModelId;

/// A read against one model.
///
/// Queries are plain values: every builder method returns a modified copy and
/// nothing touches the store until a driver executes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Model the query is bound to
    pub source: ModelId,

    /// What each row contains
    pub returning: Returning,

    /// Rows must match this predicate
    pub filter: Option<Expr>,

    pub order_by: Option<OrderBy>,

    pub limit: Option<Limit>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    /// Whole records: every concrete field of the model, in declaration order
    Model,

    /// One value per path. Paths that cross a to-many relation produce one
    /// row per related record.
    Project(Vec<Path>),
}

impl Query {
    /// Selects every record of `model`.
    pub fn all(model: ModelId) -> Self {
        Self {
            source: model,
            returning: Returning::Model,
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    /// Projects the query to the given paths.
    pub fn project(mut self, paths: impl IntoIterator<Item = Path>) -> Self {
        self.returning = Returning::Project(paths.into_iter().collect());
        self
    }

    /// Restricts the query. Filters accumulate.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => Expr::and(existing, expr),
            None => expr,
        });
        self
    }

    /// Orders the query, replacing any previous ordering.
    pub fn order_by(mut self, path: Path, direction: Direction) -> Self {
        self.order_by = Some(OrderBy { path, direction });
        self
    }

    /// Returns at most `limit` rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(Limit { limit });
        self
    }

    /// Returns `true` for "values" queries that already project to paths.
    pub fn is_projected(&self) -> bool {
        matches!(self.returning, Returning::Project(_))
    }

    pub fn projection(&self) -> Option<&[Path]> {
        match &self.returning {
            Returning::Project(paths) => Some(paths),
            Returning::Model => None,
        }
    }
}
