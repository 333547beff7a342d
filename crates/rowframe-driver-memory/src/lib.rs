//! An in-process store for rowframe.
//!
//! Records live in memory, one list per model, in insertion order. Queries
//! are evaluated directly against them: relation paths are followed record by
//! record, to-many hops fan a record out into one row per related record, and
//! comparisons against `Null` never match, as in SQL.

use indexmap::IndexMap;
use rowframe_core::{
    async_trait, bail,
    driver::{
        operation::{Labels, Operation},
        Driver, Response,
    },
    schema::{FieldTy, ModelId},
    stmt::{self, Value, ValueRecord},
    Error, Result, Schema,
};
use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

type LabelFn = Arc<dyn Fn(&ValueRecord) -> String + Send + Sync>;

pub struct Memory {
    schema: Arc<Schema>,
    tables: Mutex<IndexMap<ModelId, Vec<ValueRecord>>>,
    labels: HashMap<ModelId, LabelFn>,
}

type Tables = IndexMap<ModelId, Vec<ValueRecord>>;

impl Memory {
    pub fn new(schema: Arc<Schema>) -> Self {
        let tables = schema.models().map(|model| (model.id, vec![])).collect();

        Self {
            schema,
            tables: Mutex::new(tables),
            labels: HashMap::new(),
        }
    }

    /// Renders records of `model` with `label` when labels are requested.
    ///
    /// Models without a label function render as `"<Model> object (<pk>)"`.
    pub fn with_label<F>(mut self, model: ModelId, label: F) -> Self
    where
        F: Fn(&ValueRecord) -> String + Send + Sync + 'static,
    {
        self.labels.insert(model, Arc::new(label));
        self
    }

    /// Stores a record given as `(field name, value)` pairs.
    ///
    /// Fields left out are `Null`. `HasMany` and `HasOne` fields have no
    /// column and cannot be set; a `ManyToMany` field takes a list of keys.
    pub fn insert<'a, I, V>(&self, model: ModelId, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<Value>,
    {
        let model = self.schema.model(model);
        let mut record = ValueRecord::from_vec(vec![Value::Null; model.fields.len()]);

        for (name, value) in values {
            let Some(field) = model.field_by_name(name) else {
                return Err(Error::field_not_found(
                    model.name.upper_camel_case(),
                    name,
                    name,
                ));
            };

            if field.ty.is_reverse() {
                bail!(
                    "`{}` is the reverse side of a relation and stores no value",
                    field.full_name(&self.schema)
                );
            }

            record[field.id.index] = value.into();
        }

        let key = &record[model.primary_key.index];
        if key.is_null() {
            return Err(Error::invalid_argument(format!(
                "record for `{}` has no primary key",
                model.name.upper_camel_case()
            )));
        }

        let mut tables = self.tables();
        let rows = tables.entry(model.id).or_default();

        if rows
            .iter()
            .any(|row| &row[model.primary_key.index] == key)
        {
            return Err(Error::invalid_argument(format!(
                "duplicate primary key {key} for `{}`",
                model.name.upper_camel_case()
            )));
        }

        rows.push(record);
        Ok(())
    }

    /// Number of records stored for `model`.
    pub fn len(&self, model: ModelId) -> usize {
        self.tables().get(&model).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self, model: ModelId) -> bool {
        self.len(model) == 0
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn label(&self, schema: &Schema, model: ModelId, record: &ValueRecord) -> String {
        match self.labels.get(&model) {
            Some(label) => label(record),
            None => {
                let model = schema.model(model);
                format!(
                    "{} object ({})",
                    model.name.upper_camel_case(),
                    record[model.primary_key.index]
                )
            }
        }
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("tables", &*self.tables())
            .field("labels", &self.labels.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl Driver for Memory {
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        let tables = self.tables();
        let eval = Eval {
            schema,
            tables: &tables,
        };

        match op {
            Operation::Query(query) => {
                let rows = eval.query(&query)?;
                tracing::trace!(model = ?query.source, rows = rows.len(), "memory query");
                Ok(Response::rows(rows))
            }
            Operation::Labels(Labels { model, keys }) => {
                let mut rows = Vec::with_capacity(keys.len());

                for key in keys {
                    if let Some(record) = eval.find(model, &key) {
                        let label = self.label(schema, model, record);
                        rows.push(ValueRecord::from_vec(vec![key, Value::String(label)]));
                    }
                }

                Ok(Response::rows(rows))
            }
        }
    }
}

struct Eval<'a> {
    schema: &'a Schema,
    tables: &'a Tables,
}

impl<'a> Eval<'a> {
    fn query(&self, query: &stmt::Query) -> Result<Vec<ValueRecord>> {
        let mut records = vec![];

        for record in self.records(query.source) {
            let keep = match &query.filter {
                Some(filter) => self.matches(query.source, record, filter)?,
                None => true,
            };

            if keep {
                records.push(record);
            }
        }

        if let Some(order_by) = &query.order_by {
            let mut keyed = Vec::with_capacity(records.len());
            for record in records {
                let mut key = self.path_values(query.source, record, &order_by.path)?;
                keyed.push((key.swap_remove(0), record));
            }

            keyed.sort_by(|(a, _), (b, _)| {
                let ord = a.cmp_value(b).unwrap_or(Ordering::Equal);
                if order_by.direction.is_desc() {
                    ord.reverse()
                } else {
                    ord
                }
            });

            records = keyed.into_iter().map(|(_, record)| record).collect();
        }

        let mut rows = vec![];

        for record in records {
            match &query.returning {
                stmt::Returning::Model => {
                    let model = self.schema.model(query.source);
                    rows.push(ValueRecord::from_vec(
                        model
                            .concrete_fields()
                            .map(|field| record[field.id.index].clone())
                            .collect(),
                    ));
                }
                stmt::Returning::Project(paths) => {
                    let mut columns = Vec::with_capacity(paths.len());
                    for path in paths {
                        columns.push(self.path_values(query.source, record, path)?);
                    }
                    rows.extend(cartesian(&columns));
                }
            }

            if let Some(limit) = &query.limit {
                if rows.len() >= limit.limit {
                    rows.truncate(limit.limit);
                    break;
                }
            }
        }

        Ok(rows)
    }

    fn matches(&self, model: ModelId, record: &ValueRecord, expr: &stmt::Expr) -> Result<bool> {
        match expr {
            stmt::Expr::And(operands) => {
                for operand in operands {
                    if !self.matches(model, record, operand)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            stmt::Expr::BinaryOp(expr) => {
                if expr.rhs.is_null() {
                    return Ok(false);
                }

                let values = self.path_values(model, record, &expr.lhs)?;
                Ok(values.iter().any(|value| {
                    !value.is_null()
                        && value
                            .cmp_value(&expr.rhs)
                            .is_some_and(|ord| expr.op.holds(ord))
                }))
            }
            stmt::Expr::InList(expr) => {
                let values = self.path_values(model, record, &expr.lhs)?;
                Ok(values
                    .iter()
                    .any(|value| !value.is_null() && expr.list.contains(value)))
            }
        }
    }

    fn records(&self, model: ModelId) -> &'a [ValueRecord] {
        self.tables.get(&model).map(Vec::as_slice).unwrap_or(&[])
    }

    fn key_of<'r>(&self, model: ModelId, record: &'r ValueRecord) -> &'r Value {
        &record[self.schema.model(model).primary_key.index]
    }

    fn find(&self, model: ModelId, key: &Value) -> Option<&'a ValueRecord> {
        if key.is_null() {
            return None;
        }

        self.records(model)
            .iter()
            .find(|record| self.key_of(model, record) == key)
    }

    /// All values `path` reaches from `record`; `[Null]` when it reaches none.
    fn path_values(
        &self,
        root: ModelId,
        record: &'a ValueRecord,
        path: &stmt::Path,
    ) -> Result<Vec<Value>> {
        if path.is_empty() {
            bail!("cannot evaluate an empty path");
        }

        let mut current = vec![(root, record)];
        let mut out = vec![];

        for (i, step) in path.steps.iter().enumerate() {
            let last = i + 1 == path.len();
            let field = self.schema.field(*step);
            let mut next = vec![];

            for (model, record) in current {
                if step.model == model {
                    match &field.ty {
                        FieldTy::Primitive(_) => {
                            if !last {
                                bail!(
                                    "cannot traverse primitive field `{}`",
                                    field.full_name(self.schema)
                                );
                            }
                            out.push(record[step.index].clone());
                        }
                        FieldTy::BelongsTo(rel) => {
                            let key = &record[step.index];
                            if last {
                                out.push(key.clone());
                            } else if let Some(target) = self.find(rel.target, key) {
                                next.push((rel.target, target));
                            }
                        }
                        FieldTy::ManyToMany(rel) => {
                            for key in record[step.index].as_list().unwrap_or(&[]) {
                                if last {
                                    out.push(key.clone());
                                } else if let Some(target) = self.find(rel.target, key) {
                                    next.push((rel.target, target));
                                }
                            }
                        }
                        FieldTy::HasMany(rel) => self.follow_pair(
                            model,
                            record,
                            rel.target,
                            rel.pair.index,
                            last,
                            &mut out,
                            &mut next,
                        ),
                        FieldTy::HasOne(rel) => self.follow_pair(
                            model,
                            record,
                            rel.target,
                            rel.pair.index,
                            last,
                            &mut out,
                            &mut next,
                        ),
                    }
                } else {
                    let key = self.key_of(model, record);

                    for related in self.records(step.model) {
                        let hit = match &field.ty {
                            FieldTy::BelongsTo(rel) if rel.target == model => {
                                &related[step.index] == key
                            }
                            FieldTy::ManyToMany(rel) if rel.target == model => related[step.index]
                                .as_list()
                                .is_some_and(|keys| keys.contains(key)),
                            _ => bail!(
                                "field `{}` does not point at `{}`",
                                field.full_name(self.schema),
                                self.schema.model(model).name.upper_camel_case()
                            ),
                        };

                        if hit {
                            if last {
                                out.push(self.key_of(step.model, related).clone());
                            } else {
                                next.push((step.model, related));
                            }
                        }
                    }
                }
            }

            current = next;
        }

        if out.is_empty() {
            out.push(Value::Null);
        }

        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn follow_pair(
        &self,
        model: ModelId,
        record: &'a ValueRecord,
        target: ModelId,
        pair_index: usize,
        last: bool,
        out: &mut Vec<Value>,
        next: &mut Vec<(ModelId, &'a ValueRecord)>,
    ) {
        let key = self.key_of(model, record);

        for related in self.records(target) {
            if &related[pair_index] == key {
                if last {
                    out.push(self.key_of(target, related).clone());
                } else {
                    next.push((target, related));
                }
            }
        }
    }
}

/// Every combination of one value per column.
fn cartesian(columns: &[Vec<Value>]) -> Vec<ValueRecord> {
    let mut rows = vec![Vec::with_capacity(columns.len())];

    for column in columns {
        let mut expanded = Vec::with_capacity(rows.len() * column.len());
        for row in &rows {
            for value in column {
                let mut row = row.clone();
                row.push(value.clone());
                expanded.push(row);
            }
        }
        rows = expanded;
    }

    rows.into_iter().map(ValueRecord::from_vec).collect()
}
