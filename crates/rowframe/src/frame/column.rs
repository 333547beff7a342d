use rowframe_core::stmt::{Type, Value};

/// A named column of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// The common type of the column's non-null values.
    ///
    /// Integers mixed with floats widen to [`Type::F64`]. Any other mix, a
    /// list value, or a column with only nulls has no common type.
    pub fn ty(&self) -> Option<Type> {
        let mut common = None;

        for value in &self.values {
            if value.is_null() {
                continue;
            }

            let ty = value.ty()?;
            common = match common {
                None => Some(ty),
                Some(current) if current == ty => Some(current),
                Some(Type::I64 | Type::F64) if matches!(ty, Type::I64 | Type::F64) => {
                    Some(Type::F64)
                }
                Some(_) => return None,
            };
        }

        common
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(value);
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
