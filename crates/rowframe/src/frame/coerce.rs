use super::{Column, Frame};

use rowframe_core::stmt::Value;
use rust_decimal::prelude::ToPrimitive;

impl Frame {
    /// Converts decimal-like columns to floats.
    ///
    /// A column is converted when all of its non-null values are numbers or
    /// numeric strings and at least one of them is a `Decimal` or a string.
    /// Every other column is left untouched.
    pub fn coerce_float(&mut self) {
        for column in self.columns_mut() {
            column.coerce_float();
        }
    }
}

impl Column {
    pub(crate) fn coerce_float(&mut self) {
        let mut convert = false;

        for value in self.values() {
            match value {
                Value::Null | Value::I64(_) | Value::F64(_) => {}
                Value::Decimal(_) => convert = true,
                Value::String(s) if parse(s).is_some() => convert = true,
                _ => return,
            }
        }

        if !convert {
            return;
        }

        for value in self.values_mut() {
            *value = match value {
                Value::I64(v) => Value::F64(*v as f64),
                Value::Decimal(v) => v.to_f64().map(Value::F64).unwrap_or_default(),
                Value::String(s) => parse(s).map(Value::F64).unwrap_or_default(),
                _ => continue,
            };
        }
    }
}

fn parse(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn coerced(values: Vec<Value>) -> Vec<Value> {
        let mut column = Column::new("c", values);
        column.coerce_float();
        column.into_values()
    }

    #[test]
    fn decimals_become_floats() {
        assert_eq!(
            coerced(vec![
                Decimal::new(1250, 2).into(),
                Value::Null,
                Value::I64(3)
            ]),
            [Value::F64(12.5), Value::Null, Value::F64(3.0)]
        );
    }

    #[test]
    fn numeric_strings_become_floats() {
        assert_eq!(
            coerced(vec!["1.5".into(), " 2 ".into()]),
            [Value::F64(1.5), Value::F64(2.0)]
        );
    }

    #[test]
    fn integers_are_kept() {
        let values = vec![Value::I64(1), Value::Null, Value::I64(2)];
        assert_eq!(coerced(values.clone()), values);
    }

    #[test]
    fn text_is_kept() {
        let values = vec![Decimal::new(1, 0).into(), "abc".into()];
        assert_eq!(coerced(values.clone()), values);
    }
}
