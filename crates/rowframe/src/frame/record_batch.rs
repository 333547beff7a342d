use super::{Column, Frame};

use arrow::{
    array::{
        ArrayRef, BooleanBuilder, Decimal128Builder, Float64Builder, Int64Builder, StringBuilder,
    },
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use rowframe_core::{
    stmt::{Type, Value},
    Result,
};
use std::{collections::HashMap, sync::Arc};

impl Frame {
    /// Schema metadata key naming the column that holds the index.
    pub const INDEX_METADATA_KEY: &'static str = "rowframe.index";

    /// Exports the frame to an Arrow record batch.
    ///
    /// The index, if any, becomes the first column and its name is recorded
    /// under [`Frame::INDEX_METADATA_KEY`]. Column types come from the values:
    /// columns with no common type, or only nulls, are rendered as text.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let columns: Vec<&Column> = self.index.iter().chain(&self.columns).collect();

        let mut fields = Vec::with_capacity(columns.len());
        let mut arrays = Vec::with_capacity(columns.len());

        for column in columns {
            let data_type = data_type(column);
            arrays.push(build_array(column, &data_type)?);
            fields.push(Field::new(column.name(), data_type, true));
        }

        let mut schema = Schema::new(fields);

        if let Some(index) = &self.index {
            schema = schema.with_metadata(HashMap::from([(
                Self::INDEX_METADATA_KEY.to_string(),
                index.name().to_string(),
            )]));
        }

        let options = RecordBatchOptions::new().with_row_count(Some(self.len));
        let batch = RecordBatch::try_new_with_options(Arc::new(schema), arrays, &options)
            .map_err(anyhow::Error::from)?;

        Ok(batch)
    }
}

fn data_type(column: &Column) -> DataType {
    match column.ty() {
        Some(Type::Bool) => DataType::Boolean,
        Some(Type::I64) => DataType::Int64,
        Some(Type::F64) => DataType::Float64,
        Some(Type::Decimal) => DataType::Decimal128(38, decimal_scale(column)),
        Some(Type::String) | None => DataType::Utf8,
    }
}

/// The largest scale among the column's decimals, so no digits are lost.
fn decimal_scale(column: &Column) -> i8 {
    let scale = column
        .iter()
        .filter_map(|value| match value {
            Value::Decimal(d) => Some(d.scale()),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    // rust_decimal caps scale at 28
    scale.min(38) as i8
}

fn build_array(column: &Column, data_type: &DataType) -> Result<ArrayRef> {
    let len = column.len();

    let array: ArrayRef = match data_type {
        DataType::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(len);
            for value in column {
                match value {
                    Value::Bool(v) => builder.append_value(*v),
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Int64 => {
            let mut builder = Int64Builder::with_capacity(len);
            for value in column {
                match value {
                    Value::I64(v) => builder.append_value(*v),
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Float64 => {
            let mut builder = Float64Builder::with_capacity(len);
            for value in column {
                match value {
                    Value::F64(v) => builder.append_value(*v),
                    Value::I64(v) => builder.append_value(*v as f64),
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Decimal128(precision, scale) => {
            let mut builder = Decimal128Builder::with_capacity(len)
                .with_data_type(DataType::Decimal128(*precision, *scale));
            for value in column {
                match value {
                    Value::Decimal(d) => {
                        let mut d = *d;
                        d.rescale(*scale as u32);
                        builder.append_value(d.mantissa());
                    }
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        _ => {
            let mut builder = StringBuilder::with_capacity(len, len * 8);
            for value in column {
                match value {
                    Value::Null => builder.append_null(),
                    Value::String(s) => builder.append_value(s),
                    value => builder.append_value(value.to_string()),
                }
            }
            Arc::new(builder.finish())
        }
    };

    Ok(array)
}
