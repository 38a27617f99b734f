//! Result rows as seen by the mapper.

use crate::error::{SqlerError, SqlerResult};
use crate::value::Value;
use crate::values_map::ValuesMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tokio_postgres::types::{FromSql, Type};
use uuid::Uuid;

/// A row returned by a [`Querier`](crate::Querier).
///
/// The mapper only needs the column names and a way to decode one column
/// into a [`Value`].
pub trait ResultRow {
    /// Column names in result order.
    fn column_names(&self) -> Vec<&str>;

    /// Decode the column at `index`.
    fn value_at(&self, index: usize) -> SqlerResult<Value>;

    /// Decode every column whose name satisfies `wanted`, keyed by column name.
    ///
    /// If a name appears more than once, the last column wins.
    fn values_where(&self, wanted: impl Fn(&str) -> bool) -> SqlerResult<ValuesMap>
    where
        Self: Sized,
    {
        let mut out = ValuesMap::new();
        for (index, name) in self.column_names().into_iter().enumerate() {
            if wanted(name) {
                out.insert(name, self.value_at(index)?);
            }
        }
        Ok(out)
    }
}

impl ResultRow for ValuesMap {
    fn column_names(&self) -> Vec<&str> {
        self.fields()
    }

    fn value_at(&self, index: usize) -> SqlerResult<Value> {
        self.iter()
            .nth(index)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| SqlerError::decode(format!("#{index}"), "column index out of range"))
    }
}

impl<R: ResultRow> ResultRow for &R {
    fn column_names(&self) -> Vec<&str> {
        (*self).column_names()
    }

    fn value_at(&self, index: usize) -> SqlerResult<Value> {
        (*self).value_at(index)
    }
}

impl ResultRow for tokio_postgres::Row {
    fn column_names(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.name()).collect()
    }

    fn value_at(&self, index: usize) -> SqlerResult<Value> {
        let column = self
            .columns()
            .get(index)
            .ok_or_else(|| SqlerError::decode(format!("#{index}"), "column index out of range"))?;
        let name = column.name();

        match *column.type_() {
            Type::BOOL => get::<bool>(self, index, name),
            Type::CHAR => get::<i8>(self, index, name),
            Type::INT2 => get::<i16>(self, index, name),
            Type::INT4 => get::<i32>(self, index, name),
            Type::INT8 => get::<i64>(self, index, name),
            Type::OID => get::<u32>(self, index, name),
            Type::FLOAT4 => get::<f32>(self, index, name),
            Type::FLOAT8 => get::<f64>(self, index, name),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
                get::<String>(self, index, name)
            }
            Type::BYTEA => get::<Vec<u8>>(self, index, name),
            Type::JSON | Type::JSONB => get::<serde_json::Value>(self, index, name),
            Type::UUID => get::<Uuid>(self, index, name),
            Type::DATE => get::<NaiveDate>(self, index, name),
            Type::TIME => get::<NaiveTime>(self, index, name),
            Type::TIMESTAMP => get::<NaiveDateTime>(self, index, name),
            Type::TIMESTAMPTZ => get::<DateTime<Utc>>(self, index, name),
            ref other => {
                // Extension types such as citext still decode as text.
                if <String as FromSql>::accepts(other) {
                    get::<String>(self, index, name)
                } else {
                    Err(SqlerError::decode(
                        name,
                        format!("unsupported column type {}", other.name()),
                    ))
                }
            }
        }
    }
}

fn get<T>(row: &tokio_postgres::Row, index: usize, name: &str) -> SqlerResult<Value>
where
    T: for<'a> FromSql<'a> + Into<Value>,
{
    row.try_get::<_, Option<T>>(index)
        .map(Value::from)
        .map_err(|e| SqlerError::decode(name, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::ResultRow;
    use crate::Value;

    #[test]
    fn values_map_row_uses_key_order() {
        let row = crate::values! { "name" => "alice", "id" => 7 };
        assert_eq!(row.column_names(), vec!["id", "name"]);
        assert_eq!(row.value_at(0).unwrap(), Value::Int(7));
        assert!(row.value_at(2).unwrap_err().is_decode());
    }

    #[test]
    fn values_where_filters_columns() {
        let row = crate::values! { "a" => 1, "b" => 2, "c" => 3 };
        let picked = row.values_where(|c| c != "b").unwrap();
        assert_eq!(picked.fields(), vec!["a", "c"]);
    }
}
