//! Raw statement responses and the typed wrappers returned by `execute()`.

use crate::error::{QbError, QbResult};
use crate::value::{FromSqlValue, SqlValue};
use mysql_async::consts::ColumnType;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// Column metadata of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Table (or alias) the column came from, empty for computed columns
    pub table: String,
    pub column_type: ColumnType,
}

impl Field {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            table: String::new(),
            column_type,
        }
    }
}

/// One row of a result set, keyed by column name in select order.
///
/// Column names are shared between all rows of the same set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl ResultRow {
    /// Build a row. Extra values without a column name are dropped; missing ones read as NULL.
    pub fn new(columns: Arc<[String]>, mut values: Vec<SqlValue>) -> Self {
        values.resize(columns.len(), SqlValue::Null);
        Self { columns, values }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        let (columns, values): (Vec<String>, Vec<SqlValue>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Value of the first column called `name`.
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| &self.values[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Typed access to a column.
    ///
    /// Returns [`QbError::Decode`] when the column is absent or its value does not
    /// convert to `T`.
    pub fn get_as<T: FromSqlValue>(&self, name: &str) -> QbResult<T> {
        let value = self
            .get(name)
            .ok_or_else(|| QbError::decode(name, "no such column"))?;
        T::from_sql_value(value).ok_or_else(|| {
            QbError::decode(
                name,
                format!(
                    "cannot convert {} to {}",
                    value.type_name(),
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Render the row as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(k, v)| {
                let v = serde_json::to_value(v).unwrap_or(serde_json::Value::Null);
                (k.to_string(), v)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Rows plus column metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub rows: Vec<ResultRow>,
    pub fields: Vec<Field>,
}

/// Outcome of a statement that produces no result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultHeader {
    pub affected_rows: u64,
    pub insert_id: Option<u64>,
    pub warnings: u16,
    pub info: String,
}

/// Raw driver response: either a result set or an OK header.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    Rows(RowSet),
    Header(ResultHeader),
}

impl Default for RawResult {
    fn default() -> Self {
        RawResult::Header(ResultHeader::default())
    }
}

/// Untyped response of any statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    raw: RawResult,
}

impl QueryResult {
    pub fn new(raw: RawResult) -> Self {
        Self { raw }
    }

    /// Rows of the result set, empty for header responses.
    pub fn rows(&self) -> &[ResultRow] {
        match &self.raw {
            RawResult::Rows(set) => &set.rows,
            RawResult::Header(_) => &[],
        }
    }

    pub fn fields(&self) -> &[Field] {
        match &self.raw {
            RawResult::Rows(set) => &set.fields,
            RawResult::Header(_) => &[],
        }
    }

    pub fn header(&self) -> Option<&ResultHeader> {
        match &self.raw {
            RawResult::Header(header) => Some(header),
            RawResult::Rows(_) => None,
        }
    }

    /// Affected row count, 0 for result sets.
    pub fn affected_rows(&self) -> u64 {
        self.header().map_or(0, |h| h.affected_rows)
    }

    /// Last AUTO_INCREMENT id from the OK header. 0 when the server reported none
    /// or the response is a result set.
    pub fn insert_id(&self) -> u64 {
        self.header().and_then(|h| h.insert_id).unwrap_or(0)
    }

    pub fn raw(&self) -> &RawResult {
        &self.raw
    }

    pub fn into_raw(self) -> RawResult {
        self.raw
    }
}

impl From<RawResult> for QueryResult {
    fn from(raw: RawResult) -> Self {
        Self::new(raw)
    }
}

impl From<RowSet> for QueryResult {
    fn from(set: RowSet) -> Self {
        Self::new(RawResult::Rows(set))
    }
}

impl From<ResultHeader> for QueryResult {
    fn from(header: ResultHeader) -> Self {
        Self::new(RawResult::Header(header))
    }
}

/// Response of a SELECT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectResult {
    inner: QueryResult,
}

impl SelectResult {
    pub fn rows(&self) -> &[ResultRow] {
        self.inner.rows()
    }

    pub fn fields(&self) -> &[Field] {
        self.inner.fields()
    }

    pub fn raw(&self) -> &RawResult {
        self.inner.raw()
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        match self.inner.into_raw() {
            RawResult::Rows(set) => set.rows,
            RawResult::Header(_) => Vec::new(),
        }
    }
}

impl From<QueryResult> for SelectResult {
    fn from(inner: QueryResult) -> Self {
        Self { inner }
    }
}

/// Response of an INSERT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertResult {
    inner: QueryResult,
}

impl InsertResult {
    /// Generated AUTO_INCREMENT id of the inserted row, 0 if none.
    pub fn insert_id(&self) -> u64 {
        self.inner.insert_id()
    }

    pub fn affected_rows(&self) -> u64 {
        self.inner.affected_rows()
    }

    pub fn raw(&self) -> &RawResult {
        self.inner.raw()
    }
}

impl From<QueryResult> for InsertResult {
    fn from(inner: QueryResult) -> Self {
        Self { inner }
    }
}

/// Response of an UPDATE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResult {
    inner: QueryResult,
}

impl UpdateResult {
    pub fn affected_rows(&self) -> u64 {
        self.inner.affected_rows()
    }

    pub fn raw(&self) -> &RawResult {
        self.inner.raw()
    }
}

impl From<QueryResult> for UpdateResult {
    fn from(inner: QueryResult) -> Self {
        Self { inner }
    }
}

/// Response of a DELETE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteResult {
    inner: QueryResult,
}

impl DeleteResult {
    pub fn affected_rows(&self) -> u64 {
        self.inner.affected_rows()
    }

    pub fn raw(&self) -> &RawResult {
        self.inner.raw()
    }
}

impl From<QueryResult> for DeleteResult {
    fn from(inner: QueryResult) -> Self {
        Self { inner }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateTableResult {
    inner: QueryResult,
}

impl CreateTableResult {
    pub fn raw(&self) -> &RawResult {
        self.inner.raw()
    }
}

impl From<QueryResult> for CreateTableResult {
    fn from(inner: QueryResult) -> Self {
        Self { inner }
    }
}

/// Response of a table existence probe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableExistsResult {
    inner: QueryResult,
}

impl TableExistsResult {
    /// True when the probe counted exactly one matching table.
    pub fn exists(&self) -> bool {
        self.inner
            .rows()
            .first()
            .and_then(|row| row.get("COUNT(*)"))
            .and_then(SqlValue::as_i64)
            == Some(1)
    }

    pub fn raw(&self) -> &RawResult {
        self.inner.raw()
    }
}

impl From<QueryResult> for TableExistsResult {
    fn from(inner: QueryResult) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_result(value: SqlValue) -> QueryResult {
        RowSet {
            rows: vec![ResultRow::from_pairs([("COUNT(*)", value)])],
            fields: vec![Field::new("COUNT(*)", ColumnType::MYSQL_TYPE_LONGLONG)],
        }
        .into()
    }

    #[test]
    fn test_row_lookup_by_name() {
        let row = ResultRow::from_pairs([("id", SqlValue::from(1)), ("name", "alice".into())]);
        assert_eq!(row.get("name"), Some(&SqlValue::from("alice")));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_index(0), Some(&SqlValue::Int(1)));
        assert_eq!(row.get_as::<i64>("id").unwrap(), 1);
        assert_eq!(row.get_as::<String>("name").unwrap(), "alice");
    }

    #[test]
    fn test_row_get_as_errors() {
        let row = ResultRow::from_pairs([("name", "alice")]);
        assert!(matches!(
            row.get_as::<i64>("name"),
            Err(QbError::Decode { column, .. }) if column == "name"
        ));
        assert!(matches!(
            row.get_as::<i64>("nope"),
            Err(QbError::Decode { .. })
        ));
    }

    #[test]
    fn test_row_pads_missing_values() {
        let columns: Arc<[String]> = vec!["a".to_string(), "b".to_string()].into();
        let row = ResultRow::new(columns, vec![SqlValue::from(1)]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("b"), Some(&SqlValue::Null));
    }

    #[test]
    fn test_row_to_json_keeps_order() {
        let row = ResultRow::from_pairs([
            ("id", SqlValue::from(7)),
            ("name", "bob".into()),
            ("bio", SqlValue::Null),
        ]);
        assert_eq!(
            row.to_json(),
            serde_json::json!({ "id": 7, "name": "bob", "bio": null })
        );
        let keys: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["id", "name", "bio"]);
    }

    #[test]
    fn test_header_accessors() {
        let result: QueryResult = ResultHeader {
            affected_rows: 3,
            insert_id: Some(42),
            ..Default::default()
        }
        .into();
        assert!(result.rows().is_empty());
        assert!(result.fields().is_empty());
        assert_eq!(result.affected_rows(), 3);

        let insert = InsertResult::from(result);
        assert_eq!(insert.insert_id(), 42);
        assert_eq!(insert.affected_rows(), 3);
    }

    #[test]
    fn test_insert_id_defaults_to_zero() {
        let no_id = InsertResult::from(QueryResult::from(ResultHeader {
            affected_rows: 1,
            insert_id: None,
            ..Default::default()
        }));
        assert_eq!(no_id.insert_id(), 0);
        assert_eq!(count_result(SqlValue::Int(1)).insert_id(), 0);
    }

    #[test]
    fn test_select_result_rows() {
        let result = SelectResult::from(count_result(SqlValue::Int(5)));
        assert_eq!(result.rows().len(), 1);
        assert_eq!(result.fields()[0].name, "COUNT(*)");
        assert_eq!(result.into_rows().len(), 1);
    }

    #[test]
    fn test_table_exists_semantics() {
        assert!(TableExistsResult::from(count_result(SqlValue::Int(1))).exists());
        // text protocol returns the count as a string
        assert!(TableExistsResult::from(count_result(SqlValue::from("1"))).exists());
        assert!(!TableExistsResult::from(count_result(SqlValue::Int(0))).exists());
        assert!(!TableExistsResult::from(count_result(SqlValue::Int(2))).exists());
        assert!(!TableExistsResult::from(QueryResult::from(RowSet::default())).exists());
        assert!(!TableExistsResult::from(QueryResult::default()).exists());
    }
}
