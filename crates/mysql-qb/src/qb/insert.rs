//! INSERT statement builder.

use crate::error::QbResult;
use crate::escape::Escape;
use crate::qb::traits::{Import, Statement, StatementKind, merge, require_table};
use crate::result::InsertResult;
use crate::value::SqlValue;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsertProps {
    pub table: String,
    /// Column/value pairs, emitted in this order.
    ///
    /// Deserialized from a `{"column": value}` object (entries kept in document
    /// order) or from a list of `[column, value]` pairs.
    #[serde(deserialize_with = "column_values::deserialize")]
    pub items: Vec<(String, SqlValue)>,
}

/// [`InsertProps`] with every field optional, for [`Import`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialInsertProps {
    pub table: Option<String>,
    #[serde(deserialize_with = "column_values::deserialize_option")]
    pub items: Option<Vec<(String, SqlValue)>>,
}

impl From<InsertProps> for PartialInsertProps {
    fn from(p: InsertProps) -> Self {
        Self {
            table: Some(p.table),
            items: Some(p.items),
        }
    }
}

mod column_values {
    use crate::value::SqlValue;
    use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    type Items = Vec<(String, SqlValue)>;

    struct ColumnValues(Items);

    impl<'de> Deserialize<'de> for ColumnValues {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_any(ColumnValuesVisitor).map(ColumnValues)
        }
    }

    struct ColumnValuesVisitor;

    impl<'de> Visitor<'de> for ColumnValuesVisitor {
        type Value = Items;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of column names to values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Items, A::Error> {
            let mut items = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, SqlValue>()? {
                items.push(entry);
            }
            Ok(items)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Items, A::Error> {
            let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(entry) = seq.next_element::<(String, SqlValue)>()? {
                items.push(entry);
            }
            Ok(items)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Items, E> {
            Ok(Vec::new())
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Items, D::Error> {
        ColumnValues::deserialize(d).map(|c| c.0)
    }

    pub(super) fn deserialize_option<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Items>, D::Error> {
        Ok(Option::<ColumnValues>::deserialize(d)?.map(|c| c.0))
    }
}

/// INSERT statement builder.
///
/// Values are escaped inline (`SET col = <literal>`); there is no placeholder pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertBuilder {
    props: InsertProps,
}

impl InsertBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into(mut self, table: impl Into<String>) -> Self {
        self.props.table = table.into();
        self
    }

    /// Set the column/value pairs. Replaces any previous items.
    pub fn items<I, K, V>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        self.props.items = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Append one column/value pair.
    pub fn item(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.props.items.push((column.into(), value.into()));
        self
    }

    pub fn props(&self) -> &InsertProps {
        &self.props
    }
}

impl Import for InsertBuilder {
    type Props = PartialInsertProps;

    fn import(mut self, props: impl Into<Self::Props>) -> Self {
        let p = props.into();
        merge(&mut self.props.table, p.table);
        merge(&mut self.props.items, p.items);
        self
    }
}

impl Statement for InsertBuilder {
    type Output = InsertResult;

    const KIND: StatementKind = StatementKind::Insert;

    fn export_with<E: Escape + ?Sized>(&self, escaper: &E) -> QbResult<String> {
        require_table(&self.props.table, Self::KIND)?;

        let mut sql = format!("INSERT INTO {}", self.props.table);
        if !self.props.items.is_empty() {
            let assignments: Vec<String> = self
                .props
                .items
                .iter()
                .map(|(column, value)| format!("{column} = {}", escaper.escape(value)))
                .collect();
            sql.push_str(" SET ");
            sql.push_str(&assignments.join(", "));
        }
        sql.push(';');
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QbError;

    #[test]
    fn test_insert_missing_table() {
        let err = InsertBuilder::new().export().unwrap_err();
        assert!(matches!(err, QbError::MissingTable("InsertQuery")));
    }

    #[test]
    fn test_insert_without_items() {
        let sql = InsertBuilder::new().into("users").export().unwrap();
        assert_eq!(sql, "INSERT INTO users;");
    }

    #[test]
    fn test_insert_items() {
        let sql = InsertBuilder::new()
            .into("users")
            .items([("name", SqlValue::from("asd")), ("age", SqlValue::from(25))])
            .export()
            .unwrap();
        assert_eq!(sql, "INSERT INTO users SET name = 'asd', age = 25;");
    }

    #[test]
    fn test_insert_values_are_escaped_not_substituted() {
        let sql = InsertBuilder::new()
            .into("notes")
            .item("body", "why? it's fine")
            .item("deleted_at", Option::<i64>::None)
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO notes SET body = 'why? it\\'s fine', deleted_at = NULL;"
        );
    }

    #[test]
    fn test_insert_items_replace_previous() {
        let sql = InsertBuilder::new()
            .into("users")
            .item("a", 1)
            .items([("b", 2)])
            .export()
            .unwrap();
        assert_eq!(sql, "INSERT INTO users SET b = 2;");
    }

    #[test]
    fn test_insert_props_from_object_keep_key_order() {
        let props: InsertProps =
            serde_json::from_str(r#"{"table":"users","items":{"name":"x","age":2}}"#).unwrap();
        assert_eq!(
            props.items,
            vec![
                ("name".to_string(), SqlValue::from("x")),
                ("age".to_string(), SqlValue::Int(2)),
            ]
        );
        let sql = InsertBuilder::new().import(props).export().unwrap();
        assert_eq!(sql, "INSERT INTO users SET name = 'x', age = 2;");
    }

    #[test]
    fn test_insert_import_keeps_table() {
        let props: PartialInsertProps =
            serde_json::from_str(r#"{"items":{"email":"a@b.c"}}"#).unwrap();
        let sql = InsertBuilder::new()
            .into("users")
            .item("name", "old")
            .import(props)
            .export()
            .unwrap();
        assert_eq!(sql, "INSERT INTO users SET email = 'a@b.c';");

        let props: PartialInsertProps = serde_json::from_str(r#"{"items":null}"#).unwrap();
        assert_eq!(props.items, None);
    }
}
