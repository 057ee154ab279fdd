//! UPDATE statement builder.

use crate::error::{QbError, QbResult};
use crate::escape::Escape;
use crate::qb::traits::{Import, Statement, StatementKind, merge, push_where, require_table};
use crate::result::UpdateResult;
use crate::value::SqlValue;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateProps {
    pub table: String,
    /// Raw `col = value` assignments
    pub items: Vec<String>,
    #[serde(rename = "where")]
    pub conditions: Vec<String>,
    pub params: Vec<SqlValue>,
}

/// [`UpdateProps`] with every field optional, for [`Import`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialUpdateProps {
    pub table: Option<String>,
    pub items: Option<Vec<String>>,
    #[serde(rename = "where")]
    pub conditions: Option<Vec<String>>,
    pub params: Option<Vec<SqlValue>>,
}

impl From<UpdateProps> for PartialUpdateProps {
    fn from(p: UpdateProps) -> Self {
        Self {
            table: Some(p.table),
            items: Some(p.items),
            conditions: Some(p.conditions),
            params: Some(p.params),
        }
    }
}

/// UPDATE statement builder.
///
/// An UPDATE with nothing to set is rejected at export time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuilder {
    props: UpdateProps,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.props.table = table.into();
        self
    }

    /// Append one raw assignment (`name = ?`, `hits = hits + 1`).
    pub fn set(mut self, assignment: impl Into<String>) -> Self {
        self.props.items.push(assignment.into());
        self
    }

    pub fn set_all<I, S>(mut self, assignments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.props
            .items
            .extend(assignments.into_iter().map(Into::into));
        self
    }

    pub fn where_(mut self, condition: impl Into<String>) -> Self {
        self.props.conditions.push(condition.into());
        self
    }

    pub fn where_all<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.props
            .conditions
            .extend(conditions.into_iter().map(Into::into));
        self
    }

    /// Values for every `?` in the SET and WHERE fragments, in order.
    pub fn set_params<I, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.props.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn props(&self) -> &UpdateProps {
        &self.props
    }
}

impl Import for UpdateBuilder {
    type Props = PartialUpdateProps;

    fn import(mut self, props: impl Into<Self::Props>) -> Self {
        let p = props.into();
        merge(&mut self.props.table, p.table);
        merge(&mut self.props.items, p.items);
        merge(&mut self.props.conditions, p.conditions);
        merge(&mut self.props.params, p.params);
        self
    }
}

impl Statement for UpdateBuilder {
    type Output = UpdateResult;

    const KIND: StatementKind = StatementKind::Update;

    fn export_with<E: Escape + ?Sized>(&self, escaper: &E) -> QbResult<String> {
        let p = &self.props;
        require_table(&p.table, Self::KIND)?;
        if p.items.is_empty() {
            return Err(QbError::MissingSetItems);
        }

        let mut sql = format!("UPDATE {} SET {}", p.table, p.items.join(", "));
        push_where(&mut sql, &p.conditions);
        sql.push(';');

        escaper.generate_parameterized_query(&sql, &p.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_basic() {
        let sql = UpdateBuilder::new()
            .table("users")
            .set("status = ?")
            .where_("id = ?")
            .set_params([SqlValue::from("inactive"), SqlValue::from(1)])
            .export()
            .unwrap();
        assert_eq!(sql, "UPDATE users SET status = 'inactive' WHERE id = 1;");
    }

    #[test]
    fn test_update_without_set_items() {
        let err = UpdateBuilder::new().table("users").export().unwrap_err();
        assert!(matches!(err, QbError::MissingSetItems));
    }

    #[test]
    fn test_update_missing_table_checked_first() {
        let err = UpdateBuilder::new().export().unwrap_err();
        assert!(matches!(err, QbError::MissingTable("UpdateQuery")));
    }

    #[test]
    fn test_update_set_accumulates() {
        let sql = UpdateBuilder::new()
            .table("users")
            .set("a = 1")
            .set_all(["b = 2", "hits = hits + 1"])
            .export()
            .unwrap();
        assert_eq!(sql, "UPDATE users SET a = 1, b = 2, hits = hits + 1;");
    }

    #[test]
    fn test_update_multiple_conditions() {
        let sql = UpdateBuilder::new()
            .table("users")
            .set("score = ?")
            .where_all(["team = ?", "active = ?"])
            .set_params([SqlValue::from(10), SqlValue::from("red"), SqlValue::from(true)])
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE users SET score = 10 WHERE team = 'red' AND active = true;"
        );
    }
}
