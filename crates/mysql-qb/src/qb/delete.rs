//! DELETE statement builder.

use crate::error::QbResult;
use crate::escape::Escape;
use crate::qb::traits::{Import, Statement, StatementKind, merge, push_where, require_table};
use crate::result::DeleteResult;
use crate::value::SqlValue;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeleteProps {
    pub table: String,
    #[serde(rename = "where")]
    pub conditions: Vec<String>,
    pub params: Vec<SqlValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialDeleteProps {
    pub table: Option<String>,
    #[serde(rename = "where")]
    pub conditions: Option<Vec<String>>,
    pub params: Option<Vec<SqlValue>>,
}

impl From<DeleteProps> for PartialDeleteProps {
    fn from(p: DeleteProps) -> Self {
        Self {
            table: Some(p.table),
            conditions: Some(p.conditions),
            params: Some(p.params),
        }
    }
}

/// DELETE statement builder.
///
/// Unlike UPDATE, a DELETE without conditions is exported as-is and removes every
/// row of the table. Guarding against that is up to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteBuilder {
    props: DeleteProps,
}

impl DeleteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.props.table = table.into();
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

    pub fn set_params<I, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.props.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn props(&self) -> &DeleteProps {
        &self.props
    }
}

impl Import for DeleteBuilder {
    type Props = PartialDeleteProps;

    fn import(mut self, props: impl Into<Self::Props>) -> Self {
        let p = props.into();
        merge(&mut self.props.table, p.table);
        merge(&mut self.props.conditions, p.conditions);
        merge(&mut self.props.params, p.params);
        self
    }
}

impl Statement for DeleteBuilder {
    type Output = DeleteResult;

    const KIND: StatementKind = StatementKind::Delete;

    fn export_with<E: Escape + ?Sized>(&self, escaper: &E) -> QbResult<String> {
        let p = &self.props;
        require_table(&p.table, Self::KIND)?;

        let mut sql = format!("DELETE FROM {}", p.table);
        push_where(&mut sql, &p.conditions);
        sql.push(';');

        escaper.generate_parameterized_query(&sql, &p.params)
    }
}
