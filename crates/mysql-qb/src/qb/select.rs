//! SELECT statement builder.

use crate::error::{QbError, QbResult};
use crate::escape::Escape;
use crate::qb::traits::{Import, Statement, StatementKind, merge, push_where, require_table};
use crate::qb::types::{Join, Order};
use crate::result::SelectResult;
use crate::value::SqlValue;
use serde::Deserialize;

/// Full configuration of a SELECT builder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectProps {
    /// Projected items (empty means `*`)
    pub items: Vec<String>,
    pub for_update: bool,
    pub table: String,
    pub joins: Vec<Join>,
    /// WHERE fragments, joined with AND
    #[serde(rename = "where")]
    pub conditions: Vec<String>,
    /// Row count; 0 means no LIMIT clause
    pub limit: u64,
    pub start_item: u64,
    pub order: Vec<Order>,
    pub extra: String,
    pub params: Vec<SqlValue>,
}

/// [`SelectProps`] with every field optional, for [`Import`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialSelectProps {
    pub items: Option<Vec<String>>,
    pub for_update: Option<bool>,
    pub table: Option<String>,
    pub joins: Option<Vec<Join>>,
    #[serde(rename = "where")]
    pub conditions: Option<Vec<String>>,
    pub limit: Option<u64>,
    pub start_item: Option<u64>,
    pub order: Option<Vec<Order>>,
    pub extra: Option<String>,
    pub params: Option<Vec<SqlValue>>,
}

impl From<SelectProps> for PartialSelectProps {
    fn from(p: SelectProps) -> Self {
        Self {
            items: Some(p.items),
            for_update: Some(p.for_update),
            table: Some(p.table),
            joins: Some(p.joins),
            conditions: Some(p.conditions),
            limit: Some(p.limit),
            start_item: Some(p.start_item),
            order: Some(p.order),
            extra: Some(p.extra),
            params: Some(p.params),
        }
    }
}

/// SELECT statement builder.
///
/// ```rust
/// use mysql_qb::qb::{Join, Order, SelectBuilder, Statement};
///
/// let sql = SelectBuilder::new()
///     .items(["id", "name"])
///     .from("users")
///     .join(Join::left("avatars av ON users.avatarId = av.id"))
///     .where_("name = ?")
///     .set_params(["alice"])
///     .order(Order::asc(["name"]))?
///     .limit(10)
///     .export()?;
/// assert_eq!(
///     sql,
///     "SELECT id, name FROM users LEFT JOIN avatars av ON users.avatarId = av.id \
///      WHERE name = 'alice' ORDER BY name ASC LIMIT 0, 10;"
/// );
/// # Ok::<(), mysql_qb::QbError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBuilder {
    props: SelectProps,
}

impl SelectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projected items. Replaces any previous list.
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.props.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Emit `FOR UPDATE` after the projection.
    pub fn for_update(mut self) -> Self {
        self.props.for_update = true;
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.props.table = table.into();
        self
    }

    /// Append a JOIN clause. Joins are emitted in the order they were added.
    pub fn join(mut self, join: Join) -> Self {
        self.props.joins.push(join);
        self
    }

    pub fn joins(mut self, joins: impl IntoIterator<Item = Join>) -> Self {
        self.props.joins.extend(joins);
        self
    }

    /// Append a WHERE condition. Conditions are joined with `AND`.
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

    pub fn limit(mut self, limit: u64) -> Self {
        self.props.limit = limit;
        self
    }

    /// Set the row offset.
    ///
    /// A non-zero offset requires a limit to be set first.
    pub fn start_item(mut self, start_item: u64) -> QbResult<Self> {
        if start_item != 0 && self.props.limit == 0 {
            return Err(QbError::LimitRequiredForOffset);
        }
        self.props.start_item = start_item;
        Ok(self)
    }

    /// Append an ORDER BY entry. Fails when the entry has no columns.
    pub fn order(mut self, order: Order) -> QbResult<Self> {
        if order.columns.is_empty() {
            return Err(QbError::EmptyOrderColumns);
        }
        self.props.order.push(order);
        Ok(self)
    }

    pub fn orders(self, orders: impl IntoIterator<Item = Order>) -> QbResult<Self> {
        orders.into_iter().try_fold(self, Self::order)
    }

    /// Free-text clause appended after LIMIT.
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.props.extra = extra.into();
        self
    }

    /// Values for the `?` placeholders. Replaces any previous list.
    pub fn set_params<I, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.props.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn props(&self) -> &SelectProps {
        &self.props
    }
}

impl Import for SelectBuilder {
    type Props = PartialSelectProps;

    fn import(mut self, props: impl Into<Self::Props>) -> Self {
        let p = props.into();
        let target = &mut self.props;
        merge(&mut target.items, p.items);
        merge(&mut target.for_update, p.for_update);
        merge(&mut target.table, p.table);
        merge(&mut target.joins, p.joins);
        merge(&mut target.conditions, p.conditions);
        merge(&mut target.limit, p.limit);
        merge(&mut target.start_item, p.start_item);
        merge(&mut target.order, p.order);
        merge(&mut target.extra, p.extra);
        merge(&mut target.params, p.params);
        self
    }
}

impl Statement for SelectBuilder {
    type Output = SelectResult;

    const KIND: StatementKind = StatementKind::Select;

    fn export_with<E: Escape + ?Sized>(&self, escaper: &E) -> QbResult<String> {
        let p = &self.props;
        require_table(&p.table, Self::KIND)?;

        let mut sql = String::from("SELECT ");
        if p.items.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&p.items.join(", "));
        }

        if p.for_update {
            sql.push_str(" FOR UPDATE");
        }

        sql.push_str(" FROM ");
        sql.push_str(&p.table);

        for join in &p.joins {
            sql.push(' ');
            sql.push_str(&join.to_string());
        }

        push_where(&mut sql, &p.conditions);

        if !p.order.is_empty() {
            let order: Vec<String> = p.order.iter().map(ToString::to_string).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        if p.limit != 0 {
            sql.push_str(&format!(" LIMIT {}, {}", p.start_item, p.limit));
        }

        if !p.extra.is_empty() {
            sql.push(' ');
            sql.push_str(&p.extra);
        }

        sql.push(';');

        escaper.generate_parameterized_query(&sql, &p.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::types::JoinKind;

    #[test]
    fn test_select_all() {
        let sql = SelectBuilder::new().from("users").export().unwrap();
        assert_eq!(sql, "SELECT * FROM users;");
    }

    #[test]
    fn test_select_missing_table() {
        let err = SelectBuilder::new().export().unwrap_err();
        assert!(matches!(err, QbError::MissingTable("SelectQuery")));
    }

    #[test]
    fn test_select_with_where_param() {
        let sql = SelectBuilder::new()
            .from("users")
            .where_("id = ?")
            .set_params([1])
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE id = 1;");
    }

    #[test]
    fn test_select_with_escaped_param() {
        let sql = SelectBuilder::new()
            .from("users")
            .where_("username = ?")
            .set_params(["adm'in"])
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE username = 'adm\\'in';");
    }

    #[test]
    fn test_select_where_conditions_joined_with_and() {
        let sql = SelectBuilder::new()
            .items(["id", "name"])
            .from("users")
            .where_all(["id = ?", "name = ?"])
            .set_params([SqlValue::from(1), SqlValue::from("username")])
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id, name FROM users WHERE id = 1 AND name = 'username';"
        );
    }

    #[test]
    fn test_select_plain_join() {
        let sql = SelectBuilder::new()
            .items(["id", "avatarId"])
            .from("users")
            .join(Join::new(JoinKind::None, "avatars as av ON users.avatarId = av.id"))
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id, avatarId FROM users JOIN avatars as av ON users.avatarId = av.id;"
        );
    }

    #[test]
    fn test_select_joins_keep_order() {
        let sql = SelectBuilder::new()
            .from("users")
            .join(Join::left("avatars av ON users.avatarId = av.id"))
            .join(Join::inner("teams t ON users.teamId = t.id"))
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users LEFT JOIN avatars av ON users.avatarId = av.id \
             INNER JOIN teams t ON users.teamId = t.id;"
        );
    }

    #[test]
    fn test_select_limit() {
        let sql = SelectBuilder::new().from("users").limit(50).export().unwrap();
        assert_eq!(sql, "SELECT * FROM users LIMIT 0, 50;");
    }

    #[test]
    fn test_select_limit_and_start_item() {
        let sql = SelectBuilder::new()
            .from("users")
            .limit(50)
            .start_item(25)
            .unwrap()
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users LIMIT 25, 50;");
    }

    #[test]
    fn test_select_start_item_without_limit() {
        let err = SelectBuilder::new().from("users").start_item(25).unwrap_err();
        assert!(matches!(err, QbError::LimitRequiredForOffset));
    }

    #[test]
    fn test_select_zero_start_item_without_limit_is_allowed() {
        let sql = SelectBuilder::new()
            .from("users")
            .start_item(0)
            .unwrap()
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users;");
    }

    #[test]
    fn test_select_empty_order_fails_on_attach() {
        let err = SelectBuilder::new()
            .from("users")
            .order(Order::asc(Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(err, QbError::EmptyOrderColumns));
    }

    #[test]
    fn test_select_multiple_orders() {
        let sql = SelectBuilder::new()
            .from("users")
            .orders([Order::desc(["created_at"]), Order::asc(["last", "first"])])
            .unwrap()
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users ORDER BY created_at DESC, last, first ASC;"
        );
    }

    #[test]
    fn test_select_extra() {
        let sql = SelectBuilder::new()
            .from("users")
            .extra("LIMIT 5, 100")
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users LIMIT 5, 100;");
    }

    #[test]
    fn test_select_for_update() {
        let sql = SelectBuilder::new()
            .from("accounts")
            .for_update()
            .where_("id = ?")
            .set_params([3])
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FOR UPDATE FROM accounts WHERE id = 3;");
    }

    #[test]
    fn test_select_clause_order() {
        let sql = SelectBuilder::new()
            .from("users u")
            .extra("LOCK IN SHARE MODE")
            .limit(10)
            .start_item(20)
            .unwrap()
            .order(Order::desc(["u.id"]))
            .unwrap()
            .where_("u.active = ?")
            .join(Join::left("teams t ON u.teamId = t.id"))
            .set_params([true])
            .export()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users u LEFT JOIN teams t ON u.teamId = t.id WHERE u.active = true \
             ORDER BY u.id DESC LIMIT 20, 10 LOCK IN SHARE MODE;"
        );
    }

    #[test]
    fn test_select_param_mismatch() {
        let err = SelectBuilder::new()
            .from("users")
            .where_("id = ? AND name = ?")
            .set_params([1])
            .export()
            .unwrap_err();
        assert!(matches!(err, QbError::ParameterCountMismatch { .. }));
    }

    #[test]
    fn test_select_export_is_repeatable() {
        let qb = SelectBuilder::new()
            .from("users")
            .where_("id = ?")
            .set_params([9])
            .limit(1);
        assert_eq!(qb.export().unwrap(), qb.export().unwrap());
    }

    #[test]
    fn test_select_import_keeps_unset_fields() {
        let props: PartialSelectProps =
            serde_json::from_str(r#"{"where":["id = ?"],"params":[1]}"#).unwrap();
        let sql = SelectBuilder::new()
            .from("users")
            .limit(5)
            .import(props)
            .export()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE id = 1 LIMIT 0, 5;");
    }

    #[test]
    fn test_select_import_full_props_replaces() {
        let props: SelectProps = serde_json::from_str(
            r#"{"table":"users","items":["id","name"],"where":["id = ?"],"params":[1]}"#,
        )
        .unwrap();
        let sql = SelectBuilder::new().limit(5).import(props).export().unwrap();
        assert_eq!(sql, "SELECT id, name FROM users WHERE id = 1;");
    }
}
