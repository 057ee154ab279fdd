//! Join, order and column descriptors shared by the builders.

use serde::Deserialize;
use std::fmt;

/// The keyword placed before `JOIN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinKind {
    /// Plain `JOIN`
    #[default]
    #[serde(alias = "")]
    None,
    Left,
    Right,
    Inner,
    Outer,
}

impl JoinKind {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            JoinKind::None => None,
            JoinKind::Left => Some("LEFT"),
            JoinKind::Right => Some("RIGHT"),
            JoinKind::Inner => Some("INNER"),
            JoinKind::Outer => Some("OUTER"),
        }
    }
}

/// A JOIN clause. `clause` is the raw SQL following `JOIN`
/// (e.g. `avatars av ON users.avatarId = av.id`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Join {
    #[serde(default, rename = "type")]
    pub kind: JoinKind,
    #[serde(rename = "join")]
    pub clause: String,
}

impl Join {
    pub fn new(kind: JoinKind, clause: impl Into<String>) -> Self {
        Self {
            kind,
            clause: clause.into(),
        }
    }

    /// Plain `JOIN <clause>`
    pub fn plain(clause: impl Into<String>) -> Self {
        Self::new(JoinKind::None, clause)
    }

    pub fn left(clause: impl Into<String>) -> Self {
        Self::new(JoinKind::Left, clause)
    }

    pub fn right(clause: impl Into<String>) -> Self {
        Self::new(JoinKind::Right, clause)
    }

    pub fn inner(clause: impl Into<String>) -> Self {
        Self::new(JoinKind::Inner, clause)
    }

    pub fn outer(clause: impl Into<String>) -> Self {
        Self::new(JoinKind::Outer, clause)
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.keyword() {
            Some(kw) => write!(f, "{kw} JOIN {}", self.clause),
            None => write!(f, "JOIN {}", self.clause),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// An ORDER BY entry: one or more columns sharing a direction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    pub direction: OrderDirection,
    pub columns: Vec<String>,
}

impl Order {
    pub fn new<I, S>(direction: OrderDirection, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            direction,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn asc<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(OrderDirection::Asc, columns)
    }

    pub fn desc<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(OrderDirection::Desc, columns)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.columns.join(", "), self.direction.as_str())
    }
}

/// A column definition for CREATE TABLE.
///
/// `name` and `column_type` are optional here so that incomplete definitions can be
/// attached; they are checked when the statement is exported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnDef {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub column_type: Option<String>,
    #[serde(rename = "isAutoIncrement")]
    pub auto_increment: bool,
    #[serde(rename = "isPrimary")]
    pub primary_key: bool,
    #[serde(rename = "isUnique")]
    pub unique: bool,
    #[serde(rename = "isNull")]
    pub nullable: bool,
    pub default: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            column_type: Some(column_type.into()),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = Some(column_type.into());
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Raw SQL default expression (`'guest'`, `CURRENT_TIMESTAMP`, `0`).
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Join condition fragments with `AND`, wrapped in parentheses.
///
/// ```rust
/// assert_eq!(mysql_qb::qb::and(["a = ?", "b = ?"]), "(a = ? AND b = ?)");
/// ```
pub fn and<I, S>(conditions: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    group(conditions, " AND ")
}

/// Join condition fragments with `OR`, wrapped in parentheses.
pub fn or<I, S>(conditions: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    group(conditions, " OR ")
}

fn group<I, S>(conditions: I, sep: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = conditions
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    match parts.len() {
        0 => String::new(),
        1 => parts.into_iter().next().unwrap_or_default(),
        _ => format!("({})", parts.join(sep)),
    }
}
