//! Literal escaping and positional `?` substitution.
//!
//! Statements are sent over the text protocol, so parameters are rendered into
//! the statement as escaped literals before execution. Rendering of strings,
//! integers, bytes and dates is delegated to the driver (`mysql_async::Value::as_sql`).

use crate::error::{QbError, QbResult};
use crate::value::SqlValue;

/// The placeholder character replaced by [`Escape::generate_parameterized_query`].
pub const PLACEHOLDER: char = '?';

/// Renders values as SQL literals for the target connection.
pub trait Escape {
    /// Render one value as an SQL literal.
    fn escape(&self, value: &SqlValue) -> String;

    /// Replace each `?` in `template`, left to right, with the escaped value at the same position.
    ///
    /// A template without placeholders is returned unchanged, whatever `values` holds.
    fn generate_parameterized_query(&self, template: &str, values: &[SqlValue]) -> QbResult<String> {
        let placeholders = template.matches(PLACEHOLDER).count();
        if placeholders == 0 {
            return Ok(template.to_string());
        }
        if placeholders != values.len() {
            return Err(QbError::ParameterCountMismatch {
                placeholders,
                values: values.len(),
            });
        }

        let mut out = String::with_capacity(template.len() + values.len() * 8);
        let mut values = values.iter();
        for ch in template.chars() {
            if ch != PLACEHOLDER {
                out.push(ch);
            } else if let Some(value) = values.next() {
                out.push_str(&self.escape(value));
            }
        }
        Ok(out)
    }
}

impl<T: Escape + ?Sized> Escape for &T {
    fn escape(&self, value: &SqlValue) -> String {
        (**self).escape(value)
    }
}

/// MySQL literal rendering.
///
/// With `no_backslash_escapes` set (servers running in `NO_BACKSLASH_ESCAPES` mode),
/// quotes are doubled instead of backslash-escaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySqlEscaper {
    pub no_backslash_escapes: bool,
}

impl MySqlEscaper {
    pub const fn new() -> Self {
        Self {
            no_backslash_escapes: false,
        }
    }

    pub const fn no_backslash_escapes(mut self, enabled: bool) -> Self {
        self.no_backslash_escapes = enabled;
        self
    }
}

impl Escape for MySqlEscaper {
    fn escape(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Bool(true) => "true".to_string(),
            SqlValue::Bool(false) => "false".to_string(),
            SqlValue::Float(v) if v.is_finite() => v.to_string(),
            SqlValue::Float(_) => "NULL".to_string(),
            other => other.to_driver().as_sql(self.no_backslash_escapes),
        }
    }
}

/// Escape one value with the default MySQL rules.
pub fn escape(value: &SqlValue) -> String {
    MySqlEscaper::new().escape(value)
}

/// Substitute `values` into `template` with the default MySQL rules.
///
/// ```rust
/// use mysql_qb::{substitute, SqlValue};
///
/// let sql = substitute("x = ?", &[SqlValue::from("a'b")]).unwrap();
/// assert_eq!(sql, r"x = 'a\'b'");
/// ```
pub fn substitute(template: &str, values: &[SqlValue]) -> QbResult<String> {
    MySqlEscaper::new().generate_parameterized_query(template, values)
}
