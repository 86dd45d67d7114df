//! Query builder rendering PostgREST query-string parameters.
//!
//! Builders are pure: [`Query::to_pairs`] produces the `(key, value)` list
//! that the client hands to `reqwest`. Rendering is deterministic, so two
//! identical builders always produce the same query string.

use std::fmt::{self, Display};

use crate::error::BackendError;

/// Tables exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Orders,
    Profiles,
    Products,
    ProductOptions,
    OptionVariations,
    Categories,
}

impl Table {
    /// Path segment under `/rest/v1/`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Profiles => "profiles",
            Self::Products => "products",
            Self::ProductOptions => "product_options",
            Self::OptionVariations => "option_variations",
            Self::Categories => "categories",
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for [`Query::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A filtered, ordered, paginated read (or the filter part of an update).
///
/// ```
/// use forkful_backend::{Direction, Query};
///
/// let pairs = Query::new()
///     .select("*,categories(name)")
///     .eq("available", true)
///     .order("name", Direction::Asc)
///     .limit(10)
///     .to_pairs()
///     .unwrap();
///
/// assert_eq!(pairs[0], ("select".to_string(), "*,categories(name)".to_string()));
/// assert_eq!(pairs[1], ("available".to_string(), "eq.true".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<(String, Direction)>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns (and embedded relations) to return. Defaults to `*`.
    #[must_use]
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// `column = value`.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Display) -> Self {
        self.filters.push((column.into(), format!("eq.{value}")));
        self
    }

    /// `column IN (values…)`. Values containing reserved characters are quoted.
    #[must_use]
    pub fn in_list<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let list = values
            .into_iter()
            .map(|v| quote_list_value(&v.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column.into(), format!("in.({list})")));
        self
    }

    /// Case-insensitive substring match.
    ///
    /// Wildcards in `term` are stripped so user input can't widen the match.
    #[must_use]
    pub fn ilike(mut self, column: impl Into<String>, term: &str) -> Self {
        let term: String = term.chars().filter(|c| !matches!(c, '*' | '%')).collect();
        self.filters
            .push((column.into(), format!("ilike.*{}*", term.trim())));
        self
    }

    /// Add a sort key. Keys apply in the order they were added.
    #[must_use]
    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push((column.into(), direction));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether any row filter has been added.
    #[must_use]
    pub const fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Render as query-string pairs: `select`, filters, `order`, `limit`, `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidFilter`] if a filter or order column
    /// isn't a plain identifier (letters, digits, `_`, or `.` for embedded
    /// relations).
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>, BackendError> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 4);

        pairs.push((
            "select".to_string(),
            self.select.clone().unwrap_or_else(|| "*".to_string()),
        ));

        for (column, expr) in &self.filters {
            validate_column(column)?;
            pairs.push((column.clone(), expr.clone()));
        }

        if !self.order.is_empty() {
            for (column, _) in &self.order {
                validate_column(column)?;
            }
            let order = self
                .order
                .iter()
                .map(|(column, dir)| format!("{column}.{}", dir.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }

        Ok(pairs)
    }
}

fn validate_column(column: &str) -> Result<(), BackendError> {
    let valid = !column.is_empty()
        && column
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(BackendError::InvalidFilter(column.to_string()))
    }
}

fn quote_list_value(value: &str) -> String {
    if value.contains([',', '(', ')', '"', ':', ' ']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_select_star() {
        let pairs = Query::new().to_pairs().unwrap();
        assert_eq!(pairs, vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn test_full_render_order() {
        let pairs = Query::new()
            .eq("status", "pending")
            .order("created_at", Direction::Desc)
            .order("id", Direction::Asc)
            .limit(25)
            .offset(50)
            .to_pairs()
            .unwrap();

        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        assert_eq!(
            rendered,
            [
                "select=*",
                "status=eq.pending",
                "order=created_at.desc,id.asc",
                "limit=25",
                "offset=50",
            ]
        );
    }

    #[test]
    fn test_in_list_quotes_reserved() {
        let pairs = Query::new()
            .in_list("name", ["plain", "a,b", "say \"hi\""])
            .to_pairs()
            .unwrap();
        assert_eq!(pairs[1].1, r#"in.(plain,"a,b","say \"hi\"")"#);
    }

    #[test]
    fn test_ilike_strips_wildcards() {
        let pairs = Query::new().ilike("name", " pi*zz%a ").to_pairs().unwrap();
        assert_eq!(pairs[1].1, "ilike.*pizza*");
    }

    #[test]
    fn test_rejects_bad_column() {
        let err = Query::new().eq("name;drop", "x").to_pairs().unwrap_err();
        assert!(matches!(err, BackendError::InvalidFilter(c) if c == "name;drop"));

        let err = Query::new()
            .order("created at", Direction::Asc)
            .to_pairs()
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidFilter(_)));
    }

    #[test]
    fn test_deterministic() {
        let build = || {
            Query::new()
                .select("id,title")
                .eq("product_id", "abc")
                .order("position", Direction::Asc)
        };
        assert_eq!(build().to_pairs().unwrap(), build().to_pairs().unwrap());
        assert!(build().has_filters());
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::ProductOptions.to_string(), "product_options");
        assert_eq!(Table::OptionVariations.as_str(), "option_variations");
    }
}
