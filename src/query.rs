//! Query string and filter expression builders for record listing.

use core::fmt;

/// Options narrowing down a records list request.
///
/// Unset options are left out of the request entirely: `page` and `per_page`
/// use `0` as "not specified", `sort`, `filter`, `expand` and `fields` use
/// `None`, and
/// `skip_total` is only sent when `true`.
///
/// # Example
/// ```rust
/// use pocketbase_users::RecordQuery;
///
/// let query = RecordQuery::new()
///     .page(2)
///     .per_page(50)
///     .sort("-created,id");
///
/// assert_eq!(query.to_query_string(), "?page=2&perPage=50&sort=-created,id");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// The page (aka. offset) of the paginated list. `0` lets the server pick (1).
    pub page: u32,
    /// The max returned records per page. `0` lets the server pick (30).
    pub per_page: u32,
    /// `ORDER BY` fields. Prefix a field with `-` for DESC.
    pub sort: Option<String>,
    /// Filter expression, see [`Filter`].
    pub filter: Option<String>,
    /// When `true`, `totalItems` and `totalPages` come back as `-1`.
    pub skip_total: bool,
    /// Relations to auto expand.
    pub expand: Option<String>,
    /// Comma separated fields to return, e.g. `id,username,expand.team.name`.
    pub fields: Option<String>,
}

impl RecordQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The page (aka. offset) of the paginated list.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// The max returned records per page (server default: 30, max: 500).
    #[must_use]
    pub const fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Specify the records order attribute(s).
    ///
    /// # Example
    /// ```rust,ignore
    /// .sort("-created,id") // DESC by created, ASC by id
    /// ```
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Filter the returned records. Accepts a raw expression or a built [`Filter`].
    ///
    /// # Example
    /// ```rust,ignore
    /// .filter("language='en' && created>'1970-01-01'")
    /// ```
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Skip the total count query.
    #[must_use]
    pub const fn skip_total(mut self, skip_total: bool) -> Self {
        self.skip_total = skip_total;
        self
    }

    /// Auto expand record relations (up to 6-levels deep).
    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    /// Only return the given comma separated fields.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// The explicitly set parameters, in their canonical order.
    ///
    /// Values are returned verbatim. The client percent-encodes them when
    /// sending, so they must not be pre-encoded.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if self.page != 0 {
            pairs.push(("page", self.page.to_string()));
        }

        if self.per_page != 0 {
            pairs.push(("perPage", self.per_page.to_string()));
        }

        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }

        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }

        if self.skip_total {
            pairs.push(("skipTotal", "true".to_string()));
        }

        if let Some(expand) = &self.expand {
            pairs.push(("expand", expand.clone()));
        }

        if let Some(fields) = &self.fields {
            pairs.push(("fields", fields.clone()));
        }

        pairs
    }

    /// Renders the query string, leading `?` included.
    ///
    /// Returns an empty string when nothing is set. No URL-encoding is
    /// applied.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = String::new();

        for (key, value) in self.query_pairs() {
            query.push(if query.is_empty() { '?' } else { '&' });
            query.push_str(key);
            query.push('=');
            query.push_str(&value);
        }

        query
    }
}

/// Comparison and logical operators of the `PocketBase` filter syntax.
///
/// The `Any*` variants are the "at least one of" forms used on multi-valued
/// fields (`?=`, `?!=`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<=`
    LessThanOrEqual,
    /// `~` (contains / like)
    Like,
    /// `!~`
    NotLike,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `?=`
    AnyEqual,
    /// `?!=`
    AnyNotEqual,
    /// `?~`
    AnyLike,
    /// `?!~`
    AnyNotLike,
    /// `?>`
    AnyGreaterThan,
    /// `?<`
    AnyLessThan,
    /// `?>=`
    AnyGreaterThanOrEqual,
    /// `?<=`
    AnyLessThanOrEqual,
}

impl Operator {
    /// The token used in filter expressions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            Self::Like => "~",
            Self::NotLike => "!~",
            Self::And => "&&",
            Self::Or => "||",
            Self::AnyEqual => "?=",
            Self::AnyNotEqual => "?!=",
            Self::AnyLike => "?~",
            Self::AnyNotLike => "?!~",
            Self::AnyGreaterThan => "?>",
            Self::AnyLessThan => "?<",
            Self::AnyGreaterThanOrEqual => "?>=",
            Self::AnyLessThanOrEqual => "?<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds an AND-joined, parenthesized filter expression.
///
/// Values are appended verbatim: string literals must be quoted by the caller.
/// An empty filter renders as `()`, which `PocketBase` rejects, so check
/// [`Filter::is_empty`] before sending.
///
/// # Example
/// ```rust
/// use pocketbase_users::{Filter, Operator};
///
/// let filter = Filter::new()
///     .add("age", Operator::GreaterThan, "18")
///     .add("role", Operator::Equal, "'admin'")
///     .build();
///
/// assert_eq!(filter, "(age>18 && role='admin')");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<String>,
}

impl Filter {
    /// Creates a filter without clauses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `field`, the operator token and `value`.
    #[must_use]
    pub fn add(mut self, field: &str, operator: Operator, value: &str) -> Self {
        self.clauses
            .push(format!("{field}{}{value}", operator.as_str()));
        self
    }

    /// Whether no clause was added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Renders the expression.
    #[must_use]
    pub fn build(&self) -> String {
        format!("({})", self.clauses.join(" && "))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        filter.build()
    }
}

impl From<&Filter> for String {
    fn from(filter: &Filter) -> Self {
        filter.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_renders_nothing() {
        let query = RecordQuery::default();
        assert_eq!(query.to_query_string(), "");
        assert!(query.query_pairs().is_empty());
    }

    #[test]
    fn zero_numbers_are_unset() {
        let query = RecordQuery::new().page(0).per_page(0).skip_total(false);
        assert_eq!(query.to_query_string(), "");
    }

    #[test]
    fn query_keeps_canonical_order() {
        let query = RecordQuery::new()
            .skip_total(true)
            .filter("(verified=true)")
            .sort("-created")
            .per_page(20)
            .page(3);

        assert_eq!(
            query.to_query_string(),
            "?page=3&perPage=20&sort=-created&filter=(verified=true)&skipTotal=true"
        );
    }

    #[test]
    fn query_only_contains_set_parameters() {
        let query = RecordQuery::new().per_page(10).filter("name~'ann'");
        assert_eq!(query.to_query_string(), "?perPage=10&filter=name~'ann'");

        let keys: Vec<&str> = query.query_pairs().iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["perPage", "filter"]);
    }

    #[test]
    fn skip_total_alone() {
        let query = RecordQuery::new().skip_total(true);
        assert_eq!(query.to_query_string(), "?skipTotal=true");
    }

    #[test]
    fn expand_comes_after_filters() {
        let query = RecordQuery::new().expand("team").page(1);
        assert_eq!(query.to_query_string(), "?page=1&expand=team");
    }

    #[test]
    fn fields_come_last() {
        let query = RecordQuery::new()
            .fields("id,username")
            .expand("team")
            .skip_total(true)
            .per_page(5);

        assert_eq!(
            query.to_query_string(),
            "?perPage=5&skipTotal=true&expand=team&fields=id,username"
        );
    }

    #[test]
    fn filter_joins_clauses() {
        let filter = Filter::new()
            .add("age", Operator::GreaterThan, "18")
            .add("role", Operator::Equal, "'admin'");

        assert_eq!(filter.build(), "(age>18 && role='admin')");
        assert_eq!(filter.to_string(), "(age>18 && role='admin')");
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn filter_single_clause() {
        let filter = Filter::new().add("tags", Operator::AnyLike, "'rust'");
        assert_eq!(filter.build(), "(tags?~'rust')");
    }

    #[test]
    fn empty_filter_renders_empty_parens() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.build(), "()");
    }

    #[test]
    fn filter_feeds_record_query() {
        let filter = Filter::new().add("verified", Operator::Equal, "true");
        let query = RecordQuery::new().filter(&filter);
        assert_eq!(query.to_query_string(), "?filter=(verified=true)");
    }

    #[test]
    fn operator_tokens() {
        let expected = [
            (Operator::Equal, "="),
            (Operator::NotEqual, "!="),
            (Operator::GreaterThan, ">"),
            (Operator::LessThan, "<"),
            (Operator::GreaterThanOrEqual, ">="),
            (Operator::LessThanOrEqual, "<="),
            (Operator::Like, "~"),
            (Operator::NotLike, "!~"),
            (Operator::And, "&&"),
            (Operator::Or, "||"),
            (Operator::AnyEqual, "?="),
            (Operator::AnyNotEqual, "?!="),
            (Operator::AnyLike, "?~"),
            (Operator::AnyNotLike, "?!~"),
            (Operator::AnyGreaterThan, "?>"),
            (Operator::AnyLessThan, "?<"),
            (Operator::AnyGreaterThanOrEqual, "?>="),
            (Operator::AnyLessThanOrEqual, "?<="),
        ];

        for (operator, token) in expected {
            assert_eq!(operator.as_str(), token);
        }
    }
}
