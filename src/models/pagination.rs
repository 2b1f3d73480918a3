//! Page and ordering parameters shared by list endpoints

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::PaginationConfig;
use crate::models::social::{Comment, Post};

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(PostPage = Paginated<Post>, CommentPage = Paginated<Comment>)]
pub struct Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Total number of matching records
    pub count: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Records per page
    pub page_size: i64,
    /// Records on this page; empty past the last page
    pub results: Vec<T>,
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Clamp client values: pages start at 1, sizes fall back to the default
    /// and never exceed the configured maximum
    pub fn new(page: Option<i64>, page_size: Option<i64>, config: &PaginationConfig) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let page_size = page_size
            .filter(|s| *s >= 1)
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);
        Self { page, page_size }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn wrap<T>(&self, results: Vec<T>, count: i64) -> Paginated<T>
    where
        T: for<'a> ToSchema<'a>,
    {
        Paginated {
            count,
            page: self.page,
            page_size: self.page_size,
            results,
        }
    }
}

/// One `ORDER BY` term restricted to an allow-list of columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderTerm {
    pub const fn desc(column: &'static str) -> Self {
        Self { column, descending: true }
    }

    pub fn sql(&self, table: &str) -> String {
        format!(
            "{}.{} {}",
            table,
            self.column,
            if self.descending { "DESC" } else { "ASC" }
        )
    }
}

/// Parse `ordering=title,-created_at`. Unknown fields are dropped; when
/// nothing valid remains the default applies.
pub fn parse_ordering(raw: Option<&str>, allowed: &[&'static str], default: OrderTerm) -> Vec<OrderTerm> {
    let terms: Vec<OrderTerm> = raw
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|term| {
            let (descending, name) = match term.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, term),
            };
            allowed
                .iter()
                .find(|c| **c == name)
                .map(|column| OrderTerm { column: *column, descending })
        })
        .collect();

    if terms.is_empty() {
        vec![default]
    } else {
        terms
    }
}

/// Render an `ORDER BY` clause with an id tie-breaker following the first term
pub fn order_by_clause(terms: &[OrderTerm], table: &str) -> String {
    let mut parts: Vec<String> = terms.iter().map(|t| t.sql(table)).collect();
    let tie = if terms.first().map(|t| t.descending).unwrap_or(false) {
        "DESC"
    } else {
        "ASC"
    };
    parts.push(format!("{}.id {}", table, tie));
    format!("ORDER BY {}", parts.join(", "))
}

/// Escape a user term for `LIKE ... ESCAPE '\'` and wrap it in wildcards
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
