//! Builds parameterized SELECTs over the shop tables. Identifiers come from row type
//! declarations only; caller input is always bound as a parameter.

use super::params::SqlParam;

const MAIN_ALIAS: &str = "main";

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Escape `%`, `_` and `\` so a search term matches literally inside ILIKE.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }
}

/// One ORDER BY term on a column of the main table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderTerm {
    pub fn asc(column: &'static str) -> Self {
        OrderTerm { column, descending: false }
    }

    pub fn desc(column: &'static str) -> Self {
        OrderTerm { column, descending: true }
    }
}

/// A filtered, ordered listing over one table aliased as `main`, optionally joined.
/// Produces the COUNT and the page SELECT from the same filters.
pub struct ListQuery<'a> {
    table: &'a str,
    columns: &'a [&'a str],
    joins: Vec<String>,
    where_parts: Vec<String>,
    order: Vec<OrderTerm>,
    params: Vec<SqlParam>,
}

impl<'a> ListQuery<'a> {
    pub fn new(table: &'a str, columns: &'a [&'a str]) -> Self {
        ListQuery {
            table,
            columns,
            joins: Vec::new(),
            where_parts: Vec::new(),
            order: Vec::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// `JOIN <table> <alias> ON <alias>.<their_key> = main.<our_key>`.
    pub fn join(mut self, table: &str, alias: &str, their_key: &str, our_key: &str) -> Self {
        self.joins.push(format!(
            " JOIN {} {} ON {}.{} = {}.{}",
            quoted(table),
            alias,
            alias,
            quoted(their_key),
            MAIN_ALIAS,
            quoted(our_key)
        ));
        self
    }

    /// main.<column> = $n
    pub fn filter_eq(mut self, column: &str, value: i64) -> Self {
        let n = self.push_param(SqlParam::BigInt(value));
        self.where_parts
            .push(format!("{}.{} = ${}", MAIN_ALIAS, quoted(column), n));
        self
    }

    /// <alias>.<column> ILIKE '%term%' for each term (all must match).
    pub fn filter_contains_all(mut self, alias: &str, column: &str, terms: &[String]) -> Self {
        for term in terms {
            let n = self.push_param(SqlParam::Text(format!("%{}%", escape_like(term))));
            self.where_parts
                .push(format!("{}.{} ILIKE ${}", alias, quoted(column), n));
        }
        self
    }

    pub fn order_by(mut self, terms: impl IntoIterator<Item = OrderTerm>) -> Self {
        self.order.extend(terms);
        self
    }

    fn from_clause(&self) -> String {
        let mut s = format!(" FROM {} {}", quoted(self.table), MAIN_ALIAS);
        for j in &self.joins {
            s.push_str(j);
        }
        if !self.where_parts.is_empty() {
            s.push_str(" WHERE ");
            s.push_str(&self.where_parts.join(" AND "));
        }
        s
    }

    pub fn count(&self) -> QueryBuf {
        let mut q = QueryBuf::new();
        q.sql = format!("SELECT COUNT(*){}", self.from_clause());
        q.params = self.params.clone();
        q
    }

    /// Page SELECT. The primary key is appended as the final ORDER BY term so pages are
    /// stable when the requested ordering has ties.
    pub fn page(&self, limit: u64, offset: u64) -> QueryBuf {
        let mut q = QueryBuf::new();
        let cols = self
            .columns
            .iter()
            .map(|c| format!("{}.{}", MAIN_ALIAS, quoted(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut order: Vec<String> = self
            .order
            .iter()
            .map(|t| {
                format!(
                    "{}.{} {}",
                    MAIN_ALIAS,
                    quoted(t.column),
                    if t.descending { "DESC" } else { "ASC" }
                )
            })
            .collect();
        if !self.order.iter().any(|t| t.column == "id") {
            order.push(format!("{}.{} ASC", MAIN_ALIAS, quoted("id")));
        }
        q.sql = format!(
            "SELECT {}{} ORDER BY {} LIMIT {} OFFSET {}",
            cols,
            self.from_clause(),
            order.join(", "),
            limit,
            offset
        );
        q.params = self.params.clone();
        q
    }
}

/// SELECT <columns> FROM <table> WHERE id = $1. Caller binds the id.
pub fn select_by_id(table: &str, columns: &[&str]) -> String {
    let cols = columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ");
    format!("SELECT {} FROM {} WHERE {} = $1", cols, quoted(table), quoted("id"))
}

/// SELECT <columns> FROM <table> WHERE <column> = ANY($1) ORDER BY id. Used for
/// batch-loading related rows; caller binds the id array.
pub fn select_by_column_in(table: &str, columns: &[&str], column: &str) -> String {
    let cols = columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ");
    format!(
        "SELECT {} FROM {} WHERE {} = ANY($1) ORDER BY {}",
        cols,
        quoted(table),
        quoted(column),
        quoted("id")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_terms_are_escaped() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }

    #[test]
    fn page_appends_pk_tiebreak_and_binds_filters() {
        let q = ListQuery::new("orders", &["id", "user_id", "created_at"])
            .filter_eq("user_id", 7)
            .order_by([OrderTerm::asc("created_at")]);
        let page = q.page(10, 20);
        assert_eq!(
            page.sql,
            "SELECT main.\"id\", main.\"user_id\", main.\"created_at\" FROM \"orders\" main \
             WHERE main.\"user_id\" = $1 ORDER BY main.\"created_at\" ASC, main.\"id\" ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(page.params, vec![SqlParam::BigInt(7)]);
        assert_eq!(
            q.count().sql,
            "SELECT COUNT(*) FROM \"orders\" main WHERE main.\"user_id\" = $1"
        );
    }

    #[test]
    fn search_joins_and_numbers_placeholders() {
        let q = ListQuery::new("wines", &["id"])
            .join("products", "p", "id", "product_id")
            .filter_contains_all("p", "name_of_product", &["red".into(), "50%".into()])
            .order_by([OrderTerm::desc("alcohol")]);
        let page = q.page(10, 0);
        assert!(page.sql.contains(
            "FROM \"wines\" main JOIN \"products\" p ON p.\"id\" = main.\"product_id\" \
             WHERE p.\"name_of_product\" ILIKE $1 AND p.\"name_of_product\" ILIKE $2"
        ));
        assert!(page.sql.contains("ORDER BY main.\"alcohol\" DESC, main.\"id\" ASC"));
        assert_eq!(page.params[1], SqlParam::Text("%50\\%%".into()));
    }

    #[test]
    fn batch_select_uses_any() {
        assert_eq!(
            select_by_column_in("countries", &["id", "name"], "id"),
            "SELECT \"id\", \"name\" FROM \"countries\" WHERE \"id\" = ANY($1) ORDER BY \"id\""
        );
    }
}
