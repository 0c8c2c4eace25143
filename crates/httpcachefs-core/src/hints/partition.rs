//! Partition column detection.
//!
//! Parses the query with the generic SQL grammar, finds the first WHERE
//! clause anywhere in the statement and returns the first column compared
//! with `=` or tested with `IN` anywhere below it. "First" is breadth-first:
//! shallower nodes win, then left before right within a depth. Both searches
//! run as a single pre-order walk that keeps the best-ranked candidate, since
//! at equal depth pre-order and breadth-first order agree.

use super::source_url::from_literal_pattern;
use regex::Captures;
use sqlparser::ast::{
    BinaryOperator, Expr, Query, SetExpr, Statement, TableFactor, Visit, Visitor,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::ops::ControlFlow;

/// Extract the column a query's WHERE clause filters on.
///
/// Returns `None` when the SQL does not parse, has no WHERE clause, or has
/// no equality/membership predicate on a plain column. Qualified references
/// (`t.id`) yield the bare column name.
///
/// ```
/// use httpcachefs_core::hints::extract_partition_column;
///
/// assert_eq!(
///     extract_partition_column("SELECT * FROM t WHERE t.id = 1 AND status = 2").as_deref(),
///     Some("id")
/// );
/// assert_eq!(extract_partition_column("SELECT * FROM t WHERE LOWER(name) = 'x'"), None);
/// ```
pub fn extract_partition_column(sql: &str) -> Option<String> {
    let sql = quote_literal_sources(sql);
    let statements = match Parser::parse_sql(&GenericDialect {}, &sql) {
        Ok(statements) => statements,
        Err(err) => {
            tracing::debug!(error = %err, "query not parseable, no partition hint");
            return None;
        }
    };

    let query = match statements.first()? {
        Statement::Query(query) => query,
        _ => return None,
    };

    let mut finder = WhereFinder::default();
    let _ = query.visit(&mut finder);
    finder.first.into_inner().flatten()
}

/// The generic grammar has no string-literal table sources, so rewrite
/// `FROM 'x'` as the quoted identifier `FROM "x"` before parsing.
fn quote_literal_sources(sql: &str) -> Cow<'_, str> {
    from_literal_pattern().replace_all(sql, |caps: &Captures<'_>| {
        format!("FROM \"{}\"", caps[1].replace('"', "\"\""))
    })
}

/// (depth, pre-order index)
type Rank = (usize, usize);

/// Best-ranked value offered during a pre-order walk.
struct Earliest<T> {
    best: Option<(Rank, T)>,
}

impl<T> Default for Earliest<T> {
    fn default() -> Self {
        Self { best: None }
    }
}

impl<T> Earliest<T> {
    /// Keep the value produced by `make` if `rank` beats the current best.
    fn offer(&mut self, rank: Rank, make: impl FnOnce() -> T) {
        let better = self.best.as_ref().map_or(true, |(best, _)| rank < *best);
        if better {
            self.best = Some((rank, make()));
        }
    }

    fn into_inner(self) -> Option<T> {
        self.best.map(|(_, value)| value)
    }
}

/// Locates the first WHERE clause: in the outer query, set-operation
/// branches, CTEs, derived or nested-join tables, or subqueries inside
/// any expression.
#[derive(Default)]
struct WhereFinder {
    depth: usize,
    seen: usize,
    /// Partition column of the first WHERE clause, if it has one
    first: Earliest<Option<String>>,
}

impl WhereFinder {
    fn enter(&mut self) -> ControlFlow<()> {
        self.depth += 1;
        ControlFlow::Continue(())
    }

    fn leave(&mut self) -> ControlFlow<()> {
        self.depth = self.depth.saturating_sub(1);
        ControlFlow::Continue(())
    }
}

impl Visitor for WhereFinder {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<()> {
        self.depth += 1;
        // Selects owned by this query directly; nested queries get their
        // own pre_visit_query call.
        let mut bodies = VecDeque::from([(self.depth, query.body.as_ref())]);
        while let Some((depth, body)) = bodies.pop_front() {
            match body {
                SetExpr::Select(select) => {
                    if let Some(selection) = &select.selection {
                        self.seen += 1;
                        self.first
                            .offer((depth, self.seen), || first_predicate_column(selection));
                    }
                }
                SetExpr::SetOperation { left, right, .. } => {
                    bodies.push_back((depth + 1, left.as_ref()));
                    bodies.push_back((depth + 1, right.as_ref()));
                }
                _ => {}
            }
        }
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &Query) -> ControlFlow<()> {
        self.leave()
    }

    fn pre_visit_table_factor(&mut self, _table_factor: &TableFactor) -> ControlFlow<()> {
        self.enter()
    }

    fn post_visit_table_factor(&mut self, _table_factor: &TableFactor) -> ControlFlow<()> {
        self.leave()
    }

    fn pre_visit_expr(&mut self, _expr: &Expr) -> ControlFlow<()> {
        self.enter()
    }

    fn post_visit_expr(&mut self, _expr: &Expr) -> ControlFlow<()> {
        self.leave()
    }
}

/// First `col = …` / `col IN …` predicate anywhere below `selection`,
/// including inside function arguments, CASE arms, casts and subqueries.
fn first_predicate_column(selection: &Expr) -> Option<String> {
    let mut finder = PredicateFinder::default();
    let _ = selection.visit(&mut finder);
    finder.first.into_inner()
}

#[derive(Default)]
struct PredicateFinder {
    depth: usize,
    seen: usize,
    first: Earliest<String>,
}

impl Visitor for PredicateFinder {
    type Break = ();

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<()> {
        self.depth += 1;
        self.seen += 1;
        if let Some(column) = predicate_subject(expr).and_then(column_name) {
            self.first.offer((self.depth, self.seen), || column);
        }
        ControlFlow::Continue(())
    }

    fn post_visit_expr(&mut self, _expr: &Expr) -> ControlFlow<()> {
        self.depth = self.depth.saturating_sub(1);
        ControlFlow::Continue(())
    }
}

/// Left side of an equality, or the tested side of a membership check.
fn predicate_subject(expr: &Expr) -> Option<&Expr> {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Eq,
            ..
        } => Some(left.as_ref()),
        Expr::InList { expr, .. }
        | Expr::InSubquery { expr, .. }
        | Expr::InUnnest { expr, .. } => Some(expr.as_ref()),
        _ => None,
    }
}

/// Unqualified name of a bare or qualified column reference.
fn column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => parts.last().map(|ident| ident.value.clone()),
        _ => None,
    }
}
