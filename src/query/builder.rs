use std::fmt::Write;

use super::pagination::Page;
use crate::db::EntityKind;

/// A constant inside a predicate. Text is always rendered as a quoted SQL
/// string literal with embedded quotes doubled, so no value can end the
/// literal early.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
}

impl Literal {
    fn render(&self, out: &mut String) {
        match self {
            Literal::Text(s) => {
                out.push('\'');
                for c in s.chars() {
                    match c {
                        '\'' => out.push_str("''"),
                        // SQLite stops reading statement text at a NUL.
                        '\0' => {}
                        c => out.push(c),
                    }
                }
                out.push('\'');
            }
            Literal::Integer(n) => {
                let _ = write!(out, "{}", n);
            }
            Literal::Real(f) if f.is_finite() => {
                let _ = write!(out, "{:?}", f);
            }
            Literal::Real(_) => out.push_str("NULL"),
            Literal::Bool(b) => out.push(if *b { '1' } else { '0' }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Substring match against a text column.
    Contains { field: &'static str, needle: String },
    Equals { field: &'static str, value: Literal },
    AtLeast { field: &'static str, value: Literal },
    /// Membership of `value` in a column holding a JSON array of strings.
    Includes {
        field: &'static str,
        value: String,
        ignore_case: bool,
    },
}

impl Predicate {
    fn render(&self, table: &str, out: &mut String) {
        match self {
            Predicate::Contains { field, needle } => {
                let _ = write!(out, "instr({}, ", field);
                Literal::Text(needle.clone()).render(out);
                out.push_str(") > 0");
            }
            Predicate::Equals { field, value } => {
                let _ = write!(out, "{} = ", field);
                value.render(out);
            }
            Predicate::AtLeast { field, value } => {
                let _ = write!(out, "{} >= ", field);
                value.render(out);
            }
            Predicate::Includes {
                field,
                value,
                ignore_case,
            } => {
                let _ = write!(
                    out,
                    "EXISTS (SELECT 1 FROM json_each({}.{}) WHERE ",
                    table, field
                );
                if *ignore_case {
                    // lower() in SQLite folds ASCII only; match it.
                    out.push_str("lower(json_each.value) = ");
                    Literal::Text(value.to_ascii_lowercase()).render(out);
                } else {
                    out.push_str("json_each.value = ");
                    Literal::Text(value.clone()).render(out);
                }
                out.push(')');
            }
        }
    }
}

/// Normalize a free text search term: trimmed and lowercased, `None` when
/// nothing is left. Quote escaping happens when the predicate is rendered.
pub fn search_term(q: &str) -> Option<String> {
    let term = q.trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}

/// A "select every document of one kind" query narrowed by a conjunction
/// of predicates, in a fixed order and cut to one page.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    kind: EntityKind,
    predicates: Vec<Predicate>,
    page: Page,
}

impl DocumentQuery {
    pub fn new(kind: EntityKind, page: Page) -> Self {
        Self {
            kind,
            predicates: Vec::new(),
            page,
        }
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn to_sql(&self) -> String {
        let table = self.kind.collection();
        let mut sql = format!("SELECT {} FROM {}", self.kind.columns(), table);

        for (i, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            predicate.render(table, &mut sql);
        }

        // text_search is the lowercased title or name; id breaks ties.
        sql.push_str(" ORDER BY text_search, id");
        let _ = write!(
            sql,
            " LIMIT {} OFFSET {}",
            self.page.limit, self.page.offset
        );
        sql
    }
}
