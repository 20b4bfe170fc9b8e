//! Filter conditions.
//!
//! A condition is decided once, at parse time, to be a `contains` test, a
//! `not_contains` test or a relational predicate. The fold over the condition
//! list never re-inspects the raw text.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Term-matching relation of a `contains` style condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Contains,
    NotContains,
}

impl Relation {
    /// Keyword used for this relation in the condition language.
    pub fn keyword(&self) -> &'static str {
        match self {
            Relation::Contains => "contains",
            Relation::NotContains => "not_contains",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// `|`-separated match alternatives, kept as a single regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSet {
    pattern: String,
}

impl TermSet {
    /// Wraps a pattern as given; term-list lines are joined verbatim.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compiles the alternation as a case-sensitive, unanchored regex.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.pattern)
    }
}

/// Relational and equality operators of the predicate language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            _ => None,
        }
    }

    /// Decides the operator from a comparison result.
    ///
    /// `None` means the operands are incomparable (NaN, missing, or a text
    /// that is not a number); only `!=` holds then.
    pub fn holds(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (CompareOp::Ne, None) => true,
            (_, None) => false,
            (CompareOp::Eq, Some(ord)) => ord == Ordering::Equal,
            (CompareOp::Ne, Some(ord)) => ord != Ordering::Equal,
            (CompareOp::Lt, Some(ord)) => ord == Ordering::Less,
            (CompareOp::Le, Some(ord)) => ord != Ordering::Greater,
            (CompareOp::Gt, Some(ord)) => ord == Ordering::Greater,
            (CompareOp::Ge, Some(ord)) => ord != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Column(String),
    Number(f64),
    Text(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(name) => write_column(f, name),
            Operand::Number(value) => write!(f, "{value}"),
            Operand::Text(text) => {
                write!(f, "\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
            }
        }
    }
}

/// Boolean row predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Compare {
        op: CompareOp,
        left: Operand,
        right: Operand,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(left: Operand, op: CompareOp, right: Operand) -> Self {
        Predicate::Compare { op, left, right }
    }

    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Column operands in order of appearance, duplicates included.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Compare { left, right, .. } => {
                for operand in [left, right] {
                    if let Operand::Column(name) = operand {
                        out.push(name);
                    }
                }
            }
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Predicate::Not(inner) => inner.collect_columns(out),
        }
    }

    /// Renames every column operand equal to `from`.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self {
            Predicate::Compare { left, right, .. } => {
                let mut changed = false;
                for operand in [left, right] {
                    if let Operand::Column(name) = operand
                        && name.as_str() == from
                    {
                        *name = to.to_string();
                        changed = true;
                    }
                }
                changed
            }
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                let l = left.rename_column(from, to);
                let r = right.rename_column(from, to);
                l || r
            }
            Predicate::Not(inner) => inner.rename_column(from, to),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { op, left, right } => write!(f, "{left} {op} {right}"),
            Predicate::Or(left, right) => write!(f, "{left} | {right}"),
            Predicate::And(left, right) => {
                write_and_operand(f, left)?;
                f.write_str(" & ")?;
                write_and_operand(f, right)
            }
            Predicate::Not(inner) => write!(f, "~({inner})"),
        }
    }
}

fn write_and_operand(f: &mut fmt::Formatter<'_>, predicate: &Predicate) -> fmt::Result {
    if matches!(predicate, Predicate::Or(..)) {
        write!(f, "({predicate})")
    } else {
        write!(f, "{predicate}")
    }
}

/// Characters that end a bare word in the condition language.
pub fn is_word_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '|' | '&' | '~' | '<' | '>' | '=' | '!' | '"' | '\'' | '`')
}

fn write_column(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if name.is_empty() || name.chars().any(is_word_delimiter) {
        write!(f, "`{name}`")
    } else {
        f.write_str(name)
    }
}

/// A parsed filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Contains { column: String, terms: TermSet },
    NotContains { column: String, terms: TermSet },
    Predicate { column: String, predicate: Predicate },
}

impl Condition {
    pub fn contains(column: impl Into<String>, terms: TermSet) -> Self {
        Condition::Contains {
            column: column.into(),
            terms,
        }
    }

    pub fn not_contains(column: impl Into<String>, terms: TermSet) -> Self {
        Condition::NotContains {
            column: column.into(),
            terms,
        }
    }

    pub fn with_relation(relation: Relation, column: impl Into<String>, terms: TermSet) -> Self {
        match relation {
            Relation::Contains => Self::contains(column, terms),
            Relation::NotContains => Self::not_contains(column, terms),
        }
    }

    /// The leading column the condition is resolved against.
    pub fn column(&self) -> &str {
        match self {
            Condition::Contains { column, .. }
            | Condition::NotContains { column, .. }
            | Condition::Predicate { column, .. } => column,
        }
    }

    /// The term relation, or `None` for relational predicates.
    pub fn relation(&self) -> Option<Relation> {
        match self {
            Condition::Contains { .. } => Some(Relation::Contains),
            Condition::NotContains { .. } => Some(Relation::NotContains),
            Condition::Predicate { .. } => None,
        }
    }

    /// Rewrites references to a renamed column.
    ///
    /// The leading column is rewritten when it equals `from` or starts with
    /// `from` followed by a `.` suffix (a name that still carries a file
    /// extension). Predicate operands are rewritten on exact match.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let (column, predicate) = match self {
            Condition::Contains { column, .. } | Condition::NotContains { column, .. } => {
                (column, None)
            }
            Condition::Predicate { column, predicate } => (column, Some(predicate)),
        };
        let mut changed = false;
        if let Some(renamed) = rename_prefix(column, from, to) {
            *column = renamed;
            changed = true;
        }
        if let Some(predicate) = predicate {
            changed |= predicate.rename_column(from, to);
        }
        changed
    }
}

fn rename_prefix(column: &str, from: &str, to: &str) -> Option<String> {
    if column == from {
        return Some(to.to_string());
    }
    let rest = column.strip_prefix(from)?;
    rest.starts_with('.').then(|| format!("{to}{rest}"))
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Contains { column, terms } | Condition::NotContains { column, terms } => {
                write_column(f, column)?;
                let relation = self.relation().unwrap_or(Relation::Contains);
                write!(f, " {relation} {}", terms.pattern())
            }
            Condition::Predicate { predicate, .. } => write!(f, "{predicate}"),
        }
    }
}
