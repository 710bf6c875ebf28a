//! # Column filters
//!
//! Typed predicates applied to the ranked candidate table. A [`Filter`] compares one column
//! with a literal using a [`CompareOp`]; a [`FilterSet`] keeps a row only if **every** filter
//! accepts it. An empty set accepts everything.
//!
//! Filters are plain data evaluated against in-memory [`Value`]s, so no query string is ever
//! interpreted at ranking time. For convenience they can still be written as text:
//!
//! ```text
//! <column> <op> <literal>
//! ```
//!
//! * `column`: an identifier (`magMax`, `abs_delta_dec_lat`) or a back-quoted name
//!   (`` `B-V` ``),
//! * `op`: one of `<`, `<=`, `>`, `>=`, `==`, `!=`,
//! * `literal`: a number (`12`, `-0.5`, `1e-2`) or a quoted string (`'EW'`, `"M"`).
//!
//! ```rust
//! use target_selector::filters::{CompareOp, Filter};
//!
//! let f: Filter = "magMax <= 12".parse().unwrap();
//! assert_eq!(f, Filter::new("magMax", CompareOp::Le, 12.0));
//! ```
//!
//! ## Missing values
//!
//! Comparisons involving a missing value, NaN, or a number/text mix are false, except `!=`
//! which is true. This is the IEEE NaN convention.
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, recognize, value},
    number::complete::double,
    sequence::{delimited, pair},
    IResult, Parser,
};

use crate::catalog::Value;
use crate::selector_errors::SelectorError;

/// Comparison operator of a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    /// Apply the operator to the outcome of a comparison (`None` = unordered).
    pub fn accepts(&self, ordering: Option<Ordering>) -> bool {
        use Ordering::*;
        match self {
            CompareOp::Lt => ordering == Some(Less),
            CompareOp::Le => matches!(ordering, Some(Less) | Some(Equal)),
            CompareOp::Gt => ordering == Some(Greater),
            CompareOp::Ge => matches!(ordering, Some(Greater) | Some(Equal)),
            CompareOp::Eq => ordering == Some(Equal),
            CompareOp::Ne => ordering != Some(Equal),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single `column op literal` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: CompareOp,
    pub literal: Value,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: CompareOp, literal: impl Into<Value>) -> Self {
        Filter {
            column: column.into(),
            op,
            literal: literal.into(),
        }
    }

    /// Evaluate the predicate on the value of [`Self::column`] for one row.
    pub fn matches(&self, value: &Value) -> bool {
        self.op.accepts(value.compare(&self.literal))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Value::Text(s) => write!(f, "{} {} '{}'", self.column, self.op, s),
            lit => write!(f, "{} {} {}", self.column, self.op, lit),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn parse_column(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('`'), take_while1(|c: char| c != '`'), char('`')),
        recognize(pair(take_while1(is_ident_start), take_while(is_ident_char))),
    ))
    .parse(input)
}

fn parse_operator(input: &str) -> IResult<&str, CompareOp> {
    // two-character operators first so `<=` is not read as `<`
    alt((
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Eq, tag("==")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Lt, tag("<")),
        value(CompareOp::Gt, tag(">")),
    ))
    .parse(input)
}

fn parse_literal(input: &str) -> IResult<&str, Value> {
    alt((
        map(
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            Value::from,
        ),
        map(
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
            Value::from,
        ),
        map(double, Value::Number),
    ))
    .parse(input)
}

fn parse_filter(input: &str) -> IResult<&str, Filter> {
    all_consuming(map(
        (
            delimited(multispace0, parse_column, multispace0),
            parse_operator,
            delimited(multispace0, parse_literal, multispace0),
        ),
        |(column, op, literal)| Filter::new(column, op, literal),
    ))
    .parse(input)
}

impl FromStr for Filter {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_filter(s)
            .map(|(_, filter)| filter)
            .map_err(|_| SelectorError::InvalidFilterExpression(s.to_string()))
    }
}

/// Conjunction of [`Filter`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new(filters: Vec<Filter>) -> Self {
        FilterSet { filters }
    }

    /// Parse every expression; the first malformed one aborts with
    /// [`SelectorError::InvalidFilterExpression`].
    pub fn parse_all<I, S>(expressions: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filters = expressions
            .into_iter()
            .map(|e| e.as_ref().parse::<Filter>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FilterSet { filters })
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<T: IntoIterator<Item = Filter>>(iter: T) -> Self {
        FilterSet::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}
