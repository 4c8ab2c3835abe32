//! Filters and the visitor used to evaluate them.
//!
//! A [`Filter`] is a conjunction of field equality conditions. Filters usually come
//! from the text form accepted by [`crate::parser::parse`], but they can also be built
//! directly:
//!
//! ```
//! use methoddb_core::query::Filter;
//!
//! let filter = Filter::builder()
//!     .eq("username", "johnperry")
//!     .eq("age", 75)
//!     .build();
//!
//! assert_eq!(filter.to_string(), r#"{username:"johnperry",age:75}"#);
//! ```
//!
//! Backends evaluate filters by implementing [`FilterVisitor`].

use std::fmt;

use crate::value::Value;

/// A single `field == value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The field name to compare.
    pub field: String,
    /// The value the field must hold.
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// An ordered set of equality conditions, all of which must hold for a document to
/// match. The empty filter matches every document.
///
/// Field names are unique within a filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Creates the empty filter, which matches every document.
    pub fn new() -> Self {
        Filter { conditions: Vec::new() }
    }

    /// Creates a filter with a single equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::builder().eq(field, value).build()
    }

    /// Creates a new filter builder for fluent construction.
    pub fn builder() -> FilterBuilder {
        FilterBuilder::new()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns the expected value for `field`, if the filter constrains it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.conditions
            .iter()
            .find(|condition| condition.field == field)
            .map(|condition| &condition.value)
    }

    /// Appends a condition unless the field is already constrained, in which case the
    /// condition is handed back and the filter is left unchanged.
    pub(crate) fn try_push(&mut self, condition: Condition) -> Result<(), Condition> {
        if self.get(&condition.field).is_some() {
            return Err(condition);
        }
        self.conditions.push(condition);
        Ok(())
    }
}

/// Renders the filter in the text form accepted by the parser.
///
/// Field names are written as they are. The output parses back to an equal filter only
/// when every field name is an identifier (`[A-Za-z_][A-Za-z0-9_]*`) and every float
/// is finite, which always holds for filters produced by the parser.
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", condition.field, condition.value)?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filter: Filter,
}

impl FilterBuilder {
    pub fn new() -> Self {
        FilterBuilder { filter: Filter::new() }
    }

    /// Requires `field` to equal `value`.
    ///
    /// If `field` was already constrained, the new value replaces the old one in place.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let condition = Condition::new(field, value);
        match self
            .filter
            .conditions
            .iter_mut()
            .find(|existing| existing.field == condition.field)
        {
            Some(existing) => existing.value = condition.value,
            None => self.filter.conditions.push(condition),
        }
        self
    }

    pub fn build(self) -> Filter {
        self.filter
    }
}

/// Walks a [`Filter`], producing an output per condition and combining them.
///
/// The default [`FilterVisitor::visit_filter`] treats the filter as a conjunction and
/// stops at the first condition that does not hold.
pub trait FilterVisitor {
    type Error;

    fn visit_condition(&mut self, field: &str, value: &Value) -> Result<bool, Self::Error>;

    fn visit_filter(&mut self, filter: &Filter) -> Result<bool, Self::Error> {
        for condition in filter.conditions() {
            if !self.visit_condition(&condition.field, &condition.value)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_replaces_repeated_fields() {
        let filter = Filter::builder()
            .eq("age", 75)
            .eq("username", "johnperry")
            .eq("age", 76)
            .build();
        assert_eq!(filter.len(), 2);
        assert_eq!(filter.get("age"), Some(&Value::Integer(76)));
        assert_eq!(filter.conditions()[0].field, "age");
    }

    #[test]
    fn try_push_rejects_duplicates() {
        let mut filter = Filter::new();
        assert!(filter.try_push(Condition::new("age", 75)).is_ok());
        let rejected = filter.try_push(Condition::new("age", 76)).unwrap_err();
        assert_eq!(rejected.value, Value::Integer(76));
        assert_eq!(filter.get("age"), Some(&Value::Integer(75)));
    }

    #[test]
    fn empty_filter_displays_as_braces() {
        assert_eq!(Filter::new().to_string(), "{}");
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        let filter = Filter::builder()
            .eq("tiny", 1e-5)
            .eq("huge", -1e20)
            .eq("whole", 75.0)
            .eq("name", "say \"hi\"")
            .eq("missing", None::<i64>)
            .build();
        assert_eq!(crate::parser::parse(&filter.to_string()).unwrap(), filter);
    }

    #[test]
    fn non_identifier_fields_render_verbatim() {
        let filter = Filter::eq("user-name", 1);
        assert_eq!(filter.to_string(), "{user-name:1}");
        assert!(crate::parser::parse(&filter.to_string()).is_err());
    }

    struct CountingVisitor {
        visited: usize,
    }

    impl FilterVisitor for CountingVisitor {
        type Error = ();

        fn visit_condition(&mut self, field: &str, _value: &Value) -> Result<bool, ()> {
            self.visited += 1;
            Ok(field != "stop")
        }
    }

    #[test]
    fn visit_filter_short_circuits() {
        let filter = Filter::builder()
            .eq("a", 1)
            .eq("stop", 2)
            .eq("c", 3)
            .build();
        let mut visitor = CountingVisitor { visited: 0 };
        assert_eq!(visitor.visit_filter(&filter), Ok(false));
        assert_eq!(visitor.visited, 2);
    }
}
