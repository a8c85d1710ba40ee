use crate::collection::UpdateOperator;
use crate::common::Value;
use crate::filter::{Condition, RegexCondition};

/// Operator builders, mirroring the `db.command` helper of a cloud database
/// client.
///
/// Query operators return a [Condition]; update operators return an
/// [UpdateOperator]. Both convert into a [Value] so they can sit inside a
/// `doc!` literal. Names that collide with Rust keywords carry a trailing
/// underscore (`in_`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Command;

impl Command {
    /// True if any of `conditions` holds.
    pub fn or<I, C>(&self, conditions: I) -> Condition
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Condition::Or(conditions.into_iter().map(Into::into).collect())
    }

    /// True if all of `conditions` hold.
    pub fn and<I, C>(&self, conditions: I) -> Condition
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Condition::And(conditions.into_iter().map(Into::into).collect())
    }

    pub fn in_<I, T>(&self, values: I) -> Condition
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Condition::In(values.into_iter().map(Into::into).collect())
    }

    pub fn nin<I, T>(&self, values: I) -> Condition
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Condition::Nin(values.into_iter().map(Into::into).collect())
    }

    /// Null counts as missing.
    pub fn exists(&self, flag: bool) -> Condition {
        Condition::Exists(flag)
    }

    pub fn eq<T: Into<Value>>(&self, value: T) -> Condition {
        Condition::Eq(value.into())
    }

    pub fn neq<T: Into<Value>>(&self, value: T) -> Condition {
        Condition::Neq(value.into())
    }

    pub fn gt<T: Into<Value>>(&self, value: T) -> Condition {
        Condition::Gt(value.into())
    }

    pub fn gte<T: Into<Value>>(&self, value: T) -> Condition {
        Condition::Gte(value.into())
    }

    pub fn lt<T: Into<Value>>(&self, value: T) -> Condition {
        Condition::Lt(value.into())
    }

    pub fn lte<T: Into<Value>>(&self, value: T) -> Condition {
        Condition::Lte(value.into())
    }

    pub fn inc<T: Into<Value>>(&self, amount: T) -> UpdateOperator {
        UpdateOperator::Inc(amount.into())
    }

    /// Appends a value, or each element of a list, to an array field.
    pub fn push<T: Into<Value>>(&self, value: T) -> UpdateOperator {
        match value.into() {
            Value::Array(values) => UpdateOperator::Push(values),
            value => UpdateOperator::Push(vec![value]),
        }
    }

    pub fn set<T: Into<Value>>(&self, value: T) -> UpdateOperator {
        UpdateOperator::Set(value.into())
    }

    pub fn remove(&self) -> UpdateOperator {
        UpdateOperator::Remove
    }
}

/// Creates a regular expression condition, like `db.RegExp({regexp, options})`.
pub fn reg_exp(pattern: &str, options: &str) -> Condition {
    Condition::Regex(RegexCondition::new(pattern, options))
}
