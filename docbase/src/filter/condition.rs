use crate::collection::Document;
use crate::common::{
    FieldPath, Value, CMD_CONDITIONS, CMD_FLAG, CMD_OPTIONS, CMD_REGEXP, CMD_TAG, CMD_VALUE,
    CMD_VALUES,
};
use crate::errors::{DocbaseError, DocbaseResult, ErrorKind};
use regex::{Regex, RegexBuilder};
use std::fmt::{Display, Formatter};
use std::sync::{Arc, OnceLock};

/// How a condition with an unrecognized operator tag evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOperatorPolicy {
    /// Unknown operators match every document.
    #[default]
    MatchAll,
    /// Unknown operators match no document.
    MatchNone,
}

impl UnknownOperatorPolicy {
    fn outcome(&self) -> bool {
        matches!(self, UnknownOperatorPolicy::MatchAll)
    }
}

/// A predicate tree selecting documents.
///
/// A condition is either a field mapping ([Condition::Fields]) whose entries
/// must all hold, a literal expected value, or an operator node. Operators are
/// evaluated against the value at the path that referenced them (the scope).
/// `Or` and `And` evaluate field-mapping children against the whole document,
/// while bare operator children inherit the enclosing scope:
///
/// ```rust
/// use docbase::doc;
/// use docbase::filter::{Command, Condition, UnknownOperatorPolicy};
///
/// let cmd = Command;
/// // field-level range
/// let range: Condition = doc! { age: (cmd.gte(18).and(cmd.lt(65))) }.into();
/// assert!(range.matches(&doc! { age: 30 }, UnknownOperatorPolicy::MatchAll));
///
/// // document-level alternatives
/// let either = cmd.or(vec![doc! { name: "A" }, doc! { name: "B" }]);
/// assert!(either.matches(&doc! { name: "B" }, UnknownOperatorPolicy::MatchAll));
/// ```
///
/// Conditions parse from, and convert back into, a wire form where each
/// operator is a document tagged with `__cmd`, so they can be embedded as
/// values of a `doc!` literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Every path must satisfy its condition. Empty mappings match everything.
    Fields(Vec<(FieldPath, Condition)>),
    Or(Vec<Condition>),
    And(Vec<Condition>),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
    Eq(Value),
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Regex(RegexCondition),
    /// A plain expected value, compared for equality.
    Literal(Value),
    /// An operator tag this engine does not know.
    Unknown(String),
    /// A known operator with a malformed payload. Query terminals reject it.
    Invalid(String),
}

impl Condition {
    /// The empty condition, matching every document.
    pub fn all() -> Condition {
        Condition::Fields(Vec::new())
    }

    /// A single-field mapping.
    pub fn field<C: Into<Condition>>(path: &str, condition: C) -> Condition {
        Condition::Fields(vec![(FieldPath::parse(path), condition.into())])
    }

    /// Combines `self` and `other` into an `And` node.
    pub fn and<C: Into<Condition>>(self, other: C) -> Condition {
        match self {
            Condition::And(mut conditions) => {
                conditions.push(other.into());
                Condition::And(conditions)
            }
            condition => Condition::And(vec![condition, other.into()]),
        }
    }

    /// Combines `self` and `other` into an `Or` node.
    pub fn or<C: Into<Condition>>(self, other: C) -> Condition {
        match self {
            Condition::Or(mut conditions) => {
                conditions.push(other.into());
                Condition::Or(conditions)
            }
            condition => Condition::Or(vec![condition, other.into()]),
        }
    }

    /// Evaluates this condition against a whole document.
    pub fn matches(&self, doc: &Document, policy: UnknownOperatorPolicy) -> bool {
        self.evaluate(doc, &FieldPath::root(), policy)
    }

    /// Fails with `INVALID_PARAM` if any node of the tree is malformed.
    pub fn validate(&self) -> DocbaseResult<()> {
        match self {
            Condition::Invalid(message) => {
                log::error!("Invalid condition: {}", message);
                Err(DocbaseError::new(message, ErrorKind::InvalidParameter))
            }
            Condition::Fields(entries) => entries.iter().try_for_each(|(_, c)| c.validate()),
            Condition::Or(conditions) | Condition::And(conditions) => {
                conditions.iter().try_for_each(Condition::validate)
            }
            _ => Ok(()),
        }
    }

    fn evaluate(&self, doc: &Document, scope: &FieldPath, policy: UnknownOperatorPolicy) -> bool {
        match self {
            // an empty mapping under a field only matches an empty document
            Condition::Fields(entries) if entries.is_empty() && !scope.is_root() => {
                matches!(scope.resolve(doc), Some(Value::Document(nested)) if nested.is_empty())
            }
            Condition::Fields(entries) => entries
                .iter()
                .all(|(path, condition)| condition.evaluate(doc, &scope.join(path), policy)),
            Condition::Or(conditions) => conditions
                .iter()
                .any(|condition| condition.evaluate_composite(doc, scope, policy)),
            Condition::And(conditions) => conditions
                .iter()
                .all(|condition| condition.evaluate_composite(doc, scope, policy)),
            Condition::In(values) => scope
                .resolve(doc)
                .map(|value| values.contains(value))
                .unwrap_or(false),
            Condition::Nin(values) => scope
                .resolve(doc)
                .map(|value| !values.contains(value))
                .unwrap_or(true),
            Condition::Exists(flag) => {
                let present = scope.resolve(doc).map(|v| !v.is_null()).unwrap_or(false);
                present == *flag
            }
            Condition::Eq(expected) | Condition::Literal(expected) => {
                scope.resolve(doc) == Some(expected)
            }
            Condition::Neq(expected) => scope.resolve(doc) != Some(expected),
            Condition::Gt(operand) => compare_with(doc, scope, operand, |o| o.is_gt()),
            Condition::Gte(operand) => compare_with(doc, scope, operand, |o| o.is_ge()),
            Condition::Lt(operand) => compare_with(doc, scope, operand, |o| o.is_lt()),
            Condition::Lte(operand) => compare_with(doc, scope, operand, |o| o.is_le()),
            Condition::Regex(regex) => scope
                .resolve(doc)
                .and_then(Value::as_str)
                .map(|s| regex.is_match(s))
                .unwrap_or(false),
            Condition::Unknown(tag) => {
                log::warn!(
                    "Unknown condition operator '{}' at '{}', evaluating as {}",
                    tag,
                    scope,
                    policy.outcome()
                );
                policy.outcome()
            }
            Condition::Invalid(_) => false,
        }
    }

    // field mappings inside or/and address the whole document
    fn evaluate_composite(
        &self,
        doc: &Document,
        scope: &FieldPath,
        policy: UnknownOperatorPolicy,
    ) -> bool {
        match self {
            Condition::Fields(_) => self.evaluate(doc, &FieldPath::root(), policy),
            _ => self.evaluate(doc, scope, policy),
        }
    }

    /// Converts this condition into its wire form.
    pub fn to_value(&self) -> Value {
        match self {
            Condition::Fields(entries) => {
                let mut doc = Document::new();
                for (path, condition) in entries {
                    doc.insert(path.to_string(), condition.to_value());
                }
                Value::Document(doc)
            }
            Condition::Or(conditions) => command_value("or", CMD_CONDITIONS, list_value(conditions)),
            Condition::And(conditions) => {
                command_value("and", CMD_CONDITIONS, list_value(conditions))
            }
            Condition::In(values) => command_value("in", CMD_VALUES, Value::Array(values.clone())),
            Condition::Nin(values) => {
                command_value("nin", CMD_VALUES, Value::Array(values.clone()))
            }
            Condition::Exists(flag) => command_value("exists", CMD_FLAG, Value::Bool(*flag)),
            Condition::Eq(v) => command_value("eq", CMD_VALUE, v.clone()),
            Condition::Neq(v) => command_value("neq", CMD_VALUE, v.clone()),
            Condition::Gt(v) => command_value("gt", CMD_VALUE, v.clone()),
            Condition::Gte(v) => command_value("gte", CMD_VALUE, v.clone()),
            Condition::Lt(v) => command_value("lt", CMD_VALUE, v.clone()),
            Condition::Lte(v) => command_value("lte", CMD_VALUE, v.clone()),
            Condition::Regex(regex) => {
                let mut doc = Document::new();
                doc.put(CMD_TAG, "regex");
                doc.put(CMD_REGEXP, regex.pattern());
                doc.put(CMD_OPTIONS, regex.options());
                Value::Document(doc)
            }
            Condition::Literal(v) => v.clone(),
            Condition::Unknown(tag) => {
                let mut doc = Document::new();
                doc.put(CMD_TAG, tag.as_str());
                Value::Document(doc)
            }
            Condition::Invalid(message) => command_value("invalid", CMD_VALUE, message.into()),
        }
    }
}

fn compare_with<F>(doc: &Document, scope: &FieldPath, operand: &Value, accept: F) -> bool
where
    F: Fn(std::cmp::Ordering) -> bool,
{
    scope
        .resolve(doc)
        .and_then(|value| value.compare(operand))
        .map(accept)
        .unwrap_or(false)
}

fn command_value(tag: &str, key: &str, payload: Value) -> Value {
    let mut doc = Document::new();
    doc.put(CMD_TAG, tag);
    doc.put(key, payload);
    Value::Document(doc)
}

fn list_value(conditions: &[Condition]) -> Value {
    Value::Array(conditions.iter().map(Condition::to_value).collect())
}

/// Parses a document into a condition: tagged documents become operator
/// nodes, anything else is a field mapping.
fn parse_document(doc: Document) -> Condition {
    if let Some(tag) = doc.get(CMD_TAG).and_then(Value::as_str) {
        let tag = tag.to_string();
        return parse_command(&tag, doc);
    }

    Condition::Fields(
        doc.into_iter()
            .map(|(key, value)| (FieldPath::parse(&key), parse_value(value)))
            .collect(),
    )
}

fn parse_value(value: Value) -> Condition {
    match value {
        Value::Document(doc) => parse_document(doc),
        other => Condition::Literal(other),
    }
}

fn parse_command(tag: &str, mut doc: Document) -> Condition {
    match tag {
        "or" | "and" => match doc.remove(CMD_CONDITIONS) {
            Some(Value::Array(items)) => {
                let conditions = items.into_iter().map(parse_value).collect();
                if tag == "or" {
                    Condition::Or(conditions)
                } else {
                    Condition::And(conditions)
                }
            }
            _ => malformed(tag, CMD_CONDITIONS),
        },
        "in" | "nin" => match doc.remove(CMD_VALUES) {
            Some(Value::Array(values)) if tag == "in" => Condition::In(values),
            Some(Value::Array(values)) => Condition::Nin(values),
            _ => malformed(tag, CMD_VALUES),
        },
        "exists" => match doc.remove(CMD_FLAG) {
            Some(flag) => Condition::Exists(flag.is_truthy()),
            None => malformed(tag, CMD_FLAG),
        },
        "eq" | "neq" | "gt" | "gte" | "lt" | "lte" => match doc.remove(CMD_VALUE) {
            Some(value) => match tag {
                "eq" => Condition::Eq(value),
                "neq" => Condition::Neq(value),
                "gt" => Condition::Gt(value),
                "gte" => Condition::Gte(value),
                "lt" => Condition::Lt(value),
                _ => Condition::Lte(value),
            },
            None => malformed(tag, CMD_VALUE),
        },
        "regex" => {
            let options = doc
                .get(CMD_OPTIONS)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match doc.get(CMD_REGEXP).and_then(Value::as_str) {
                Some(pattern) => Condition::Regex(RegexCondition::new(pattern, &options)),
                None => malformed(tag, CMD_REGEXP),
            }
        }
        "invalid" => Condition::Invalid(
            doc.get(CMD_VALUE)
                .and_then(Value::as_str)
                .unwrap_or("invalid condition")
                .to_string(),
        ),
        other => Condition::Unknown(other.to_string()),
    }
}

fn malformed(tag: &str, key: &str) -> Condition {
    Condition::Invalid(format!("Operator '{}' requires a valid '{}'", tag, key))
}

impl From<Document> for Condition {
    fn from(doc: Document) -> Self {
        parse_document(doc)
    }
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        parse_value(value)
    }
}

impl From<RegexCondition> for Condition {
    fn from(regex: RegexCondition) -> Self {
        Condition::Regex(regex)
    }
}

impl From<Condition> for Value {
    fn from(condition: Condition) -> Self {
        condition.to_value()
    }
}

impl From<&Condition> for Value {
    fn from(condition: &Condition) -> Self {
        condition.to_value()
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// A regular expression condition with JavaScript-style flags.
///
/// Supported flags are `i` (case-insensitive), `m` (multi-line), `s` (dot
/// matches newline) and `x` (ignore whitespace); `g` and `u` carry no meaning
/// for a single match and are ignored. The pattern is compiled on first use
/// and shared between clones. An invalid pattern never errors, it simply
/// matches nothing.
#[derive(Debug, Clone)]
pub struct RegexCondition {
    pattern: String,
    options: String,
    compiled: Arc<OnceLock<Option<Regex>>>,
}

impl RegexCondition {
    pub fn new(pattern: &str, options: &str) -> Self {
        RegexCondition {
            pattern: pattern.to_string(),
            options: options.to_string(),
            compiled: Arc::new(OnceLock::new()),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> &str {
        &self.options
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex().map(|re| re.is_match(text)).unwrap_or(false)
    }

    fn regex(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| {
                let mut builder = RegexBuilder::new(&self.pattern);
                for flag in self.options.chars() {
                    match flag {
                        'i' => builder.case_insensitive(true),
                        'm' => builder.multi_line(true),
                        's' => builder.dot_matches_new_line(true),
                        'x' => builder.ignore_whitespace(true),
                        _ => &mut builder,
                    };
                }
                match builder.build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        log::warn!("Invalid regex pattern '{}': {}", self.pattern, e);
                        None
                    }
                }
            })
            .as_ref()
    }
}

impl PartialEq for RegexCondition {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.options == other.options
    }
}
