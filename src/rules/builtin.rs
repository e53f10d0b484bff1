//! Built-in rule predicates
//!
//! Every built-in takes `(value, argument)` and yields a failure message or
//! nothing. A null value passes every built-in except `null`. The type
//! rules return before reading their token, so a null value never reaches
//! token or codec checks; every other argument is checked first, so a broken
//! schema is reported even where the data happens to be null.

use regex::Regex;

use super::types::TypeToken;
use crate::identifier::IdentifierCodec;
use crate::schema::{SchemaError, SchemaResult};
use crate::value::Value;

pub const REQUIRED_MESSAGE: &str = "Required";
pub const NULL_MESSAGE: &str = "Null";
pub const INVALID_TYPE: &str = "Invalid type";
pub const INVALID_ELEMENT_TYPE: &str = "Invalid element type";
pub const ELEMENT_NULL: &str = "Element null";
pub const ELEMENT_BELOW_MINIMUM: &str = "Element below minimum";
pub const ELEMENT_ABOVE_MAXIMUM: &str = "Element above maximum";
pub const ELEMENT_BELOW_MINIMUM_LENGTH: &str = "Element below minimum length";
pub const ELEMENT_ABOVE_MAXIMUM_LENGTH: &str = "Element above maximum length";
pub const NOT_EQUAL: &str = "Not equal";
pub const BELOW_MINIMUM: &str = "Below minimum";
pub const ABOVE_MAXIMUM: &str = "Above maximum";
pub const BELOW_MINIMUM_LENGTH: &str = "Below minimum length";
pub const ABOVE_MAXIMUM_LENGTH: &str = "Above maximum length";
pub const EMPTY_STRING: &str = "Empty string";
pub const EMPTY_ARRAY: &str = "Empty array";
pub const EMPTY_OBJECT: &str = "Empty object";
pub const NOT_CONTAINER: &str = "Not object, array or string";
pub const NOT_IN_ENUMERATION: &str = "Not in enumeration";
pub const REGEX_MISMATCH: &str = "Regex mismatch";

/// The built-in rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinRule {
    Required,
    Null,
    Type,
    ElementNull,
    ElementType,
    ElementMin,
    ElementMax,
    ElementMinLength,
    ElementMaxLength,
    Eq,
    Min,
    Max,
    MinLength,
    MaxLength,
    Empty,
    Enum,
    Regex,
}

impl BuiltinRule {
    pub const ALL: [BuiltinRule; 17] = [
        BuiltinRule::Required,
        BuiltinRule::Null,
        BuiltinRule::Type,
        BuiltinRule::ElementNull,
        BuiltinRule::ElementType,
        BuiltinRule::ElementMin,
        BuiltinRule::ElementMax,
        BuiltinRule::ElementMinLength,
        BuiltinRule::ElementMaxLength,
        BuiltinRule::Eq,
        BuiltinRule::Min,
        BuiltinRule::Max,
        BuiltinRule::MinLength,
        BuiltinRule::MaxLength,
        BuiltinRule::Empty,
        BuiltinRule::Enum,
        BuiltinRule::Regex,
    ];

    /// Rules applied ahead of all others, in this order
    pub const PRIORITY: [BuiltinRule; 5] = [
        BuiltinRule::Required,
        BuiltinRule::Null,
        BuiltinRule::Type,
        BuiltinRule::ElementNull,
        BuiltinRule::ElementType,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinRule::Required => "required",
            BuiltinRule::Null => "null",
            BuiltinRule::Type => "type",
            BuiltinRule::ElementNull => "elementNull",
            BuiltinRule::ElementType => "elementType",
            BuiltinRule::ElementMin => "elementMin",
            BuiltinRule::ElementMax => "elementMax",
            BuiltinRule::ElementMinLength => "elementMinLength",
            BuiltinRule::ElementMaxLength => "elementMaxLength",
            BuiltinRule::Eq => "eq",
            BuiltinRule::Min => "min",
            BuiltinRule::Max => "max",
            BuiltinRule::MinLength => "minLength",
            BuiltinRule::MaxLength => "maxLength",
            BuiltinRule::Empty => "empty",
            BuiltinRule::Enum => "enum",
            BuiltinRule::Regex => "regex",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.name() == name)
    }

    /// `required` and `null` can be neither replaced nor removed
    pub fn is_reserved(&self) -> bool {
        matches!(self, BuiltinRule::Required | BuiltinRule::Null)
    }

    pub fn is_priority_name(name: &str) -> bool {
        Self::PRIORITY.iter().any(|rule| rule.name() == name)
    }

    /// Reads a boolean argument.
    pub(crate) fn flag(&self, argument: &Value) -> SchemaResult<bool> {
        argument
            .as_bool()
            .ok_or_else(|| SchemaError::invalid_argument(self.name(), "a boolean"))
    }

    /// Evaluates the rule against a defined value.
    pub fn evaluate(
        &self,
        value: &Value,
        argument: &Value,
        identifiers: Option<&dyn IdentifierCodec>,
    ) -> SchemaResult<Option<&'static str>> {
        if value.is_null() && matches!(self, BuiltinRule::Type | BuiltinRule::ElementType) {
            return Ok(None);
        }
        let check = Check::parse(*self, argument, identifiers)?;
        if value.is_null() && !matches!(check, Check::Null { .. }) {
            return Ok(None);
        }
        Ok(check.run(value, identifiers))
    }
}

/// A rule with its argument decoded
enum Check<'a> {
    Present,
    Null { allow: bool },
    Type(TypeToken),
    ElementNull { allow: bool },
    ElementType(TypeToken),
    ElementMin(f64),
    ElementMax(f64),
    ElementMinLength(f64),
    ElementMaxLength(f64),
    Eq(&'a Value),
    Min(f64),
    Max(f64),
    MinLength(f64),
    MaxLength(f64),
    Empty { allow: bool },
    Enum(&'a [Value]),
    Regex(Regex),
}

impl<'a> Check<'a> {
    fn parse(
        rule: BuiltinRule,
        argument: &'a Value,
        identifiers: Option<&dyn IdentifierCodec>,
    ) -> SchemaResult<Self> {
        let check = match rule {
            BuiltinRule::Required => {
                rule.flag(argument)?;
                Check::Present
            }
            BuiltinRule::Null => Check::Null {
                allow: rule.flag(argument)?,
            },
            BuiltinRule::Type => Check::Type(token(rule, argument, identifiers)?),
            BuiltinRule::ElementNull => Check::ElementNull {
                allow: rule.flag(argument)?,
            },
            BuiltinRule::ElementType => Check::ElementType(token(rule, argument, identifiers)?),
            BuiltinRule::ElementMin => Check::ElementMin(bound(rule, argument)?),
            BuiltinRule::ElementMax => Check::ElementMax(bound(rule, argument)?),
            BuiltinRule::ElementMinLength => Check::ElementMinLength(bound(rule, argument)?),
            BuiltinRule::ElementMaxLength => Check::ElementMaxLength(bound(rule, argument)?),
            BuiltinRule::Eq => Check::Eq(argument),
            BuiltinRule::Min => Check::Min(bound(rule, argument)?),
            BuiltinRule::Max => Check::Max(bound(rule, argument)?),
            BuiltinRule::MinLength => Check::MinLength(bound(rule, argument)?),
            BuiltinRule::MaxLength => Check::MaxLength(bound(rule, argument)?),
            BuiltinRule::Empty => Check::Empty {
                allow: rule.flag(argument)?,
            },
            BuiltinRule::Enum => Check::Enum(
                argument
                    .as_array()
                    .ok_or_else(|| SchemaError::invalid_argument(rule.name(), "an array"))?,
            ),
            BuiltinRule::Regex => Check::Regex(pattern(rule, argument)?),
        };
        Ok(check)
    }

    fn run(&self, value: &Value, identifiers: Option<&dyn IdentifierCodec>) -> Option<&'static str> {
        match self {
            Check::Present => None,
            Check::Null { allow } => (!allow && value.is_null()).then_some(NULL_MESSAGE),
            Check::Type(token) => (!token.matches(value, identifiers)).then_some(INVALID_TYPE),
            Check::ElementNull { allow } => {
                let found = !allow && elements(value).iter().any(Value::is_null);
                found.then_some(ELEMENT_NULL)
            }
            Check::ElementType(token) => {
                let mismatch = elements(value)
                    .iter()
                    .any(|element| !element.is_null() && !token.matches(element, identifiers));
                mismatch.then_some(INVALID_ELEMENT_TYPE)
            }
            Check::ElementMin(min) => numbers(value)
                .any(|n| n < *min)
                .then_some(ELEMENT_BELOW_MINIMUM),
            Check::ElementMax(max) => numbers(value)
                .any(|n| n > *max)
                .then_some(ELEMENT_ABOVE_MAXIMUM),
            Check::ElementMinLength(min) => string_lengths(value)
                .any(|len| len < *min)
                .then_some(ELEMENT_BELOW_MINIMUM_LENGTH),
            Check::ElementMaxLength(max) => string_lengths(value)
                .any(|len| len > *max)
                .then_some(ELEMENT_ABOVE_MAXIMUM_LENGTH),
            Check::Eq(expected) => (value != *expected).then_some(NOT_EQUAL),
            Check::Min(min) => (value.to_number() < *min).then_some(BELOW_MINIMUM),
            Check::Max(max) => (value.to_number() > *max).then_some(ABOVE_MAXIMUM),
            Check::MinLength(min) => value
                .length()
                .filter(|len| (*len as f64) < *min)
                .map(|_| BELOW_MINIMUM_LENGTH),
            Check::MaxLength(max) => value
                .length()
                .filter(|len| (*len as f64) > *max)
                .map(|_| ABOVE_MAXIMUM_LENGTH),
            Check::Empty { allow } => match value {
                Value::Bool(_) | Value::Number(_) => Some(NOT_CONTAINER),
                _ if *allow => None,
                Value::String(s) if s.is_empty() => Some(EMPTY_STRING),
                Value::Array(items) if items.is_empty() => Some(EMPTY_ARRAY),
                Value::Object(map) if map.is_empty() => Some(EMPTY_OBJECT),
                _ => None,
            },
            Check::Enum(allowed) => {
                let listed = match value {
                    Value::Array(items) => items.iter().all(|item| allowed.contains(item)),
                    other => allowed.contains(other),
                };
                (!listed).then_some(NOT_IN_ENUMERATION)
            }
            Check::Regex(regex) => {
                let matched = match value {
                    Value::Array(items) => items
                        .iter()
                        .all(|item| regex.is_match(&item.coerce_to_string())),
                    other => regex.is_match(&other.coerce_to_string()),
                };
                (!matched).then_some(REGEX_MISMATCH)
            }
        }
    }
}

fn token(
    rule: BuiltinRule,
    argument: &Value,
    identifiers: Option<&dyn IdentifierCodec>,
) -> SchemaResult<TypeToken> {
    let token: TypeToken = argument
        .as_str()
        .ok_or_else(|| SchemaError::invalid_argument(rule.name(), "a type name"))?
        .parse()?;
    token.ensure_available(identifiers)?;
    Ok(token)
}

fn bound(rule: BuiltinRule, argument: &Value) -> SchemaResult<f64> {
    argument
        .as_f64()
        .ok_or_else(|| SchemaError::invalid_argument(rule.name(), "a number"))
}

fn pattern(rule: BuiltinRule, argument: &Value) -> SchemaResult<Regex> {
    let source = argument
        .as_str()
        .ok_or_else(|| SchemaError::invalid_argument(rule.name(), "a pattern string"))?;
    Regex::new(source).map_err(|e| SchemaError::invalid_pattern(source, e.to_string()))
}

/// Element rules only look inside arrays.
fn elements(value: &Value) -> &[Value] {
    value.as_array().unwrap_or(&[])
}

fn numbers(value: &Value) -> impl Iterator<Item = f64> + '_ {
    elements(value).iter().filter_map(Value::as_f64)
}

fn string_lengths(value: &Value) -> impl Iterator<Item = f64> + '_ {
    elements(value)
        .iter()
        .filter_map(Value::as_str)
        .map(|s| s.chars().count() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(rule: BuiltinRule, value: serde_json::Value, arg: serde_json::Value) -> Option<&'static str> {
        rule.evaluate(&Value::from(value), &Value::from(arg), None).unwrap()
    }

    #[test]
    fn test_names_are_unique_and_resolvable() {
        for rule in BuiltinRule::ALL {
            assert_eq!(BuiltinRule::from_name(rule.name()), Some(rule));
        }
        assert_eq!(BuiltinRule::from_name("disallow"), None);
        assert!(BuiltinRule::Required.is_reserved());
        assert!(BuiltinRule::Null.is_reserved());
        assert!(!BuiltinRule::Type.is_reserved());
    }

    #[test]
    fn test_null_rule() {
        assert_eq!(eval(BuiltinRule::Null, json!(null), json!(false)), Some(NULL_MESSAGE));
        assert_eq!(eval(BuiltinRule::Null, json!(null), json!(true)), None);
        assert_eq!(eval(BuiltinRule::Null, json!("x"), json!(false)), None);
    }

    #[test]
    fn test_null_passes_other_rules() {
        assert_eq!(eval(BuiltinRule::Type, json!(null), json!("string")), None);
        assert_eq!(eval(BuiltinRule::Min, json!(null), json!(1)), None);
        assert_eq!(eval(BuiltinRule::Empty, json!(null), json!(false)), None);
        assert_eq!(eval(BuiltinRule::Enum, json!(null), json!(["G"])), None);
    }

    #[test]
    fn test_arguments_checked_before_value() {
        let err = BuiltinRule::Type
            .evaluate(&Value::from("x"), &Value::from("unsupported"), None)
            .unwrap_err();
        assert_eq!(err.code(), "SHAPE_UNSUPPORTED_TYPE");

        let err = BuiltinRule::Min
            .evaluate(&Value::Null, &Value::from("five"), None)
            .unwrap_err();
        assert_eq!(err.code(), "SHAPE_INVALID_RULE_ARGUMENT");

        let err = BuiltinRule::Min
            .evaluate(&Value::Number(3.0), &Value::from("five"), None)
            .unwrap_err();
        assert_eq!(err.code(), "SHAPE_INVALID_RULE_ARGUMENT");

        let err = BuiltinRule::Enum
            .evaluate(&Value::from("G"), &Value::from("G"), None)
            .unwrap_err();
        assert_eq!(err.code(), "SHAPE_INVALID_RULE_ARGUMENT");

        let err = BuiltinRule::Regex
            .evaluate(&Value::from("a"), &Value::from("(unclosed"), None)
            .unwrap_err();
        assert_eq!(err.code(), "SHAPE_INVALID_PATTERN");
    }

    #[test]
    fn test_null_skips_type_tokens() {
        for rule in [BuiltinRule::Type, BuiltinRule::ElementType] {
            assert_eq!(rule.evaluate(&Value::Null, &Value::from("strnig"), None).unwrap(), None);
            assert_eq!(
                rule.evaluate(&Value::Null, &Value::from("objectIdString"), None).unwrap(),
                None
            );
            assert_eq!(rule.evaluate(&Value::Null, &Value::Number(5.0), None).unwrap(), None);
        }
    }

    #[test]
    fn test_element_null() {
        assert_eq!(eval(BuiltinRule::ElementNull, json!([1, null]), json!(false)), Some(ELEMENT_NULL));
        assert_eq!(eval(BuiltinRule::ElementNull, json!([1, null]), json!(true)), None);
        assert_eq!(eval(BuiltinRule::ElementNull, json!([1, 2]), json!(false)), None);
    }

    #[test]
    fn test_element_type_skips_nulls() {
        assert_eq!(eval(BuiltinRule::ElementType, json!([true, null]), json!("boolean")), None);
        assert_eq!(
            eval(BuiltinRule::ElementType, json!(["yes", true]), json!("boolean")),
            Some(INVALID_ELEMENT_TYPE)
        );
        assert_eq!(eval(BuiltinRule::ElementType, json!([]), json!("boolean")), None);
    }

    #[test]
    fn test_element_rules_ignore_strings() {
        assert_eq!(eval(BuiltinRule::ElementType, json!("abc"), json!("number")), None);
        assert_eq!(eval(BuiltinRule::ElementNull, json!("abc"), json!(false)), None);
        assert_eq!(eval(BuiltinRule::ElementMinLength, json!("abc"), json!(5)), None);
    }

    #[test]
    fn test_element_bounds_skip_other_types() {
        assert_eq!(eval(BuiltinRule::ElementMin, json!([5, "1", 7]), json!(3)), None);
        assert_eq!(eval(BuiltinRule::ElementMin, json!([5, 1]), json!(3)), Some(ELEMENT_BELOW_MINIMUM));
        assert_eq!(eval(BuiltinRule::ElementMax, json!([5, 9]), json!(7)), Some(ELEMENT_ABOVE_MAXIMUM));
        assert_eq!(eval(BuiltinRule::ElementMax, json!(["999"]), json!(7)), None);
    }

    #[test]
    fn test_element_lengths_skip_non_strings() {
        assert_eq!(
            eval(BuiltinRule::ElementMinLength, json!(["abc", "a"]), json!(2)),
            Some(ELEMENT_BELOW_MINIMUM_LENGTH)
        );
        assert_eq!(eval(BuiltinRule::ElementMinLength, json!(["abc", 1]), json!(2)), None);
        assert_eq!(
            eval(BuiltinRule::ElementMaxLength, json!(["abc", "abcdef"]), json!(4)),
            Some(ELEMENT_ABOVE_MAXIMUM_LENGTH)
        );
    }

    #[test]
    fn test_eq() {
        assert_eq!(eval(BuiltinRule::Eq, json!("R"), json!("R")), None);
        assert_eq!(eval(BuiltinRule::Eq, json!(1), json!("1")), Some(NOT_EQUAL));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(eval(BuiltinRule::Min, json!(1), json!(1)), None);
        assert_eq!(eval(BuiltinRule::Min, json!(0), json!(1)), Some(BELOW_MINIMUM));
        assert_eq!(eval(BuiltinRule::Max, json!(5), json!(5)), None);
        assert_eq!(eval(BuiltinRule::Max, json!(6), json!(5)), Some(ABOVE_MAXIMUM));
        // Numeric strings compare numerically; other strings never compare.
        assert_eq!(eval(BuiltinRule::Min, json!("0"), json!(1)), Some(BELOW_MINIMUM));
        assert_eq!(eval(BuiltinRule::Min, json!("abc"), json!(1)), None);
    }

    #[test]
    fn test_lengths() {
        assert_eq!(eval(BuiltinRule::MinLength, json!(""), json!(1)), Some(BELOW_MINIMUM_LENGTH));
        assert_eq!(eval(BuiltinRule::MinLength, json!(["a"]), json!(2)), Some(BELOW_MINIMUM_LENGTH));
        assert_eq!(eval(BuiltinRule::MaxLength, json!("Gerald"), json!(6)), None);
        assert_eq!(eval(BuiltinRule::MaxLength, json!("Gerald Butler"), json!(6)), Some(ABOVE_MAXIMUM_LENGTH));
        assert_eq!(eval(BuiltinRule::MinLength, json!(5), json!(10)), None);
    }

    #[test]
    fn test_empty() {
        assert_eq!(eval(BuiltinRule::Empty, json!(""), json!(false)), Some(EMPTY_STRING));
        assert_eq!(eval(BuiltinRule::Empty, json!([]), json!(false)), Some(EMPTY_ARRAY));
        assert_eq!(eval(BuiltinRule::Empty, json!({}), json!(false)), Some(EMPTY_OBJECT));
        assert_eq!(eval(BuiltinRule::Empty, json!(""), json!(true)), None);
        assert_eq!(eval(BuiltinRule::Empty, json!({"a": 1}), json!(false)), None);
        assert_eq!(eval(BuiltinRule::Empty, json!(0), json!(false)), Some(NOT_CONTAINER));
        assert_eq!(eval(BuiltinRule::Empty, json!(true), json!(true)), Some(NOT_CONTAINER));
    }

    #[test]
    fn test_enum_scalar_and_subset() {
        let ratings = json!(["G", "PG", "PG-13", "R", "NC-17"]);
        assert_eq!(eval(BuiltinRule::Enum, json!("R"), ratings.clone()), None);
        assert_eq!(eval(BuiltinRule::Enum, json!("No Rating"), ratings.clone()), Some(NOT_IN_ENUMERATION));
        assert_eq!(eval(BuiltinRule::Enum, json!(["R", "G", "R"]), ratings.clone()), None);
        assert_eq!(eval(BuiltinRule::Enum, json!(["R", "X"]), ratings), Some(NOT_IN_ENUMERATION));
    }

    #[test]
    fn test_regex_coerces_elements() {
        let tags = json!("^[a-z0-9]{3,}$");
        assert_eq!(eval(BuiltinRule::Regex, json!(["1man", "actor"]), tags.clone()), None);
        assert_eq!(eval(BuiltinRule::Regex, json!(["1man", "act or"]), tags.clone()), Some(REGEX_MISMATCH));
        assert_eq!(eval(BuiltinRule::Regex, json!([123]), tags.clone()), None);
        assert_eq!(eval(BuiltinRule::Regex, json!([12]), tags), Some(REGEX_MISMATCH));
        assert_eq!(eval(BuiltinRule::Regex, json!("gerald@hollywood.com"), json!(".+@.+")), None);
        assert_eq!(eval(BuiltinRule::Regex, json!("@hollywood.com"), json!(".+@.+")), Some(REGEX_MISMATCH));
    }
}
