//! Column type classification.
//!
//! Type names come from the schema provider verbatim (`Uint32`,
//! `Optional<Utf8>`, ...). Every predicate is total: unknown names simply
//! fall into [`TypeClass::Common`].

use std::str::FromStr;

use crate::models::{Expression, ParamsType};

/// Type reported for columns whose type could not be resolved.
pub const UNKNOWN_FIELD_TYPE: &str = "unknown";
/// Type reported for the synthetic `*` column.
pub const ASTERISK_FIELD_TYPE: &str = "asterisk";

const NUMERIC_TYPES: &[&str] = &[
    "Double", "Float", "Int64", "Int32", "Int16", "Int8", "Uint64", "Uint32", "Uint16", "Uint8",
    "Decimal",
];
const DATE_TIME_TYPES: &[&str] = &[
    "Date",
    "TzDate",
    "Datetime",
    "TzDatetime",
    "Timestamp",
    "TzTimestamp",
    "Interval",
];
const STRING_TYPES: &[&str] = &["String", "Utf8", "Json"];
const NOT_SIMPLE_TYPES: &[&str] = &["Void", "Yson", "Json", "Null"];

/// Strip a single `Optional<...>` wrapper.
fn unwrap_optional(data_type: &str) -> &str {
    data_type
        .strip_prefix("Optional<")
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(data_type)
}

fn in_family(family: &[&str], data_type: &str) -> bool {
    family.contains(&unwrap_optional(data_type))
}

pub fn is_numeric(data_type: &str) -> bool {
    in_family(NUMERIC_TYPES, data_type)
}

pub fn is_date_time(data_type: &str) -> bool {
    in_family(DATE_TIME_TYPES, data_type)
}

pub fn is_string(data_type: &str) -> bool {
    in_family(STRING_TYPES, data_type)
}

pub fn is_bool(data_type: &str) -> bool {
    unwrap_optional(data_type) == "Bool"
}

/// Documents and unit types cannot be compared with scalar predicates.
pub fn is_simple(data_type: &str) -> bool {
    !NOT_SIMPLE_TYPES.contains(&data_type)
        && !matches!(data_type, "Optional<Yson>" | "Optional<Json>")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Numeric,
    DateTime,
    String,
    Bool,
    /// Unrecognized, `unknown`, `asterisk` and everything else.
    Common,
}

pub fn classify(data_type: &str) -> TypeClass {
    if is_string(data_type) {
        TypeClass::String
    } else if is_date_time(data_type) {
        TypeClass::DateTime
    } else if is_bool(data_type) {
        TypeClass::Bool
    } else if is_numeric(data_type) {
        TypeClass::Numeric
    } else {
        TypeClass::Common
    }
}

/// Temporal types a log-time column may be cast to.
///
/// User-supplied cast names are only ever rendered through this enum, never
/// interpolated as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastTarget {
    Timestamp,
    Date,
    Datetime,
}

impl CastTarget {
    pub const ALL: [CastTarget; 3] = [CastTarget::Timestamp, CastTarget::Date, CastTarget::Datetime];

    pub fn as_str(self) -> &'static str {
        match self {
            CastTarget::Timestamp => "Timestamp",
            CastTarget::Date => "Date",
            CastTarget::Datetime => "Datetime",
        }
    }
}

impl FromStr for CastTarget {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CastTarget::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or(())
    }
}

pub fn is_primitive_cast_target(data_type: &str) -> bool {
    data_type.parse::<CastTarget>().is_ok()
}

const STRING_EXPRESSIONS: &[Expression] = &[
    Expression::Like,
    Expression::NotLike,
    Expression::Regexp,
    Expression::Equals,
    Expression::NotEquals,
    Expression::In,
    Expression::NotIn,
    Expression::Null,
    Expression::NotNull,
];

const DATE_EXPRESSIONS: &[Expression] = &[
    Expression::InsideDashboard,
    Expression::OutsideDashboard,
    Expression::Equals,
    Expression::NotEquals,
    Expression::Gtr,
    Expression::GtrOrEquals,
    Expression::Less,
    Expression::LessOrEquals,
    Expression::Between,
    Expression::NotBetween,
    Expression::Null,
    Expression::NotNull,
];

const BOOLEAN_EXPRESSIONS: &[Expression] = &[
    Expression::IsTrue,
    Expression::IsFalse,
    Expression::Null,
    Expression::NotNull,
];

const COMMON_EXPRESSIONS: &[Expression] = &[
    Expression::Equals,
    Expression::HarshEquals,
    Expression::NotEquals,
    Expression::LessOrGtr,
    Expression::Gtr,
    Expression::GtrOrEquals,
    Expression::Less,
    Expression::LessOrEquals,
    Expression::Between,
    Expression::NotBetween,
    Expression::In,
    Expression::NotIn,
    Expression::Null,
    Expression::NotNull,
];

/// Expressions offered for a column of the given type.
pub fn expressions_for_type(data_type: &str) -> &'static [Expression] {
    match classify(data_type) {
        TypeClass::String => STRING_EXPRESSIONS,
        TypeClass::DateTime => DATE_EXPRESSIONS,
        TypeClass::Bool => BOOLEAN_EXPRESSIONS,
        TypeClass::Numeric | TypeClass::Common => COMMON_EXPRESSIONS,
    }
}

/// How the parameters of a filter on this column should be interpreted.
pub fn params_type_for(data_type: &str, expr: Option<Expression>) -> Option<ParamsType> {
    let expr = expr?;
    if !expr.takes_params() {
        return None;
    }
    if is_string(data_type) || is_date_time(data_type) {
        Some(ParamsType::Text)
    } else {
        Some(ParamsType::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_types_including_optional() {
        for t in ["Int8", "Uint64", "Double", "Decimal", "Optional<Uint32>", "Optional<Float>"] {
            assert!(is_numeric(t), "{t}");
        }
        assert!(!is_numeric("Utf8"));
        assert!(!is_numeric("Optional<Optional<Int8>>"));
    }

    #[test]
    fn date_time_and_string_types() {
        assert!(is_date_time("TzTimestamp"));
        assert!(is_date_time("Optional<Interval>"));
        assert!(is_string("Optional<Utf8>"));
        assert!(is_string("Json"));
        assert!(!is_string("Yson"));
        assert!(is_bool("Bool"));
        assert!(is_bool("Optional<Bool>"));
    }

    #[test]
    fn sentinels_fall_back_to_common() {
        assert_eq!(classify(UNKNOWN_FIELD_TYPE), TypeClass::Common);
        assert_eq!(classify(ASTERISK_FIELD_TYPE), TypeClass::Common);
        assert_eq!(classify("List<Int32>"), TypeClass::Common);
        assert_eq!(classify("Optional<Datetime>"), TypeClass::DateTime);
    }

    #[test]
    fn simple_types_exclude_documents() {
        assert!(is_simple("Utf8"));
        assert!(!is_simple("Yson"));
        assert!(!is_simple("Optional<Json>"));
        assert!(!is_simple("Void"));
    }

    #[test]
    fn cast_whitelist_is_exact() {
        assert!(is_primitive_cast_target("Datetime"));
        assert!(!is_primitive_cast_target("datetime"));
        assert!(!is_primitive_cast_target("String) --"));
        assert_eq!("Date".parse::<CastTarget>(), Ok(CastTarget::Date));
    }

    #[test]
    fn expression_menus_follow_type() {
        assert!(expressions_for_type("Bool").contains(&Expression::IsTrue));
        assert!(expressions_for_type("Timestamp").contains(&Expression::InsideDashboard));
        assert!(expressions_for_type("Utf8").contains(&Expression::Like));
        assert!(!expressions_for_type("Int32").contains(&Expression::Like));
    }

    #[test]
    fn params_type_depends_on_column_and_expression() {
        assert_eq!(params_type_for("Int32", Some(Expression::Gtr)), Some(ParamsType::Number));
        assert_eq!(params_type_for("Utf8", Some(Expression::Equals)), Some(ParamsType::Text));
        assert_eq!(params_type_for("Date", Some(Expression::Between)), Some(ParamsType::Text));
        assert_eq!(params_type_for("Date", Some(Expression::InsideDashboard)), None);
        assert_eq!(params_type_for("Int32", None), None);
    }
}
