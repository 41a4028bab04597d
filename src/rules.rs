//! Built-in attribute checks.
//!
//! A [`Check`] inspects one attribute value and reports the [`ErrorKind`]s it
//! finds. Checks are attached to attributes through
//! [`ValidatorBlueprint::validates`](crate::ValidatorBlueprint::validates);
//! rules that need more than one value (or the interactor itself) are
//! registered as closures with
//! [`ValidatorBlueprint::validate`](crate::ValidatorBlueprint::validate).

use regex::Regex;
use serde_json::Value;

use crate::errors::ErrorKind;

/// Returns `true` for values that count as "not provided".
///
/// Blank values are `Null`, whitespace-only strings, empty arrays and
/// objects, and `false`.
///
/// # Examples
///
/// ```
/// use interactor_core::rules::is_blank;
/// use serde_json::json;
///
/// assert!(is_blank(&json!(null)));
/// assert!(is_blank(&json!("   ")));
/// assert!(!is_blank(&json!(0)));
/// ```
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(_) => false,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Renders a value the way it would be matched against a pattern.
fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn length_of(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        other => other.to_string().chars().count(),
    }
}

/// A value interpreted as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Integer(i128),
    /// Integer-shaped but outside the `i128` range.
    WideInteger(f64),
    Float(f64),
}

impl Number {
    fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Some(Number::Integer(i.into())),
                (None, Some(u)) => Some(Number::Integer(u.into())),
                (None, None) => n.as_f64().map(Number::Float),
            },
            Value::String(s) => {
                let s = s.trim();
                if is_integer_text(s) {
                    return match s.parse::<i128>() {
                        Ok(i) => Some(Number::Integer(i)),
                        Err(_) => s
                            .parse::<f64>()
                            .ok()
                            .filter(|f| f.is_finite())
                            .map(Number::WideInteger),
                    };
                }
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Number::Float)
            }
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::WideInteger(f) | Number::Float(f) => f,
        }
    }

    fn is_integer(self) -> bool {
        !matches!(self, Number::Float(_))
    }

    fn is_odd(self) -> bool {
        match self {
            Number::Integer(i) => i % 2 != 0,
            Number::WideInteger(f) | Number::Float(f) => f.trunc() % 2.0 != 0.0,
        }
    }
}

/// Optional sign followed by at least one ASCII digit and nothing else.
fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Length constraints.
///
/// # Examples
///
/// ```
/// use interactor_core::rules::{Check, Length};
/// use serde_json::json;
///
/// let check = Check::from(Length::new().maximum(5));
/// assert!(check.evaluate(&json!("short")).is_empty());
/// assert_eq!(check.evaluate(&json!("too long")).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Length {
    minimum: Option<usize>,
    maximum: Option<usize>,
    is: Option<usize>,
    allow_nil: bool,
}

impl Length {
    /// Creates an unconstrained length check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects values shorter than `n`.
    pub fn minimum(mut self, n: usize) -> Self {
        self.minimum = Some(n);
        self
    }

    /// Rejects values longer than `n`.
    pub fn maximum(mut self, n: usize) -> Self {
        self.maximum = Some(n);
        self
    }

    /// Rejects values that are not exactly `n` long.
    pub fn is(mut self, n: usize) -> Self {
        self.is = Some(n);
        self
    }

    /// Skips the check for `Null`.
    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    fn evaluate(&self, value: &Value, found: &mut Vec<ErrorKind>) {
        if value.is_null() && self.allow_nil {
            return;
        }
        let len = length_of(value);
        if let Some(count) = self.is {
            if len != count {
                found.push(ErrorKind::WrongLength { count });
            }
        }
        if let Some(count) = self.minimum {
            if len < count {
                found.push(ErrorKind::TooShort { count });
            }
        }
        if let Some(count) = self.maximum {
            if len > count {
                found.push(ErrorKind::TooLong { count });
            }
        }
    }
}

/// Numeric constraints.
///
/// Accepts JSON numbers and numeric strings.
///
/// # Examples
///
/// ```
/// use interactor_core::rules::{Check, Numericality};
/// use interactor_core::ErrorKind;
/// use serde_json::json;
///
/// let check = Check::from(Numericality::new().only_integer());
/// assert!(check.evaluate(&json!(100)).is_empty());
/// assert_eq!(check.evaluate(&json!("1.5")), [ErrorKind::NotAnInteger]);
/// assert_eq!(check.evaluate(&json!(null)), [ErrorKind::NotANumber]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Numericality {
    only_integer: bool,
    greater_than: Option<f64>,
    greater_than_or_equal_to: Option<f64>,
    less_than: Option<f64>,
    less_than_or_equal_to: Option<f64>,
    equal_to: Option<f64>,
    other_than: Option<f64>,
    odd: bool,
    even: bool,
    allow_nil: bool,
}

impl Numericality {
    /// Creates a check that only requires a number.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires an integer.
    pub fn only_integer(mut self) -> Self {
        self.only_integer = true;
        self
    }

    /// Requires a value strictly greater than `n`.
    pub fn greater_than(mut self, n: f64) -> Self {
        self.greater_than = Some(n);
        self
    }

    /// Requires a value greater than or equal to `n`.
    pub fn greater_than_or_equal_to(mut self, n: f64) -> Self {
        self.greater_than_or_equal_to = Some(n);
        self
    }

    /// Requires a value strictly less than `n`.
    pub fn less_than(mut self, n: f64) -> Self {
        self.less_than = Some(n);
        self
    }

    /// Requires a value less than or equal to `n`.
    pub fn less_than_or_equal_to(mut self, n: f64) -> Self {
        self.less_than_or_equal_to = Some(n);
        self
    }

    /// Requires a value equal to `n`.
    pub fn equal_to(mut self, n: f64) -> Self {
        self.equal_to = Some(n);
        self
    }

    /// Requires a value different from `n`.
    pub fn other_than(mut self, n: f64) -> Self {
        self.other_than = Some(n);
        self
    }

    /// Requires an odd value.
    pub fn odd(mut self) -> Self {
        self.odd = true;
        self
    }

    /// Requires an even value.
    pub fn even(mut self) -> Self {
        self.even = true;
        self
    }

    /// Skips the check for `Null`.
    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    fn evaluate(&self, value: &Value, found: &mut Vec<ErrorKind>) {
        if value.is_null() && self.allow_nil {
            return;
        }
        let Some(number) = Number::parse(value) else {
            found.push(ErrorKind::NotANumber);
            return;
        };
        if self.only_integer && !number.is_integer() {
            found.push(ErrorKind::NotAnInteger);
            return;
        }

        let n = number.as_f64();
        if let Some(count) = self.greater_than {
            if n <= count {
                found.push(ErrorKind::GreaterThan { count });
            }
        }
        if let Some(count) = self.greater_than_or_equal_to {
            if n < count {
                found.push(ErrorKind::GreaterThanOrEqualTo { count });
            }
        }
        if let Some(count) = self.less_than {
            if n >= count {
                found.push(ErrorKind::LessThan { count });
            }
        }
        if let Some(count) = self.less_than_or_equal_to {
            if n > count {
                found.push(ErrorKind::LessThanOrEqualTo { count });
            }
        }
        if let Some(count) = self.equal_to {
            if n != count {
                found.push(ErrorKind::EqualTo { count });
            }
        }
        if let Some(count) = self.other_than {
            if n == count {
                found.push(ErrorKind::OtherThan { count });
            }
        }
        if self.odd && !number.is_odd() {
            found.push(ErrorKind::Odd);
        }
        if self.even && number.is_odd() {
            found.push(ErrorKind::Even);
        }
    }
}

/// Pattern constraint.
#[derive(Debug, Clone)]
pub struct Format {
    pattern: Regex,
    negate: bool,
    allow_nil: bool,
}

impl Format {
    /// Requires the value to match `pattern`.
    pub fn with(pattern: Regex) -> Self {
        Self {
            pattern,
            negate: false,
            allow_nil: false,
        }
    }

    /// Requires the value not to match `pattern`.
    pub fn without(pattern: Regex) -> Self {
        Self {
            pattern,
            negate: true,
            allow_nil: false,
        }
    }

    /// Skips the check for `Null`.
    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    fn evaluate(&self, value: &Value, found: &mut Vec<ErrorKind>) {
        if value.is_null() && self.allow_nil {
            return;
        }
        if self.pattern.is_match(&as_text(value)) == self.negate {
            found.push(ErrorKind::Invalid);
        }
    }
}

/// A single attribute check.
#[derive(Debug, Clone)]
pub enum Check {
    /// The value must not be blank.
    Presence,
    /// The value must be blank.
    Absence,
    /// Length constraints.
    Length(Length),
    /// Numeric constraints.
    Numericality(Numericality),
    /// Pattern constraint.
    Format(Format),
    /// The value must be one of these.
    Inclusion(Vec<Value>),
    /// The value must not be one of these.
    Exclusion(Vec<Value>),
}

impl Check {
    /// Runs the check against `value` and returns every violation found.
    pub fn evaluate(&self, value: &Value) -> Vec<ErrorKind> {
        let mut found = Vec::new();
        match self {
            Check::Presence => {
                if is_blank(value) {
                    found.push(ErrorKind::Blank);
                }
            }
            Check::Absence => {
                if !is_blank(value) {
                    found.push(ErrorKind::Present);
                }
            }
            Check::Length(length) => length.evaluate(value, &mut found),
            Check::Numericality(numericality) => numericality.evaluate(value, &mut found),
            Check::Format(format) => format.evaluate(value, &mut found),
            Check::Inclusion(allowed) => {
                if !allowed.contains(value) {
                    found.push(ErrorKind::Inclusion);
                }
            }
            Check::Exclusion(reserved) => {
                if reserved.contains(value) {
                    found.push(ErrorKind::Exclusion);
                }
            }
        }
        found
    }
}

impl From<Length> for Check {
    fn from(length: Length) -> Self {
        Check::Length(length)
    }
}

impl From<Numericality> for Check {
    fn from(numericality: Numericality) -> Self {
        Check::Numericality(numericality)
    }
}

impl From<Format> for Check {
    fn from(format: Format) -> Self {
        Check::Format(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn presence_rejects_blank_values() {
        for blank in [json!(null), json!(""), json!("  \t"), json!([]), json!({}), json!(false)] {
            assert_eq!(Check::Presence.evaluate(&blank), [ErrorKind::Blank], "{blank}");
        }
    }

    #[test]
    fn presence_accepts_values() {
        for present in [json!("Qiitan"), json!(0), json!(true), json!([1]), json!({ "a": 1 })] {
            assert!(Check::Presence.evaluate(&present).is_empty(), "{present}");
        }
    }

    #[test]
    fn absence_rejects_present_values() {
        assert_eq!(Check::Absence.evaluate(&json!("x")), [ErrorKind::Present]);
        assert!(Check::Absence.evaluate(&json!(null)).is_empty());
    }

    #[test]
    fn length_maximum_treats_null_as_empty() {
        let check = Check::from(Length::new().maximum(50));
        assert!(check.evaluate(&json!(null)).is_empty());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let check = Check::from(Length::new().maximum(3));
        assert!(check.evaluate(&json!("世界🌍")).is_empty());
    }

    #[test]
    fn length_reports_each_violated_bound() {
        let check = Check::from(Length::new().minimum(5).is(4));
        assert_eq!(
            check.evaluate(&json!("abc")),
            [
                ErrorKind::WrongLength { count: 4 },
                ErrorKind::TooShort { count: 5 }
            ]
        );
    }

    #[test]
    fn length_minimum_with_allow_nil_skips_null() {
        let check = Check::from(Length::new().minimum(1).allow_nil());
        assert!(check.evaluate(&json!(null)).is_empty());
        assert_eq!(
            check.evaluate(&json!("")),
            [ErrorKind::TooShort { count: 1 }]
        );
    }

    #[test]
    fn numericality_accepts_numeric_strings() {
        let check = Check::from(Numericality::new().only_integer());
        assert!(check.evaluate(&json!("100")).is_empty());
        assert!(check.evaluate(&json!(" -7 ")).is_empty());
    }

    #[test]
    fn numericality_rejects_non_numbers() {
        let check = Check::from(Numericality::new());
        for value in [json!(null), json!("abc"), json!(true), json!([1]), json!("inf")] {
            assert_eq!(check.evaluate(&value), [ErrorKind::NotANumber], "{value}");
        }
    }

    #[test]
    fn numericality_only_integer_rejects_floats() {
        let check = Check::from(Numericality::new().only_integer());
        assert_eq!(check.evaluate(&json!(1.5)), [ErrorKind::NotAnInteger]);
        assert_eq!(check.evaluate(&json!(100.0)), [ErrorKind::NotAnInteger]);
    }

    #[test]
    fn numericality_only_integer_accepts_integers_beyond_i64() {
        let check = Check::from(Numericality::new().only_integer());
        assert!(check.evaluate(&json!(u64::MAX)).is_empty());
        assert!(check.evaluate(&json!("99999999999999999999")).is_empty());
        assert!(check
            .evaluate(&json!("-999999999999999999999999999999999999999999"))
            .is_empty());
        assert_eq!(check.evaluate(&json!("1e3")), [ErrorKind::NotAnInteger]);
    }

    #[test]
    fn numericality_parity_of_large_unsigned() {
        let odd = Check::from(Numericality::new().odd());
        assert!(odd.evaluate(&json!(u64::MAX)).is_empty());
        assert!(odd.evaluate(&json!("18446744073709551617")).is_empty());
    }

    #[test]
    fn numericality_bounds() {
        let check = Check::from(Numericality::new().greater_than(0.0).less_than_or_equal_to(10.0));
        assert!(check.evaluate(&json!(10)).is_empty());
        assert_eq!(
            check.evaluate(&json!(0)),
            [ErrorKind::GreaterThan { count: 0.0 }]
        );
        assert_eq!(
            check.evaluate(&json!(11)),
            [ErrorKind::LessThanOrEqualTo { count: 10.0 }]
        );
    }

    #[test]
    fn numericality_parity() {
        let odd = Check::from(Numericality::new().odd());
        let even = Check::from(Numericality::new().even());
        assert!(odd.evaluate(&json!(3)).is_empty());
        assert_eq!(odd.evaluate(&json!(4)), [ErrorKind::Odd]);
        assert!(even.evaluate(&json!(-2)).is_empty());
        assert_eq!(even.evaluate(&json!(-3)), [ErrorKind::Even]);
    }

    #[test]
    fn numericality_equality() {
        let check = Check::from(Numericality::new().equal_to(3.0).other_than(4.0));
        assert!(check.evaluate(&json!(3)).is_empty());
        assert_eq!(
            check.evaluate(&json!(4)),
            [ErrorKind::EqualTo { count: 3.0 }, ErrorKind::OtherThan { count: 4.0 }]
        );
    }

    #[test]
    fn format_with_and_without() {
        let sku = Regex::new(r"^[A-Z]{3}-\d{4}$").unwrap();
        let with = Check::from(Format::with(sku.clone()));
        let without = Check::from(Format::without(sku));

        assert!(with.evaluate(&json!("ABC-1234")).is_empty());
        assert_eq!(with.evaluate(&json!("abc")), [ErrorKind::Invalid]);
        assert_eq!(without.evaluate(&json!("ABC-1234")), [ErrorKind::Invalid]);
        assert!(without.evaluate(&json!("abc")).is_empty());
    }

    #[test]
    fn format_matches_numbers_by_text() {
        let check = Check::from(Format::with(Regex::new(r"^\d+$").unwrap()));
        assert!(check.evaluate(&json!(42)).is_empty());
        assert_eq!(check.evaluate(&json!(null)), [ErrorKind::Invalid]);
    }

    #[test]
    fn inclusion_and_exclusion() {
        let inclusion = Check::Inclusion(vec![json!("small"), json!("large")]);
        let exclusion = Check::Exclusion(vec![json!("admin")]);

        assert!(inclusion.evaluate(&json!("small")).is_empty());
        assert_eq!(inclusion.evaluate(&json!("medium")), [ErrorKind::Inclusion]);
        assert_eq!(exclusion.evaluate(&json!("admin")), [ErrorKind::Exclusion]);
        assert!(exclusion.evaluate(&json!("guest")).is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any i64 passes an integer-only numericality check
            #[test]
            fn proptest_integers_pass_only_integer(n in any::<i64>()) {
                let check = Check::from(Numericality::new().only_integer());
                prop_assert!(check.evaluate(&json!(n)).is_empty());
                prop_assert!(check.evaluate(&json!(n.to_string())).is_empty());
            }

            /// Property: maximum length accepts exactly the strings within bound
            #[test]
            fn proptest_length_maximum_is_exact(s in "\\PC{0,20}", max in 0usize..20) {
                let check = Check::from(Length::new().maximum(max));
                let too_long = s.chars().count() > max;
                prop_assert_eq!(!check.evaluate(&json!(s)).is_empty(), too_long);
            }

            /// Property: presence and absence disagree on every value
            #[test]
            fn proptest_presence_absence_complementary(s in ".{0,10}") {
                let value = json!(s);
                let present = Check::Presence.evaluate(&value).is_empty();
                let absent = Check::Absence.evaluate(&value).is_empty();
                prop_assert_ne!(present, absent);
            }
        }
    }
}
