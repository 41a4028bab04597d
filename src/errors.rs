//! Structured error collection shared by validation and business logic.
//!
//! An [`Errors`] value is what an interactor reports back when an operation
//! did not go through: validation rules fill it, business logic may add to
//! it, and an [`Outcome`](crate::Outcome) carries a copy of it.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Which part of the input an error is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// The object as a whole rather than any single field.
    Base,
    /// A named field.
    Field(String),
}

impl Attribute {
    /// Returns the attribute name (`"base"` for [`Attribute::Base`]).
    pub fn name(&self) -> &str {
        match self {
            Attribute::Base => "base",
            Attribute::Field(name) => name,
        }
    }

    /// Returns the human-readable name used in full messages.
    ///
    /// `target_user` becomes `Target user`.
    pub fn humanize(&self) -> String {
        let name = self.name();
        let stem = match name.strip_suffix("_id") {
            Some(stem) if !stem.is_empty() => stem,
            _ => name,
        };
        let spaced = stem.replace('_', " ");
        let mut chars = spaced.trim().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        if name == "base" {
            Attribute::Base
        } else {
            Attribute::Field(name.to_string())
        }
    }
}

impl From<String> for Attribute {
    fn from(name: String) -> Self {
        if name == "base" {
            Attribute::Base
        } else {
            Attribute::Field(name)
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a value was rejected.
///
/// Each kind renders to a fixed English message; [`ErrorKind::Message`]
/// carries free text for errors raised by custom rules or business logic.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Value is blank but must be present.
    Blank,
    /// Value is present but must be blank.
    Present,
    /// Value is longer than `count` characters.
    TooLong {
        /// Maximum length
        count: usize,
    },
    /// Value is shorter than `count` characters.
    TooShort {
        /// Minimum length
        count: usize,
    },
    /// Value is not exactly `count` characters.
    WrongLength {
        /// Required length
        count: usize,
    },
    /// Value is not numeric.
    NotANumber,
    /// Value is numeric but not an integer.
    NotAnInteger,
    /// Value must be greater than `count`.
    GreaterThan {
        /// Exclusive lower bound
        count: f64,
    },
    /// Value must be greater than or equal to `count`.
    GreaterThanOrEqualTo {
        /// Inclusive lower bound
        count: f64,
    },
    /// Value must be less than `count`.
    LessThan {
        /// Exclusive upper bound
        count: f64,
    },
    /// Value must be less than or equal to `count`.
    LessThanOrEqualTo {
        /// Inclusive upper bound
        count: f64,
    },
    /// Value must equal `count`.
    EqualTo {
        /// Required value
        count: f64,
    },
    /// Value must differ from `count`.
    OtherThan {
        /// Forbidden value
        count: f64,
    },
    /// Value must be odd.
    Odd,
    /// Value must be even.
    Even,
    /// Value is malformed.
    Invalid,
    /// Value is not one of the allowed values.
    Inclusion,
    /// Value is one of the reserved values.
    Exclusion,
    /// Free-form message.
    Message(String),
}

impl ErrorKind {
    /// Builds a free-form message kind.
    pub fn message(text: impl Into<String>) -> Self {
        ErrorKind::Message(text.into())
    }
}

fn characters(count: usize) -> &'static str {
    if count == 1 {
        "character"
    } else {
        "characters"
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Blank => f.write_str("can't be blank"),
            ErrorKind::Present => f.write_str("must be blank"),
            ErrorKind::TooLong { count } => {
                write!(f, "is too long (maximum is {} {})", count, characters(*count))
            }
            ErrorKind::TooShort { count } => {
                write!(f, "is too short (minimum is {} {})", count, characters(*count))
            }
            ErrorKind::WrongLength { count } => {
                write!(f, "is the wrong length (should be {} {})", count, characters(*count))
            }
            ErrorKind::NotANumber => f.write_str("is not a number"),
            ErrorKind::NotAnInteger => f.write_str("must be an integer"),
            ErrorKind::GreaterThan { count } => write!(f, "must be greater than {}", count),
            ErrorKind::GreaterThanOrEqualTo { count } => {
                write!(f, "must be greater than or equal to {}", count)
            }
            ErrorKind::LessThan { count } => write!(f, "must be less than {}", count),
            ErrorKind::LessThanOrEqualTo { count } => {
                write!(f, "must be less than or equal to {}", count)
            }
            ErrorKind::EqualTo { count } => write!(f, "must be equal to {}", count),
            ErrorKind::OtherThan { count } => write!(f, "must be other than {}", count),
            ErrorKind::Odd => f.write_str("must be odd"),
            ErrorKind::Even => f.write_str("must be even"),
            ErrorKind::Invalid => f.write_str("is invalid"),
            ErrorKind::Inclusion => f.write_str("is not included in the list"),
            ErrorKind::Exclusion => f.write_str("is reserved"),
            ErrorKind::Message(text) => f.write_str(text),
        }
    }
}

/// A single recorded error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEntry {
    attribute: Attribute,
    kind: ErrorKind,
}

impl ErrorEntry {
    /// The attribute the error is about.
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// The structured reason.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The message without the attribute prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// The message prefixed with the humanized attribute name.
    ///
    /// Base errors are returned unprefixed.
    pub fn full_message(&self) -> String {
        match self.attribute {
            Attribute::Base => self.message(),
            Attribute::Field(_) => match self.attribute.humanize() {
                label if label.is_empty() => self.message(),
                label => format!("{label} {}", self.kind),
            },
        }
    }
}

/// Anything that can report a list of full error messages.
///
/// This is the contract [`Errors::merge_errors`] needs from the collection it
/// absorbs, so nested operations can hand over either their [`Errors`], an
/// [`Outcome`](crate::Outcome), or plain strings.
pub trait FullMessages {
    /// Returns every message, attribute-prefixed where applicable, in order.
    fn full_messages(&self) -> Vec<String>;
}

/// Ordered collection of errors keyed by attribute.
///
/// # Examples
///
/// ```
/// use interactor_core::{Attribute, ErrorKind, Errors};
///
/// let mut errors = Errors::new();
/// errors.add("price", ErrorKind::Blank);
/// errors.add(Attribute::Base, ErrorKind::message("repository is read-only"));
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(
///     errors.full_messages(),
///     ["Price can't be blank", "repository is read-only"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Errors {
    entries: Vec<ErrorEntry>,
}

impl Errors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error against `attribute`.
    pub fn add(&mut self, attribute: impl Into<Attribute>, kind: ErrorKind) {
        self.entries.push(ErrorEntry {
            attribute: attribute.into(),
            kind,
        });
    }

    /// Records an object-level error.
    pub fn add_to_base(&mut self, kind: ErrorKind) {
        self.add(Attribute::Base, kind);
    }

    /// Returns `true` if no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of recorded errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every recorded error.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the entries in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter()
    }

    /// Returns the distinct attributes that have errors, in first-seen order.
    pub fn attributes(&self) -> Vec<&Attribute> {
        let mut seen: Vec<&Attribute> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&&entry.attribute) {
                seen.push(&entry.attribute);
            }
        }
        seen
    }

    /// Returns the messages recorded against `attribute`.
    pub fn messages_for(&self, attribute: impl Into<Attribute>) -> Vec<String> {
        let attribute = attribute.into();
        self.entries
            .iter()
            .filter(|e| e.attribute == attribute)
            .map(ErrorEntry::message)
            .collect()
    }

    /// Returns the full messages recorded against `attribute`.
    pub fn full_messages_for(&self, attribute: impl Into<Attribute>) -> Vec<String> {
        let attribute = attribute.into();
        self.entries
            .iter()
            .filter(|e| e.attribute == attribute)
            .map(ErrorEntry::full_message)
            .collect()
    }

    /// Returns the object-level messages.
    pub fn base_messages(&self) -> Vec<String> {
        self.messages_for(Attribute::Base)
    }

    /// Returns every message, attribute-prefixed, in insertion order.
    pub fn full_messages(&self) -> Vec<String> {
        self.entries.iter().map(ErrorEntry::full_message).collect()
    }

    /// Returns `true` if `kind` was recorded against `attribute`.
    pub fn is_added(&self, attribute: impl Into<Attribute>, kind: &ErrorKind) -> bool {
        let attribute = attribute.into();
        self.entries
            .iter()
            .any(|e| e.attribute == attribute && &e.kind == kind)
    }

    /// Appends every full message of `other` to the base bucket.
    ///
    /// Order is preserved. This is how a composing interactor surfaces the
    /// failure of a nested one.
    ///
    /// # Examples
    ///
    /// ```
    /// use interactor_core::{ErrorKind, Errors};
    ///
    /// let mut nested = Errors::new();
    /// nested.add("stock", ErrorKind::Blank);
    ///
    /// let mut errors = Errors::new();
    /// errors.merge_errors(&nested);
    ///
    /// assert_eq!(errors.base_messages(), ["Stock can't be blank"]);
    /// ```
    pub fn merge_errors<M: FullMessages + ?Sized>(&mut self, other: &M) {
        for message in other.full_messages() {
            self.add_to_base(ErrorKind::Message(message));
        }
    }
}

impl FullMessages for Errors {
    fn full_messages(&self) -> Vec<String> {
        Errors::full_messages(self)
    }
}

impl FullMessages for [String] {
    fn full_messages(&self) -> Vec<String> {
        self.to_vec()
    }
}

impl FullMessages for Vec<String> {
    fn full_messages(&self) -> Vec<String> {
        self.clone()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a ErrorEntry;
    type IntoIter = std::slice::Iter<'a, ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

/// Serializes as `{ "attribute": ["message", ...] }`.
impl Serialize for Errors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let attributes = self.attributes();
        let mut map = serializer.serialize_map(Some(attributes.len()))?;
        for attribute in attributes {
            map.serialize_entry(attribute.name(), &self.messages_for(attribute.clone()))?;
        }
        map.end()
    }
}
