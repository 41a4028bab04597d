//! Validation of declared attributes.
//!
//! A [`ValidatorBlueprint`] is built once per interactor type and records
//! which fields exist and which rules apply. Each interactor instance gets
//! its own [`Validator`], which holds the assigned field values and the
//! error collection.

use std::fmt;

use serde_json::Value;

use crate::{
    errors::{Attribute, ErrorKind, Errors},
    params::Params,
    rules::{Check, Format, Length, Numericality},
};

type CustomRule<I> = Box<dyn Fn(&mut RuleContext<'_, I>) + Send + Sync>;

enum Rule<I> {
    Attribute { name: String, check: Check },
    Custom(CustomRule<I>),
}

/// Per-type validator configuration: the declared fields and their rules.
///
/// Obtained inside the closure passed to
/// [`DefinitionBuilder::validations`](crate::DefinitionBuilder::validations).
pub struct ValidatorBlueprint<I> {
    fields: Vec<String>,
    rules: Vec<Rule<I>>,
}

impl<I> ValidatorBlueprint<I> {
    pub(crate) fn new() -> Self {
        Self {
            fields: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Adds fields; names already declared are kept once.
    pub(crate) fn declare_fields(&mut self, names: &[String]) {
        for name in names {
            if !self.fields.contains(name) {
                self.fields.push(name.clone());
            }
        }
    }

    /// Returns every field the validator carries.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Starts registering checks for one attribute.
    ///
    /// Checks run in the order they are added.
    pub fn validates(&mut self, attribute: impl Into<String>) -> AttributeRules<'_, I> {
        AttributeRules {
            blueprint: self,
            attribute: attribute.into(),
        }
    }

    /// Registers a custom rule.
    ///
    /// The closure can read any attribute, the owning interactor, and add
    /// errors through the [`RuleContext`].
    pub fn validate<F>(&mut self, rule: F) -> &mut Self
    where
        F: Fn(&mut RuleContext<'_, I>) + Send + Sync + 'static,
    {
        self.rules.push(Rule::Custom(Box::new(rule)));
        self
    }
}

impl<I> fmt::Debug for ValidatorBlueprint<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBlueprint")
            .field("fields", &self.fields)
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Chained registration of checks for a single attribute.
///
/// # Examples
///
/// ```
/// use interactor_core::rules::{Length, Numericality};
/// use interactor_core::Definition;
///
/// struct CreateProduct;
///
/// let definition = Definition::<CreateProduct>::builder("CreateProduct")
///     .validations(["name", "price"], |v| {
///         v.validates("name").presence().length(Length::new().maximum(50));
///         v.validates("price").presence().numericality(Numericality::new().only_integer());
///     })
///     .build();
///
/// assert_eq!(definition.validator().rule_count(), 4);
/// ```
pub struct AttributeRules<'a, I> {
    blueprint: &'a mut ValidatorBlueprint<I>,
    attribute: String,
}

impl<I> AttributeRules<'_, I> {
    /// Adds an arbitrary check.
    pub fn check(self, check: impl Into<Check>) -> Self {
        self.blueprint.rules.push(Rule::Attribute {
            name: self.attribute.clone(),
            check: check.into(),
        });
        self
    }

    /// The value must not be blank.
    pub fn presence(self) -> Self {
        self.check(Check::Presence)
    }

    /// The value must be blank.
    pub fn absence(self) -> Self {
        self.check(Check::Absence)
    }

    /// Length constraints.
    pub fn length(self, length: Length) -> Self {
        self.check(length)
    }

    /// Numeric constraints.
    pub fn numericality(self, numericality: Numericality) -> Self {
        self.check(numericality)
    }

    /// Pattern constraint.
    pub fn format(self, format: Format) -> Self {
        self.check(format)
    }

    /// The value must be one of `allowed`.
    pub fn inclusion<V: Into<Value>>(self, allowed: impl IntoIterator<Item = V>) -> Self {
        self.check(Check::Inclusion(allowed.into_iter().map(Into::into).collect()))
    }

    /// The value must not be one of `reserved`.
    pub fn exclusion<V: Into<Value>>(self, reserved: impl IntoIterator<Item = V>) -> Self {
        self.check(Check::Exclusion(reserved.into_iter().map(Into::into).collect()))
    }
}

/// What a rule sees while it runs.
pub struct RuleContext<'a, I> {
    interactor: &'a I,
    attributes: &'a Params,
    errors: &'a mut Errors,
}

impl<'a, I> RuleContext<'a, I> {
    /// The interactor that owns the validator.
    ///
    /// Rules use this to check input against the interactor's own state.
    pub fn interactor(&self) -> &'a I {
        self.interactor
    }

    /// The current value of a field, `Null` when unset.
    pub fn attribute(&self, name: &str) -> &'a Value {
        self.attributes.value(name)
    }

    /// All field values.
    pub fn attributes(&self) -> &'a Params {
        self.attributes
    }

    /// Records an error.
    pub fn add(&mut self, attribute: impl Into<Attribute>, kind: ErrorKind) {
        self.errors.add(attribute, kind);
    }

    /// The errors recorded so far in this run.
    pub fn errors(&self) -> &Errors {
        &*self.errors
    }
}

/// Per-instance validator: assigned field values plus the error collection.
pub struct Validator<I: 'static> {
    blueprint: &'static ValidatorBlueprint<I>,
    attributes: Params,
    errors: Errors,
}

impl<I: 'static> Validator<I> {
    /// Creates a validator with every declared field set to `Null`.
    pub(crate) fn new(blueprint: &'static ValidatorBlueprint<I>) -> Self {
        let attributes = blueprint
            .fields
            .iter()
            .map(|name| (name.clone(), Value::Null))
            .collect();
        Self {
            blueprint,
            attributes,
            errors: Errors::new(),
        }
    }

    /// Sets each declared field present in `params`.
    ///
    /// Keys that are not fields are ignored.
    pub fn assign_attributes(&mut self, params: &Params) {
        for (name, value) in params.iter() {
            if self.attributes.contains_key(name) {
                self.attributes.insert(name, value.clone());
            } else {
                tracing::trace!(attribute = name, "ignoring undeclared attribute");
            }
        }
    }

    /// The current value of a field, `Null` when unset.
    pub fn attribute(&self, name: &str) -> &Value {
        self.attributes.value(name)
    }

    /// All field values.
    pub fn attributes(&self) -> &Params {
        &self.attributes
    }

    /// Runs every rule against the current fields and `interactor`.
    ///
    /// Previous errors are cleared first. Returns `true` when no rule
    /// reported an error.
    pub fn valid(&mut self, interactor: &I) -> bool {
        self.errors.clear();
        let mut ctx = RuleContext {
            interactor,
            attributes: &self.attributes,
            errors: &mut self.errors,
        };
        for rule in &self.blueprint.rules {
            match rule {
                Rule::Attribute { name, check } => {
                    for kind in check.evaluate(ctx.attribute(name)) {
                        ctx.add(name.as_str(), kind);
                    }
                }
                Rule::Custom(rule) => rule(&mut ctx),
            }
        }
        self.errors.is_empty()
    }

    /// The error collection.
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Mutable access to the error collection.
    pub fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }
}

impl<I: 'static> fmt::Debug for Validator<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.blueprint.fields)
            .field("errors", &self.errors)
            .finish()
    }
}
