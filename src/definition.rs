use std::fmt;

use crate::{
    exposure::ExposureRegistry,
    sanitizer::{AllowList, PassThrough, Sanitizer},
    validator::ValidatorBlueprint,
};

/// Name used when a definition is built without one.
pub const DEFAULT_NAME: &str = "Interactor";

/// Per-type interactor configuration.
///
/// A `Definition` is built once, when the interactor type is first used,
/// and never changes afterwards. It records what the type exposes, which
/// attributes it accepts, and the validation rules for them.
///
/// Implementors keep it in a `static` and hand it out from
/// [`Interactor::definition`](crate::Interactor::definition).
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
///     .expose(["product"])
///     .validations(["name", "price"], |v| {
///         v.validates("name").presence().length(Length::new().maximum(50));
///         v.validates("price").presence().numericality(Numericality::new().only_integer());
///     })
///     .build();
///
/// assert!(definition.validation_required());
/// assert_eq!(definition.validation_attribute_names(), ["name", "price"]);
/// assert!(definition.exposures().contains("product"));
/// ```
pub struct Definition<I> {
    name: String,
    exposures: ExposureRegistry,
    allow_list: AllowList,
    validator: ValidatorBlueprint<I>,
}

impl<I> Definition<I> {
    /// Starts building a definition for the interactor called `name`.
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder<I> {
        DefinitionBuilder::new(name)
    }

    /// The interactor's name, used in log spans.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the interactor exposes.
    pub fn exposures(&self) -> &ExposureRegistry {
        &self.exposures
    }

    /// The attributes accepted from callers, in declaration order.
    pub fn validation_attribute_names(&self) -> &[String] {
        self.allow_list.names()
    }

    /// Returns `true` if the interactor declared validations.
    ///
    /// Interactors without validations skip both sanitization and
    /// validation.
    pub fn validation_required(&self) -> bool {
        !self.allow_list.names().is_empty()
    }

    /// The validator configuration.
    pub fn validator(&self) -> &ValidatorBlueprint<I> {
        &self.validator
    }

    /// The sanitizer matching this configuration.
    ///
    /// [`AllowList`] over the declared attributes when validation is
    /// required, [`PassThrough`] otherwise.
    pub fn sanitizer(&self) -> &dyn Sanitizer {
        if self.validation_required() {
            &self.allow_list
        } else {
            &PassThrough
        }
    }
}

impl<I> fmt::Debug for Definition<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("exposures", &self.exposures)
            .field("attributes", &self.allow_list.names())
            .field("validator", &self.validator)
            .finish()
    }
}

/// Builder for [`Definition`].
///
/// Each declaration is meant to be made once, while the type is being
/// defined. Calling [`validations`](Self::validations) again replaces the
/// attribute list but keeps the rules registered so far.
pub struct DefinitionBuilder<I> {
    name: String,
    exposures: ExposureRegistry,
    attribute_names: Vec<String>,
    validator: ValidatorBlueprint<I>,
}

impl<I> DefinitionBuilder<I> {
    /// Creates a builder for the interactor called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exposures: ExposureRegistry::new(),
            attribute_names: Vec::new(),
            validator: ValidatorBlueprint::new(),
        }
    }

    /// Exposes each name in the outcome, read from the storage key of the
    /// same name.
    ///
    /// Exposing a name twice keeps a single entry.
    pub fn expose<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        for name in names {
            self.exposures.expose(name);
        }
        self
    }

    /// Exposes `name`, read from a differently named storage key.
    pub fn expose_as(mut self, name: impl Into<String>, storage_key: impl Into<String>) -> Self {
        self.exposures.register(name, storage_key);
        self
    }

    /// Declares the accepted attributes and registers rules for them.
    ///
    /// `names` replaces any earlier declaration. The validator gains a field
    /// for each name, then `rules` runs against the blueprint.
    pub fn validations<S, F>(mut self, names: impl IntoIterator<Item = S>, rules: F) -> Self
    where
        S: Into<String>,
        F: FnOnce(&mut ValidatorBlueprint<I>),
    {
        self.attribute_names = names.into_iter().map(Into::into).collect();
        self.validator.declare_fields(&self.attribute_names);
        rules(&mut self.validator);
        self
    }

    /// Freezes the configuration.
    pub fn build(self) -> Definition<I> {
        tracing::trace!(
            interactor = %self.name,
            exposures = self.exposures.len(),
            attributes = self.attribute_names.len(),
            rules = self.validator.rule_count(),
            "interactor defined"
        );
        Definition {
            name: self.name,
            exposures: self.exposures,
            allow_list: AllowList::new(self.attribute_names),
            validator: self.validator,
        }
    }
}

impl<I> Default for DefinitionBuilder<I> {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}
