//! The interactor contract and the call pipeline.
//!
//! ```text
//! CallArgs ──extract──▶ Params ──sanitize──▶ Params ──validate──▶ perform ──▶ snapshot ──▶ Outcome
//!     │                                          │
//!     └─▶ UsageError                             └─▶ errors: skip perform
//! ```

use std::fmt;

use serde_json::Value;

use crate::{
    definition::Definition,
    error::CallError,
    errors::{Errors, FullMessages},
    outcome::Outcome,
    params::{CallArgs, Params},
    validator::Validator,
};

/// One business operation.
///
/// Implementors supply the per-type [`Definition`], the business logic in
/// [`perform`](Self::perform), and a way to [`read`](Self::read) the state
/// the definition exposes. Callers never invoke `perform` directly; they
/// wrap the value in an [`Instance`] and go through
/// [`Instance::call`], which sanitizes and validates input first.
///
/// # Examples
///
/// ```
/// use interactor_core::{Definition, ErrorKind, Errors, Interactor, Params};
/// use serde_json::json;
/// use std::convert::Infallible;
/// use std::sync::LazyLock;
///
/// struct Archive;
///
/// impl Interactor for Archive {
///     type Error = Infallible;
///
///     fn definition() -> &'static Definition<Self> {
///         static DEFINITION: LazyLock<Definition<Archive>> =
///             LazyLock::new(|| Definition::builder("Archive").expose(["product"]).build());
///         &DEFINITION
///     }
///
///     fn perform(&mut self, _input: Option<Params>, errors: &mut Errors) -> Result<(), Infallible> {
///         errors.add_to_base(ErrorKind::Invalid);
///         Ok(())
///     }
/// }
///
/// let outcome = Archive.into_instance().call(()).unwrap();
/// assert!(outcome.failure());
/// assert_eq!(outcome.get("product").unwrap(), &json!(null));
/// ```
pub trait Interactor: Sized + 'static {
    /// Error returned by business logic; propagated to the caller untouched.
    type Error;

    /// The per-type configuration, built once.
    fn definition() -> &'static Definition<Self>;

    /// Runs the business logic.
    ///
    /// `input` is `None` when the call carried no options and the type
    /// declares no validations; otherwise it holds the sanitized options.
    /// Recording an error in `errors` fails the call without aborting it.
    fn perform(&mut self, input: Option<Params>, errors: &mut Errors) -> Result<(), Self::Error>;

    /// Reads the value stored under `key`, for exposure.
    ///
    /// `None` means "never set" and shows up as `Null` in the outcome.
    fn read(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Wraps the value in an [`Instance`].
    fn into_instance(self) -> Instance<Self> {
        Instance::new(self)
    }
}

/// An interactor value together with its validator.
///
/// The validator is created on first use and kept for the life of the
/// instance. `call` takes `&mut self`, so one instance serves one call at a
/// time.
pub struct Instance<I: Interactor> {
    interactor: I,
    validator: Option<Validator<I>>,
}

impl<I: Interactor> Instance<I> {
    /// Wraps `interactor`.
    pub fn new(interactor: I) -> Self {
        Self {
            interactor,
            validator: None,
        }
    }

    /// The wrapped interactor.
    pub fn interactor(&self) -> &I {
        &self.interactor
    }

    /// Mutable access to the wrapped interactor.
    pub fn interactor_mut(&mut self) -> &mut I {
        &mut self.interactor
    }

    /// Unwraps the interactor, discarding the validator.
    pub fn into_inner(self) -> I {
        self.interactor
    }

    /// The validator, created on first access.
    pub fn validator(&mut self) -> &mut Validator<I> {
        self.validator
            .get_or_insert_with(|| Validator::new(I::definition().validator()))
    }

    /// The validator, if it has been created.
    pub fn validator_if_created(&self) -> Option<&Validator<I>> {
        self.validator.as_ref()
    }

    /// The instance's error collection.
    pub fn errors(&mut self) -> &mut Errors {
        self.validator().errors_mut()
    }

    /// Appends every full message of `other` to the base bucket.
    pub fn merge_errors<M: FullMessages + ?Sized>(&mut self, other: &M) {
        self.errors().merge_errors(other);
    }

    /// Runs the interactor.
    ///
    /// Accepts zero arguments or a single options mapping. Undeclared keys
    /// are stripped, declared ones validated, and business logic only runs
    /// when validation passes. Errors from a previous call are cleared
    /// first.
    ///
    /// # Errors
    ///
    /// - [`CallError::Usage`] if `args` is not empty or a single mapping.
    ///   Nothing runs in that case.
    /// - [`CallError::Raised`] if business logic returned an error.
    ///
    /// Validation failures are not errors here; they come back as a failed
    /// [`Outcome`].
    pub fn call(&mut self, args: impl Into<CallArgs>) -> Result<Outcome, CallError<I::Error>> {
        let definition = I::definition();
        let params = args.into().extract_options()?;

        let span = tracing::debug_span!("interactor.call", interactor = definition.name());
        let _enter = span.enter();

        let validator = self
            .validator
            .get_or_insert_with(|| Validator::new(definition.validator()));
        validator.errors_mut().clear();

        if params.is_empty() && !definition.validation_required() {
            tracing::trace!("no options and no validations, performing directly");
            self.interactor
                .perform(None, validator.errors_mut())
                .map_err(CallError::Raised)?;
        } else {
            let params = definition.sanitizer().sanitize(params);
            if definition.validation_required() {
                validator.assign_attributes(&params);
                validator.valid(&self.interactor);
            }

            if validator.errors().is_empty() {
                self.interactor
                    .perform(Some(params), validator.errors_mut())
                    .map_err(CallError::Raised)?;
            } else {
                tracing::debug!(
                    errors = validator.errors().len(),
                    "validation failed, skipping perform"
                );
            }
        }

        let payload = definition
            .exposures()
            .snapshot(|key| self.interactor.read(key));
        let outcome = Outcome::new(payload, validator.errors().clone());

        tracing::debug!(success = outcome.success(), "call finished");
        Ok(outcome)
    }
}

impl<I: Interactor + fmt::Debug> fmt::Debug for Instance<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("interactor", &self.interactor)
            .field("validator", &self.validator)
            .finish()
    }
}
