//! Composable business operations behind a uniform `call` contract.
//!
//! An *interactor* wraps one business operation. Every call goes through the
//! same pipeline:
//! - **Allow-listing**: undeclared input keys are dropped before anything else sees them
//! - **Validation**: declared attributes are checked; business logic never runs on invalid input
//! - **Exposure**: only the state the interactor declares is copied into the result
//!
//! # Core Types
//!
//! - [`Interactor`]: Trait implemented by each business operation
//! - [`Definition`]: Per-type configuration built once with [`DefinitionBuilder`]
//! - [`Instance`]: An interactor value plus its lazily created [`Validator`]
//! - [`Outcome`]: Immutable result with exposed values and [`Errors`]
//! - [`AllowList`]: [`Sanitizer`] implementing mass-assignment protection
//!
//! # Examples
//!
//! ```
//! use interactor_core::rules::{Length, Numericality};
//! use interactor_core::{Definition, Errors, Interactor, Params};
//! use serde_json::{json, Value};
//! use std::convert::Infallible;
//! use std::sync::LazyLock;
//!
//! #[derive(Default)]
//! struct CreateProduct {
//!     product: Option<Value>,
//! }
//!
//! impl Interactor for CreateProduct {
//!     type Error = Infallible;
//!
//!     fn definition() -> &'static Definition<Self> {
//!         static DEFINITION: LazyLock<Definition<CreateProduct>> = LazyLock::new(|| {
//!             Definition::builder("CreateProduct")
//!                 .expose(["product"])
//!                 .validations(["name", "price"], |v| {
//!                     v.validates("name").presence().length(Length::new().maximum(50));
//!                     v.validates("price").presence().numericality(Numericality::new().only_integer());
//!                 })
//!                 .build()
//!         });
//!         &DEFINITION
//!     }
//!
//!     fn perform(&mut self, input: Option<Params>, _errors: &mut Errors) -> Result<(), Infallible> {
//!         self.product = input.map(Value::from);
//!         Ok(())
//!     }
//!
//!     fn read(&self, key: &str) -> Option<Value> {
//!         match key {
//!             "product" => self.product.clone(),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut instance = CreateProduct::default().into_instance();
//!
//! let outcome = instance
//!     .call(json!({ "name": "Qiitan", "price": 100, "admin": true }))
//!     .expect("well-formed call");
//! assert!(outcome.success());
//! assert_eq!(outcome.get("product").unwrap(), &json!({ "name": "Qiitan", "price": 100 }));
//!
//! let outcome = instance.call(json!({ "name": "Widget" })).expect("well-formed call");
//! assert!(outcome.failure());
//! assert_eq!(
//!     outcome.errors().full_messages(),
//!     ["Price can't be blank", "Price is not a number"]
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod definition;
mod error;
mod errors;
mod exposure;
mod interactor;
mod outcome;
mod params;
pub mod rules;
mod sanitizer;
mod validator;

#[cfg(test)]
mod test_utils;

pub use definition::{Definition, DefinitionBuilder, DEFAULT_NAME};
pub use error::{CallError, FieldAccessError, UsageError};
pub use errors::{Attribute, ErrorEntry, ErrorKind, Errors, FullMessages};
pub use exposure::ExposureRegistry;
pub use interactor::{Instance, Interactor};
pub use outcome::Outcome;
pub use params::{CallArgs, Params};
pub use sanitizer::{AllowList, PassThrough, Sanitizer};
pub use validator::{AttributeRules, RuleContext, Validator, ValidatorBlueprint};
