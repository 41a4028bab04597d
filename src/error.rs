use thiserror::Error;

/// A malformed call: the argument list has the wrong shape.
///
/// Usage errors are raised before any pipeline stage runs. They are never
/// recorded in an [`Outcome`](crate::Outcome); the call site has to change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// More than one positional argument was given.
    #[error("expected zero or one options mapping, got {given} arguments")]
    TooManyArguments {
        /// How many arguments the caller passed
        given: usize,
    },
    /// The single argument was not a mapping.
    #[error("expected an options mapping, got {found}")]
    NotAMapping {
        /// JSON type of the rejected argument
        found: &'static str,
    },
}

/// Errors returned by [`Instance::call`](crate::Instance::call).
///
/// Neither variant is a validation failure: those end up in
/// [`Outcome::errors`](crate::Outcome::errors).
#[derive(Debug, Error)]
pub enum CallError<E> {
    /// The call arguments were malformed.
    #[error("invalid call: {0}")]
    Usage(#[from] UsageError),
    /// The business logic returned an error; it is passed through untouched.
    #[error(transparent)]
    Raised(E),
}

impl<E> CallError<E> {
    /// Returns the usage error, if this is one.
    pub fn usage(&self) -> Option<&UsageError> {
        match self {
            CallError::Usage(err) => Some(err),
            CallError::Raised(_) => None,
        }
    }

    /// Consumes the error and returns the business-logic error, if this is one.
    pub fn into_raised(self) -> Option<E> {
        match self {
            CallError::Usage(_) => None,
            CallError::Raised(err) => Some(err),
        }
    }
}

/// Errors returned when reading a field off an [`Outcome`](crate::Outcome).
#[derive(Debug, Error)]
pub enum FieldAccessError {
    /// The name is not one of the interactor's exposures.
    #[error("undefined field '{name}' for outcome")]
    UnknownField {
        /// The requested name
        name: String,
    },
    /// The field exists but its value does not fit the requested type.
    #[error("field '{name}' has an unexpected shape: {source}")]
    Deserialize {
        /// The requested name
        name: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_display() {
        let err = UsageError::TooManyArguments { given: 2 };
        assert_eq!(
            err.to_string(),
            "expected zero or one options mapping, got 2 arguments"
        );

        let err = UsageError::NotAMapping { found: "string" };
        assert_eq!(err.to_string(), "expected an options mapping, got string");
    }

    #[test]
    fn call_error_wraps_usage() {
        let err: CallError<std::io::Error> = UsageError::NotAMapping { found: "number" }.into();

        assert!(err.to_string().starts_with("invalid call:"));
        assert_eq!(err.usage(), Some(&UsageError::NotAMapping { found: "number" }));
        assert!(err.into_raised().is_none());
    }

    #[test]
    fn raised_error_is_transparent() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "repository offline");
        let err = CallError::Raised(inner);

        assert_eq!(err.to_string(), "repository offline");
        assert!(err.usage().is_none());
        assert_eq!(err.into_raised().unwrap().to_string(), "repository offline");
    }

    #[test]
    fn unknown_field_display() {
        let err = FieldAccessError::UnknownField {
            name: "secret".to_string(),
        };
        assert_eq!(err.to_string(), "undefined field 'secret' for outcome");
    }
}
