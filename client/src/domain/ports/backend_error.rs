//! Errors raised by adapters for the hosted backend service.

use super::define_port_error;
use crate::domain::DomainError;

define_port_error! {
    /// Errors raised by backend adapters.
    ///
    /// Each variant carries the service's own message so workflows can show
    /// it to the user verbatim.
    pub enum BackendError {
        /// The service could not be reached.
        Connection { message: String } =>
            "backend connection failed: {message}",
        /// A read or write was rejected for a reason other than a constraint.
        Query { message: String } =>
            "backend query failed: {message}",
        /// A write violated a table constraint, e.g. a missing foreign key.
        Constraint { message: String } =>
            "backend rejected the write: {message}",
        /// The addressed resource does not exist.
        NotFound { message: String } =>
            "backend resource not found: {message}",
        /// The response could not be decoded into domain records.
        Decode { message: String } =>
            "backend returned an unexpected payload: {message}",
    }
}

impl BackendError {
    /// The service's message without the adapter prefix.
    #[must_use]
    pub const fn message(&self) -> &str {
        match self {
            Self::Connection { message }
            | Self::Query { message }
            | Self::Constraint { message }
            | Self::NotFound { message }
            | Self::Decode { message } => message.as_str(),
        }
    }
}

impl From<BackendError> for DomainError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Connection { message } => Self::service_unavailable(message),
            BackendError::Constraint { message } => Self::invalid_request(message),
            BackendError::NotFound { message } => Self::not_found(message),
            BackendError::Query { message } | BackendError::Decode { message } => {
                Self::internal(message)
            }
        }
    }
}
