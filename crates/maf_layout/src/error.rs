//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover unreachable or failing backend services, invalid configuration and
//! operations issued before a site was set up. Equipment the renderer cannot show is not an
//! error; it is reported as [`crate::scene::LayoutEvent::UnknownEquipment`].
use thiserror::Error;

use crate::service::ServiceKind;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A generation or calculation call failed. The scene keeps its last applied state.
    #[error("{service} service unavailable: {message}")]
    ServiceUnavailable {
        service: ServiceKind,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no site has been set up")]
    NoSite,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::ServiceUnavailable`] with a display-able cause.
    pub fn service_unavailable(service: ServiceKind, cause: impl std::fmt::Display) -> Self {
        Error::ServiceUnavailable {
            service,
            message: cause.to_string(),
        }
    }

    /// Whether the caller can keep working with the current scene after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ServiceUnavailable { .. })
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
