//! Error handling types

use thiserror::Error;

use crate::value_objects::ServiceKey;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for service resolution
#[derive(Error, Debug)]
pub enum Error {
    /// A required lookup found no registration for the type
    #[error("Required service not registered: {service_type}")]
    RequiredServiceMissing {
        /// Name of the requested type
        service_type: &'static str,
    },

    /// A required keyed lookup found no registration for the type and key
    #[error("Required keyed service not registered: {service_type} (key: {key})")]
    RequiredKeyedServiceMissing {
        /// Name of the requested type
        service_type: &'static str,
        /// Key that was requested
        key: ServiceKey,
    },

    /// The registry was used after it had been released
    #[error("Registry used after release: {registry}")]
    Disposed {
        /// Name of the released registry
        registry: String,
    },

    /// A stored value did not downcast to the requested type
    #[error("Service type mismatch for {service_type}")]
    TypeMismatch {
        /// Name of the requested type
        service_type: &'static str,
    },

    /// A scoped service was resolved outside of a child scope
    #[error("Scope violation for {service_type}: {message}")]
    ScopeViolation {
        /// Name of the requested type
        service_type: &'static str,
        /// Description of the violation
        message: String,
    },

    /// A registered factory failed to construct its service
    #[error("Failed to construct {service_type}: {message}")]
    Construction {
        /// Name of the type being constructed
        service_type: &'static str,
        /// Description of the failure
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic error from external sources
    #[error("Generic error: {0}")]
    Generic(#[from] Box<dyn std::error::Error + Send + Sync>),
}

// Resolution error creation methods
impl Error {
    /// Create a missing required service error
    pub fn required_service_missing(service_type: &'static str) -> Self {
        Self::RequiredServiceMissing { service_type }
    }

    /// Create a missing required keyed service error
    pub fn required_keyed_service_missing<K: Into<ServiceKey>>(
        service_type: &'static str,
        key: K,
    ) -> Self {
        Self::RequiredKeyedServiceMissing {
            service_type,
            key: key.into(),
        }
    }

    /// Create a used-after-release error
    pub fn disposed<S: Into<String>>(registry: S) -> Self {
        Self::Disposed {
            registry: registry.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(service_type: &'static str) -> Self {
        Self::TypeMismatch { service_type }
    }

    /// Create a scope violation error
    pub fn scope_violation<S: Into<String>>(service_type: &'static str, message: S) -> Self {
        Self::ScopeViolation {
            service_type,
            message: message.into(),
        }
    }

    /// Create a construction error
    pub fn construction<S: Into<String>>(service_type: &'static str, message: S) -> Self {
        Self::Construction {
            service_type,
            message: message.into(),
        }
    }
}

// Configuration and infrastructure error creation methods
impl Error {
    /// Create a generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into().into())
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }
}

impl Error {
    /// True for errors raised by a registry after its release
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed { .. })
    }

    /// True for either flavour of missing required service
    pub fn is_missing_service(&self) -> bool {
        matches!(
            self,
            Self::RequiredServiceMissing { .. } | Self::RequiredKeyedServiceMissing { .. }
        )
    }
}
