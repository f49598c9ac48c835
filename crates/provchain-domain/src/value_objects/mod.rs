//! Value objects shared by every registry implementation

pub mod options;
pub mod request;
pub mod service;

pub use options::BuildOptions;
pub use request::{Resolution, ServiceRequest};
pub use service::{downcast_service, into_service, Service, ServiceKey, ServiceType};
