//! Unit tests for request classification and build options

use provchain_domain::value_objects::Resolution;
use provchain_domain::{BuildOptions, ServiceKey, ServiceRegistry, ServiceRequest, ServiceType};

#[test]
fn test_single_request_for_registry_is_self_reference() {
    assert_eq!(
        ServiceRequest::single::<dyn ServiceRegistry>(),
        ServiceRequest::SelfReference
    );
    assert_eq!(ServiceRequest::SelfReference.service_type(), None);
}

#[test]
fn test_requests_carry_their_type() {
    assert_eq!(
        ServiceRequest::single::<String>(),
        ServiceRequest::Single(ServiceType::of::<String>())
    );
    assert_eq!(
        ServiceRequest::many::<u32>().service_type(),
        Some(ServiceType::of::<u32>())
    );
    assert_eq!(
        ServiceRequest::keyed::<u32>("primary"),
        ServiceRequest::Keyed(ServiceType::of::<u32>(), ServiceKey::from("primary"))
    );
}

#[test]
fn test_keyed_collection_request_is_distinct_from_keyed_single() {
    let many = ServiceRequest::keyed_many::<u32>("stages");

    assert_eq!(
        many,
        ServiceRequest::KeyedMany(ServiceType::of::<u32>(), ServiceKey::from("stages"))
    );
    assert_ne!(many, ServiceRequest::keyed::<u32>("stages"));
    assert_eq!(many.service_type(), Some(ServiceType::of::<u32>()));
}

#[test]
fn test_resolution_conversions() {
    assert!(Resolution::One(None).is_empty());
    assert!(Resolution::Many(Vec::new()).is_empty());
    assert!(Resolution::One(None).into_many().is_empty());
    assert!(Resolution::Many(Vec::new()).into_one().is_none());
}

#[test]
fn test_bool_maps_to_scope_validation_only() {
    let options = BuildOptions::from(true);
    assert!(options.validate_scopes);
    assert!(!options.validate_on_build);
    assert_eq!(BuildOptions::from(false), BuildOptions::default());
}

#[test]
fn test_build_options_builders() {
    let options = BuildOptions::new()
        .with_validate_on_build(true)
        .with_validate_scopes(true);
    assert!(options.validate_scopes && options.validate_on_build);
}
