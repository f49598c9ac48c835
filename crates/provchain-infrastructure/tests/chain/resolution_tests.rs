//! Resolution chain routing, aggregation and child scopes

use std::sync::Arc;

use provchain_domain::{Error, Resolver, ServiceRegistry};
use provchain_infrastructure::chain::{ChainOwnership, ResolutionChain};
use provchain_infrastructure::registry::ServiceCollection;

use crate::utils::{provider_with, shared, PlainRegistry, ReleaseLog};

trait Stage: Send + Sync {
    fn label(&self) -> &'static str;
}

struct Named(&'static str);

impl Stage for Named {
    fn label(&self) -> &'static str {
        self.0
    }
}

fn labels(chain: &ResolutionChain) -> Vec<&'static str> {
    chain
        .get_all::<dyn Stage>()
        .unwrap()
        .iter()
        .map(|stage| stage.label())
        .collect()
}

#[test]
fn test_first_registry_wins_single_lookup() {
    let log = ReleaseLog::new();
    let p1 = shared(provider_with::<dyn Stage>("p1", Arc::new(Named("p1")), &log));
    let p2 = shared(provider_with::<dyn Stage>("p2", Arc::new(Named("p2")), &log));
    let chain = ResolutionChain::new(vec![p1, p2]);

    for _ in 0..3 {
        assert_eq!(chain.get_required::<dyn Stage>().unwrap().label(), "p1");
    }
}

#[test]
fn test_lookup_falls_through_to_later_registry() {
    let log = ReleaseLog::new();
    let p1 = PlainRegistry::new("p1", &log).with(Arc::new(1_u8)).shared();
    let p2 = shared(provider_with::<dyn Stage>("p2", Arc::new(Named("p2")), &log));
    let chain = ResolutionChain::new(vec![p1, p2]);

    assert_eq!(chain.get_required::<dyn Stage>().unwrap().label(), "p2");
}

#[test]
fn test_unregistered_type_is_absent_and_required_fails() {
    let log = ReleaseLog::new();
    let chain = ResolutionChain::new(vec![PlainRegistry::new("p1", &log).shared()]);

    assert!(chain.get::<String>().unwrap().is_none());
    let err = chain.get_required::<String>().unwrap_err();
    assert!(matches!(err, Error::RequiredServiceMissing { .. }));
}

#[test]
fn test_many_lookup_concatenates_in_chain_order() {
    let log = ReleaseLog::new();
    let p1 = PlainRegistry::new("p1", &log)
        .with::<dyn Stage>(Arc::new(Named("a")))
        .shared();
    let p2 = PlainRegistry::new("p2", &log)
        .with::<dyn Stage>(Arc::new(Named("b")))
        .shared();
    let chain = ResolutionChain::new(vec![p1, p2]);

    assert_eq!(labels(&chain), ["a", "b"]);
}

#[test]
fn test_many_lookup_keeps_order_within_a_registry() {
    let log = ReleaseLog::new();
    let mut services = ServiceCollection::named("p1");
    services
        .add_instance::<dyn Stage>(Arc::new(Named("a1")))
        .add_instance::<dyn Stage>(Arc::new(Named("a2")));
    let p1 = shared(services.build(false).unwrap());
    let p2 = PlainRegistry::new("p2", &log)
        .with::<dyn Stage>(Arc::new(Named("b1")))
        .shared();
    let chain = ResolutionChain::new(vec![p1, p2]);

    assert_eq!(labels(&chain), ["a1", "a2", "b1"]);
}

#[test]
fn test_empty_chain_resolves_nothing_but_itself() {
    let chain = ResolutionChain::new(Vec::new());

    assert!(chain.is_empty());
    assert!(chain.get_all::<String>().unwrap().is_empty());
    assert!(chain.get::<String>().unwrap().is_none());

    let itself = chain.get_required::<ResolutionChain>().unwrap();
    assert!(Arc::ptr_eq(&itself, &chain));
    let as_registry = chain.get_required::<dyn ServiceRegistry>().unwrap();
    assert_eq!(as_registry.name(), chain.name());
}

#[test]
fn test_keyed_lookup_skips_registries_without_keyed_support() {
    let log = ReleaseLog::new();
    let plain = PlainRegistry::new("plain", &log)
        .with(Arc::new(String::from("unkeyed")))
        .shared();
    let mut services = ServiceCollection::named("keyed");
    services.add_keyed_instance("primary", Arc::new(String::from("keyed")));
    let keyed = shared(services.build(false).unwrap());
    let chain = ResolutionChain::new(vec![plain, keyed]);

    let value = chain.get_keyed::<String>("primary").unwrap().unwrap();
    assert_eq!(*value, "keyed");

    // The unkeyed entry in the first registry still answers unkeyed lookups.
    assert_eq!(*chain.get_required::<String>().unwrap(), "unkeyed");
}

fn keyed_provider(name: &str, entries: &[(&str, &str)]) -> Arc<dyn ServiceRegistry> {
    let mut services = ServiceCollection::named(name);
    for (key, value) in entries {
        services.add_keyed_instance(*key, Arc::new(value.to_string()));
    }
    shared(services.build(false).unwrap())
}

fn strings(values: Vec<Arc<String>>) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn test_keyed_many_lookup_concatenates_in_chain_order() {
    let log = ReleaseLog::new();
    let a = keyed_provider("a", &[("k", "a1"), ("other", "x"), ("k", "a2")]);
    let plain = PlainRegistry::new("plain", &log)
        .with(Arc::new(String::from("unkeyed")))
        .shared();
    let b = keyed_provider("b", &[("k", "b1")]);
    let chain = ResolutionChain::new(vec![a, plain, b]);

    let all = chain.get_all_keyed::<String>("k").unwrap();
    assert_eq!(strings(all), ["a1", "a2", "b1"]);

    // Single keyed lookup still stops at the first registry with a match.
    assert_eq!(*chain.get_required_keyed::<String>("k").unwrap(), "a2");
    assert!(chain.get_all_keyed::<String>("missing").unwrap().is_empty());
    assert_eq!(strings(chain.get_all::<String>().unwrap()), ["unkeyed"]);
}

#[test]
fn test_keyed_many_lookup_through_nested_chains_and_child_scopes() {
    let inner: Arc<dyn ServiceRegistry> = ResolutionChain::new(vec![
        keyed_provider("a", &[("k", "a1")]),
        keyed_provider("b", &[("k", "b1")]),
    ]);
    let outer = ResolutionChain::new(vec![keyed_provider("c", &[("k", "c1")]), inner]);

    assert_eq!(
        strings(outer.get_all_keyed::<String>("k").unwrap()),
        ["c1", "a1", "b1"]
    );

    let child = outer.create_child_scope().unwrap();
    assert_eq!(
        strings(child.get_all_keyed::<String>("k").unwrap()),
        ["c1", "a1", "b1"]
    );
    child.release().unwrap();
    assert!(child.get_all_keyed::<String>("k").unwrap_err().is_disposed());
}

#[test]
fn test_required_keyed_lookup_reports_type_and_key() {
    let log = ReleaseLog::new();
    let chain = ResolutionChain::new(vec![shared(provider_with(
        "p1",
        Arc::new(String::from("x")),
        &log,
    ))]);

    match chain.get_required_keyed::<String>("missing").unwrap_err() {
        Error::RequiredKeyedServiceMissing { service_type, key } => {
            assert_eq!(service_type, std::any::type_name::<String>());
            assert_eq!(key.as_str(), "missing");
        }
        other => panic!("Expected RequiredKeyedServiceMissing, got {other:?}"),
    }
}

#[test]
fn test_reachability_consults_capable_registries_only() {
    let log = ReleaseLog::new();
    let plain = PlainRegistry::new("plain", &log).with(Arc::new(1_u8)).shared();
    let provider = shared(provider_with("provider", Arc::new(2_u16), &log));
    let chain = ResolutionChain::new(vec![plain, provider]);

    assert!(chain.is_registered::<u16>());
    assert!(!chain.is_registered::<u8>());
    assert!(!chain.is_registered::<String>());
    assert!(chain.is_registered::<ResolutionChain>());
}

#[test]
fn test_chains_nest() {
    let log = ReleaseLog::new();
    let inner: Arc<dyn ServiceRegistry> = ResolutionChain::new(vec![
        PlainRegistry::new("a", &log).with::<dyn Stage>(Arc::new(Named("a"))).shared(),
        PlainRegistry::new("b", &log).with::<dyn Stage>(Arc::new(Named("b"))).shared(),
    ]);
    let outer = ResolutionChain::new(vec![
        PlainRegistry::new("c", &log).with::<dyn Stage>(Arc::new(Named("c"))).shared(),
        inner,
    ]);

    assert_eq!(labels(&outer), ["c", "a", "b"]);
}

#[test]
fn test_child_scope_aggregates_children_in_order_and_releases_all() {
    let log = ReleaseLog::new();
    let registries = vec![
        PlainRegistry::new("a", &log).with::<dyn Stage>(Arc::new(Named("a"))).shared(),
        shared(provider_with::<dyn Stage>("b", Arc::new(Named("b")), &log)),
        PlainRegistry::new("c", &log).with::<dyn Stage>(Arc::new(Named("c"))).shared(),
    ];
    let chain = ResolutionChain::new(registries);

    let child = chain.create_child_scope().unwrap();
    let stages: Vec<_> = child
        .get_all::<dyn Stage>()
        .unwrap()
        .iter()
        .map(|stage| stage.label())
        .collect();
    assert_eq!(stages, ["a", "b", "c"]);

    child.release().unwrap();
    assert_eq!(log.entries(), ["a/child", "b/scope-1", "c/child"]);

    // Releasing again has no further effect.
    child.release().unwrap();
    assert_eq!(log.entries().len(), 3);
    assert!(child.get_all::<dyn Stage>().err().unwrap().is_disposed());
}

#[test]
fn test_child_scope_chain_owns_its_members() {
    let chain = ResolutionChain::new(Vec::new());
    assert_eq!(chain.ownership(), ChainOwnership::Borrowed);

    let child = chain.create_child_scope().unwrap();
    let child = child.get_required::<ResolutionChain>().unwrap();
    assert_eq!(child.ownership(), ChainOwnership::Owned);
    assert!(child.registries().is_empty());
}

#[test]
fn test_released_owned_chain_rejects_self_lookups() {
    let log = ReleaseLog::new();
    let chain = ResolutionChain::new(vec![PlainRegistry::new("a", &log).shared()]);
    let child = chain.create_child_scope().unwrap();
    assert!(child.get::<ResolutionChain>().unwrap().is_some());

    child.release().unwrap();

    let err = child.get::<ResolutionChain>().unwrap_err();
    assert!(err.is_disposed());
    assert!(err.to_string().ends_with("a/child"));
    assert!(child.get::<dyn ServiceRegistry>().err().unwrap().is_disposed());
}

#[test]
fn test_borrowed_chain_never_releases_members() {
    let log = ReleaseLog::new();
    let member = PlainRegistry::new("member", &log).with(Arc::new(1_u8)).shared();
    let chain = ResolutionChain::new(vec![Arc::clone(&member)]);

    chain.release().unwrap();

    assert!(log.entries().is_empty());
    assert_eq!(*member.get_required::<u8>().unwrap(), 1);
    assert_eq!(*chain.get_required::<u8>().unwrap(), 1);
}

#[test]
fn test_failed_child_scope_releases_scopes_already_created() {
    let log = ReleaseLog::new();
    let chain = ResolutionChain::new(vec![
        PlainRegistry::new("a", &log).shared(),
        PlainRegistry::new("b", &log).shared(),
        PlainRegistry::new("c", &log).failing_child_scope().shared(),
    ]);

    let err = chain.create_child_scope().err().unwrap();

    assert!(err.to_string().contains("c refused a child scope"));
    assert_eq!(log.entries(), ["a/child", "b/child"]);
}

#[test]
fn test_owned_release_attempts_every_member() {
    let log = ReleaseLog::new();
    let chain = ResolutionChain::new(vec![
        PlainRegistry::new("a", &log).failing_release().shared(),
        PlainRegistry::new("b", &log).shared(),
    ]);
    let child = chain.create_child_scope().unwrap();

    let err = child.release().unwrap_err();

    assert!(err.to_string().contains("a/child failed to release"));
    assert_eq!(log.entries(), ["a/child", "b/child"]);
}

#[tokio::test]
async fn test_async_release_of_child_chain_uses_each_members_path() {
    use provchain_domain::ports::release_registry;

    let log = ReleaseLog::new();
    let mut services = ServiceCollection::named("async");
    let async_log = log.clone();
    services.on_release_async(move |event| {
        let log = async_log.clone();
        async move { log.record(format!("{} (async)", event.registry)) }
    });
    let chain = ResolutionChain::new(vec![
        shared(services.build(false).unwrap()),
        PlainRegistry::new("plain", &log).shared(),
    ]);
    let child = chain.create_child_scope().unwrap();

    release_registry(child.as_ref()).await.unwrap();

    assert_eq!(log.entries(), ["async/scope-1 (async)", "plain/child"]);
}
