//! Integration tests for Slicebox

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use slicebox::binding::{connect, selector};
use slicebox::registry::{self, EFFECTS_FIELD, INITIAL_STATE_FIELD};
use slicebox::{
    dispatch, Action, Dispatched, Entity, ErrorKind, Registry, Store, StoreConfig, Value,
};

fn add(slice: &Value, payload: &Value) -> Value {
    Value::from(slice.as_f64().unwrap_or(0.0) + payload.as_f64().unwrap_or(0.0))
}

fn counter_entities() -> Value {
    Value::object([("counter", Entity::new(0).effect("INCREMENT", add))])
}

#[test]
fn counter_scenario() {
    let registry = registry::build(&counter_entities()).unwrap();
    assert_eq!(
        registry.initial_global_state().to_value(),
        Value::object([("counter", 0)])
    );

    let store = Store::new(registry, StoreConfig::default());

    store.dispatch(&Action::new("INCREMENT", 1)).unwrap();
    assert_eq!(store.state().to_value(), Value::object([("counter", 1)]));

    let outcome = store.dispatch(&Action::new("UNKNOWN", 1)).unwrap();
    assert_eq!(outcome, Dispatched::Unchanged);
    assert_eq!(store.state().to_value(), Value::object([("counter", 1)]));
}

#[test]
fn missing_payload_is_rejected() {
    let store = Store::new(registry::build(&counter_entities()).unwrap(), StoreConfig::default());

    let err = store.dispatch(&Action::without_payload("INCREMENT")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);

    // A zero payload is rejected the same way.
    let err = store.dispatch(&Action::new("INCREMENT", 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);

    assert_eq!(store.state().get("counter"), Some(&Value::from(0)));
}

#[test]
fn colliding_action_goes_to_last_entity() {
    let entities = Value::object([
        ("first", Entity::new(0).effect("SYNC", add)),
        ("second", Entity::new(0).effect("SYNC", add)),
    ]);
    let store = Store::new(registry::build(&entities).unwrap(), StoreConfig::default());

    store.dispatch(&Action::new("SYNC", 5)).unwrap();

    assert_eq!(store.state().get("first"), Some(&Value::from(0)));
    assert_eq!(store.state().get("second"), Some(&Value::from(5)));

    // Reversing the declaration order flips the owner.
    let reversed = Value::object([
        ("second", Entity::new(0).effect("SYNC", add)),
        ("first", Entity::new(0).effect("SYNC", add)),
    ]);
    let registry = registry::build(&reversed).unwrap();
    assert_eq!(registry.owner_of("SYNC"), Some("first"));
}

#[test]
fn dynamic_declarations_match_typed_ones() {
    let declared = Value::object([(
        "todos",
        Value::object([
            (INITIAL_STATE_FIELD, Value::Array(vec![])),
            (
                EFFECTS_FIELD,
                Value::object([(
                    "ADD_TODO",
                    Value::function(|todos, todo| {
                        let mut items = todos.as_array().unwrap_or_default().to_vec();
                        items.push(todo.clone());
                        Value::Array(items)
                    }),
                )]),
            ),
        ]),
    )]);

    let store = Store::new(registry::build(&declared).unwrap(), StoreConfig::default());
    store
        .dispatch(&Action::new("ADD_TODO", Value::object([("title", "milk")])))
        .unwrap();

    let todos = store.state().get("todos").cloned().unwrap();
    assert_eq!(todos.as_array().unwrap().len(), 1);
}

#[test]
fn malformed_registration_fails_the_same_way_twice() {
    let malformed = Value::object([("counter", Value::object([(INITIAL_STATE_FIELD, 0)]))]);

    let first = registry::build(&malformed).unwrap_err();
    let second = registry::build(&malformed).unwrap_err();

    assert_eq!(first.kind(), ErrorKind::MissingField);
    assert_eq!(first, second);
}

#[test]
fn resolve_touches_only_owner() {
    let registry = Registry::builder()
        .entity("counter", Entity::new(0).effect("INCREMENT", add))
        .entity("label", Entity::new("idle"))
        .build()
        .unwrap();
    let state = registry.initial_global_state();

    let next = dispatch::resolve(&state, &Action::new("INCREMENT", 3), &registry).unwrap();

    assert_eq!(next.get("counter"), Some(&Value::from(3)));
    assert!(next.shares_slice(&state, "label"));
}

#[test]
fn store_subscription() {
    let store = Store::new(registry::build(&counter_entities()).unwrap(), StoreConfig::default());
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let _subscription = store.subscribe(move |_| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(counter.load(Ordering::SeqCst), 0);

    store.dispatch(&Action::new("INCREMENT", 1)).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    store.dispatch(&Action::new("INCREMENT", 1)).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn connected_consumer_round_trip() {
    let registry = Registry::builder()
        .entity("counter", Entity::new(0).effect("INCREMENT", add))
        .entity("theme", Entity::new("dark").effect("SET_THEME", |_, p| p.clone()))
        .build()
        .unwrap();
    let store = Store::new(registry, StoreConfig::default());

    let connection = connect(
        &store,
        Some(selector(|state| {
            Value::object([("count", state.get("counter").cloned().unwrap_or_default())])
        })),
    )
    .unwrap();

    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let _subscription = connection.on_change(move |props| {
        if let Some(projection) = &props.projection {
            seen_clone.lock().push(projection.get("count").clone());
        }
    });

    let props = connection.props().unwrap();
    props.dispatch.dispatch(&Action::new("INCREMENT", 2)).unwrap();
    props.dispatch.dispatch(&Action::new("SET_THEME", "light")).unwrap();
    props.dispatch.dispatch(&Action::new("INCREMENT", 1)).unwrap();

    assert_eq!(*seen.lock(), vec![Value::from(2), Value::from(3)]);
}
