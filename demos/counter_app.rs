//! Complete counter application demonstrating all features together

use slicebox::binding::{connect, selector};
use slicebox::{Action, Entity, Registry, Store, StoreConfig, Value};
use tracing_subscriber::EnvFilter;

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

fn counter() -> Entity {
    Entity::new(0)
        .effect("INCREMENT", |count, step| Value::from(number(count) + number(step)))
        .effect("DECREMENT", |count, step| Value::from(number(count) - number(step)))
        .effect("RESET", |_, _| Value::from(0))
}

fn step() -> Entity {
    Entity::new(1).effect("SET_STEP", |_, step| step.clone())
}

fn history() -> Entity {
    Entity::new(Value::Array(vec![Value::from(0)])).effect("RECORD", |history, count| {
        let mut entries = history.as_array().unwrap_or_default().to_vec();
        entries.push(count.clone());
        Value::Array(entries)
    })
}

fn main() -> slicebox::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Complete Counter Application ===\n");

    println!("1. Registering entities");
    let registry = Registry::builder()
        .entity("counter", counter())
        .entity("step", step())
        .entity("history", history())
        .build()?;
    println!(
        "   Entities: {:?}",
        registry.entity_names().collect::<Vec<_>>()
    );

    println!("\n2. Creating the store (transition logging on)");
    let store = Store::new(registry, StoreConfig::default());

    println!("\n3. Connecting a view to the counter");
    let view = connect(
        &store,
        Some(selector(|state| {
            let count = state.get("counter").map(number).unwrap_or(0.0);
            Value::object([
                ("count", Value::from(count)),
                ("positive", Value::from(count > 0.0)),
                ("even", Value::from(count % 2.0 == 0.0)),
                ("abs", Value::from(count.abs())),
            ])
        })),
    )?;

    let _render = view.on_change(|props| {
        if let Some(projection) = &props.projection {
            println!("   [View] {projection}");
        }
    });

    let dispatch = view.props()?.dispatch;
    let increment = |dispatch: &slicebox::Dispatcher, name: &str| -> slicebox::Result<()> {
        let step = store.state().get("step").cloned().unwrap_or_default();
        dispatch.dispatch(&Action::new(name, step))?;
        let count = store.state().get("counter").cloned().unwrap_or_default();
        // A zero count is a falsy payload and would be rejected.
        if count.is_truthy() {
            dispatch.dispatch(&Action::new("RECORD", count))?;
        }
        Ok(())
    };

    println!("\n4. Incrementing...");
    for _ in 0..3 {
        increment(&dispatch, "INCREMENT")?;
    }

    println!("\n5. Changing step size to 5");
    dispatch.dispatch(&Action::new("SET_STEP", 5))?;

    println!("\n6. Incrementing with new step...");
    increment(&dispatch, "INCREMENT")?;

    println!("\n7. Decrementing...");
    for _ in 0..3 {
        increment(&dispatch, "DECREMENT")?;
    }

    println!("\n8. Dispatching an unknown action (ignored)");
    dispatch.dispatch(&Action::new("UNKNOWN", 1))?;

    println!("\n9. History:");
    store.read(|state| {
        println!("   {}", state.get("history").cloned().unwrap_or_default());
    });

    println!("\n10. Resetting...");
    dispatch.dispatch(&Action::new("RESET", true))?;

    println!("\n11. Final state:");
    println!("   {}", store.state());

    println!("\n✓ Counter application complete!");
    Ok(())
}
