use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::error::{Error, Result};
use crate::store::{Dispatcher, GlobalState, Store, Subscription};
use crate::value::{Kind, Value};

/// Derives a consumer's projection from the global state. The result must be
/// a plain mapping.
pub type Selector = Arc<dyn Fn(&GlobalState) -> Value + Send + Sync>;

/// Wrap a closure as a [`Selector`].
pub fn selector<F>(f: F) -> Selector
where
    F: Fn(&GlobalState) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// What a connected consumer receives: its projection (absent for a
/// dispatch-only binding) and the store's dispatcher.
#[derive(Clone, Debug)]
pub struct Props {
    pub projection: Option<Value>,
    pub dispatch: Dispatcher,
}

/// A consumer's binding to a store.
#[derive(Clone)]
pub struct Connection {
    store: Store,
    selector: Option<Selector>,
    last: Arc<Mutex<Option<Value>>>,
}

/// Bind a consumer to `store`.
///
/// With `None` the consumer only receives the dispatcher. With a selector the
/// initial projection is computed immediately and must be an object.
///
/// # Examples
///
/// ```
/// use slicebox::binding::{connect, selector};
/// use slicebox::{Entity, Registry, Store, StoreConfig, Value};
///
/// let registry = Registry::builder()
///     .entity("counter", Entity::new(3))
///     .build()
///     .unwrap();
/// let store = Store::new(registry, StoreConfig::default());
///
/// let connection = connect(
///     &store,
///     Some(selector(|state| {
///         Value::object([("count", state.get("counter").cloned().unwrap_or_default())])
///     })),
/// )
/// .unwrap();
///
/// let props = connection.props().unwrap();
/// assert_eq!(props.projection.unwrap().get("count"), &Value::from(3));
/// ```
pub fn connect(store: &Store, selector: Option<Selector>) -> Result<Connection> {
    let connection = Connection {
        store: store.clone(),
        selector,
        last: Arc::new(Mutex::new(None)),
    };
    let initial = connection.project(&store.state())?;
    *connection.last.lock() = initial;
    Ok(connection)
}

/// Bind with a dynamically supplied selector: `null` for a dispatch-only
/// binding, or a function called with the global state as an object (the
/// second argument is `undefined`). Any other value is rejected.
pub fn connect_value(store: &Store, value: &Value) -> Result<Connection> {
    match value {
        Value::Null => connect(store, None),
        Value::Function(f) => {
            let f = Arc::clone(f);
            let projector = selector(move |state| f(&state.to_value(), &Value::Undefined));
            connect(store, Some(projector))
        }
        other => Err(Error::InvalidSelector {
            found: other.kind(),
        }),
    }
}

impl Connection {
    fn project(&self, state: &GlobalState) -> Result<Option<Value>> {
        self.selector
            .as_ref()
            .map(|selector| checked_projection(selector(state)))
            .transpose()
    }

    pub fn has_selector(&self) -> bool {
        self.selector.is_some()
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.store.dispatcher()
    }

    /// Props for the current state.
    pub fn props(&self) -> Result<Props> {
        Ok(Props {
            projection: self.project(&self.store.state())?,
            dispatch: self.store.dispatcher(),
        })
    }

    /// Call `callback` whenever the projection changes.
    ///
    /// Commits that leave the projection equal to the last delivered one are
    /// suppressed. A dispatch-only binding has nothing to observe and gets an
    /// inactive subscription. The listener does not keep the store alive.
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Props) + Send + Sync + 'static,
    {
        let Some(selector) = self.selector.clone() else {
            return Subscription::detached();
        };
        let last = Arc::clone(&self.last);
        let store = self.store.dispatcher().downgrade();

        self.store.subscribe(move |state| {
            let Some(dispatch) = store.upgrade() else {
                return;
            };
            let projection = match checked_projection(selector(state)) {
                Ok(projection) => projection,
                Err(err) => {
                    warn!(error = %err, "projection skipped");
                    return;
                }
            };

            {
                let mut last = last.lock();
                if last.as_ref() == Some(&projection) {
                    return;
                }
                *last = Some(projection.clone());
            }

            callback(&Props {
                projection: Some(projection),
                dispatch,
            });
        })
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("has_selector", &self.has_selector())
            .field("last", &*self.last.lock())
            .finish()
    }
}

fn checked_projection(projection: Value) -> Result<Value> {
    if projection.kind() == Kind::Object {
        Ok(projection)
    } else {
        Err(Error::shape("selector result", Kind::Object, projection.kind()))
    }
}
