//! Binding consumers to a store.
//!
//! A [`Connection`] projects global state through a [`Selector`] and hands
//! the consumer a [`Dispatcher`](crate::Dispatcher). Rendering and scheduling
//! are left to the presentation layer.

mod connect;

pub use connect::{connect, connect_value, selector, Connection, Props, Selector};
