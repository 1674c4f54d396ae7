//! Dynamic Redux-style store.
//!
//! * [`action`]   – `{ type, payload }` actions and creators
//! * [`reducer`]  – immutable slice table, combining and the logout gate
//! * [`engine`]   – the store itself (dispatch / subscribe / replace reducer)
//! * [`registry`] – name → reducer registration against a live store
//! * [`devtools`] – inspection hook for non-release builds

pub mod action;
pub mod engine;
pub mod devtools;
pub mod reducer;
pub mod registry;

pub use action::{user_logout, Action, ActionCreator, USER_LOGOUT};
pub use engine::{Listener, Store, StoreError, SubscriptionId};
pub use reducer::{reducer, Reducer, SliceTable};
pub use registry::{DynamicReducer, ReducerRegistry, StoreOptions};
