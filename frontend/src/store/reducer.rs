//! Reducer plumbing: the immutable slice table and the functions derived
//! from it.
//!
//! A [`SliceTable`] is never edited in place.  Adding or removing a slice
//! produces a new table, and [`SliceTable::combine`] derives a fresh root
//! reducer from that snapshot.  Old reducers keep pointing at the table they
//! were built from.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::action::{Action, USER_LOGOUT};

/// `(slice state, action) -> next slice state`.  `None` means the slice has
/// no state yet and the reducer must return its initial state.
pub type Reducer = Rc<dyn Fn(Option<&Value>, &Action) -> Value>;

/// Wrap a closure or fn item into a shareable [`Reducer`].
pub fn reducer<F>(f: F) -> Reducer
where
    F: Fn(Option<&Value>, &Action) -> Value + 'static,
{
    Rc::new(f)
}

#[derive(Clone, Default)]
pub struct SliceTable {
    slices: Rc<BTreeMap<String, Reducer>>,
}

impl SliceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// A copy of this table with `name` bound to `reducer`.
    pub fn with(&self, name: &str, reducer: Reducer) -> Self {
        let mut slices = (*self.slices).clone();
        slices.insert(name.to_string(), reducer);
        Self {
            slices: Rc::new(slices),
        }
    }

    /// A copy of this table without `name`.
    pub fn without(&self, name: &str) -> Self {
        let mut slices = (*self.slices).clone();
        slices.remove(name);
        Self {
            slices: Rc::new(slices),
        }
    }

    pub fn combine(&self) -> Reducer {
        combine_reducers(self)
    }
}

impl<S: Into<String>> FromIterator<(S, Reducer)> for SliceTable {
    fn from_iter<I: IntoIterator<Item = (S, Reducer)>>(iter: I) -> Self {
        let slices = iter
            .into_iter()
            .map(|(name, reducer)| (name.into(), reducer))
            .collect();
        Self {
            slices: Rc::new(slices),
        }
    }
}

impl fmt::Debug for SliceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Root reducer over every slice in `table`.
///
/// The next state contains exactly the registered slice names: keys present
/// in the previous state but absent from the table are dropped.
pub fn combine_reducers(table: &SliceTable) -> Reducer {
    let slices = Rc::clone(&table.slices);
    Rc::new(move |state, action| {
        let mut next = Map::new();
        for (name, slice_reducer) in slices.iter() {
            let previous = state.and_then(|s| s.get(name));
            next.insert(name.clone(), slice_reducer(previous, action));
        }
        Value::Object(next)
    })
}

/// Dispatch-time gate in front of the app reducer: `USER_LOGOUT` discards the
/// whole tree so every slice falls back to its initial state.
pub fn root_reducer(app_reducer: Reducer) -> Reducer {
    Rc::new(move |state, action| {
        let state = if action.is(USER_LOGOUT) { None } else { state };
        app_reducer(state, action)
    })
}
