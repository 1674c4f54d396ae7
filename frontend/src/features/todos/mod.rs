//! The Todos feature: a keyed todo list loaded from a static JSON file.

pub mod components;
pub mod entry;
pub mod logic;
pub mod models;
pub mod selectors;
pub mod slice;

pub use entry::TodosEntry;
pub use models::{Todo, TodoId, TodosState};

/// Name the slice is registered under in the store.
pub const REDUCER_NAME: &str = crate::constants::TODOS_REDUCER_NAME;
