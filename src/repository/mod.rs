pub mod id_allocator;
pub mod list_store;
pub mod mutations;

use parking_lot::Mutex;
use std::sync::Arc;

use crate::domain::record::Record;

pub use list_store::{ActionOutcome, DerivedView, ListAction, ListStore, ViewSummary};

/// A page store reachable from deferred tasks. Every page gets its own.
pub type SharedStore<R> = Arc<Mutex<ListStore<R>>>;

pub fn shared<R: Record>(store: ListStore<R>) -> SharedStore<R> {
    Arc::new(Mutex::new(store))
}
