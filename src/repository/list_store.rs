use std::sync::Arc;

use crate::domain::record::{Collection, FieldValue, Record, RecordId};
use crate::services::error_handling::{DeskError, LogHelper};
use crate::services::seed::SeedProvider;
use crate::view::{derive_view, Control, ListSpec, ViewControls};

use super::id_allocator::IdAllocator;
use super::mutations;

/// A discrete change to a page's local state.
#[derive(Debug, Clone)]
pub enum ListAction<R> {
    SetCollection(Collection<R>),
    SetControl(Control),
    ToggleSort(String),
    ToggleFlag { id: RecordId, field: String },
    Remove(RecordId),
    Add(R),
    UpdateField { id: RecordId, field: String, value: FieldValue },
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Added(RecordId),
    /// The action targeted an id that is not in the collection.
    NoOp,
}

/// Rows of a derived view plus the size of the collection they came from.
#[derive(Debug, Clone)]
pub struct DerivedView<R> {
    pub rows: Collection<R>,
    pub total: usize,
}

impl<R: Record> DerivedView<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the page should render its "nothing found" state.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.rows.iter().map(|r| r.id().clone()).collect()
    }

    pub fn records(&self) -> Vec<R> {
        self.rows.iter().map(|r| R::clone(r)).collect()
    }

    pub fn summary(&self) -> ViewSummary {
        ViewSummary {
            total: self.total,
            visible: self.rows.len(),
        }
    }
}

/// Counts behind the "showing N of M" line and the empty state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSummary {
    pub total: usize,
    pub visible: usize,
}

impl ViewSummary {
    pub fn nothing_found(&self) -> bool {
        self.visible == 0
    }
}

/// Canonical in-memory state of one page: the collection and its controls.
#[derive(Debug, Clone)]
pub struct ListStore<R: Record> {
    page: &'static str,
    collection: Collection<R>,
    controls: ViewControls,
    ids: IdAllocator,
}

impl<R: Record> ListStore<R> {
    pub fn new(page: &'static str, collection: Collection<R>) -> Self {
        let ids = IdAllocator::for_collection(&collection);
        Self {
            page,
            collection,
            controls: ViewControls::default(),
            ids,
        }
    }

    /// Builds the store from seed data, rejecting duplicate or empty ids.
    pub fn try_from_seed(page: &'static str, seed: &dyn SeedProvider<R>) -> Result<Self, DeskError> {
        let collection: Collection<R> = seed.seed().into_iter().map(Arc::new).collect();
        mutations::validate_unique_ids(&collection)?;
        Ok(Self::new(page, collection))
    }

    pub fn with_controls(mut self, controls: ViewControls) -> Self {
        self.controls = controls;
        self
    }

    pub fn page(&self) -> &'static str {
        self.page
    }

    pub fn collection(&self) -> &[Arc<R>] {
        &self.collection
    }

    pub fn get(&self, id: &RecordId) -> Option<&Arc<R>> {
        self.collection.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn controls(&self) -> &ViewControls {
        &self.controls
    }

    /// Wholesale replacement; callers own validation.
    pub fn set_collection(&mut self, collection: Collection<R>) {
        self.ids.observe(&collection);
        self.collection = collection;
    }

    pub fn set_control(&mut self, control: Control) {
        self.controls.set(control);
    }

    pub fn view(&self, spec: &ListSpec<R>) -> DerivedView<R> {
        DerivedView {
            rows: derive_view(&self.collection, spec, &self.controls),
            total: self.collection.len(),
        }
    }

    pub fn apply(&mut self, action: ListAction<R>) -> Result<ActionOutcome, DeskError> {
        match action {
            ListAction::SetCollection(collection) => {
                self.set_collection(collection);
                Ok(ActionOutcome::Applied)
            }
            ListAction::SetControl(control) => {
                self.set_control(control);
                Ok(ActionOutcome::Applied)
            }
            ListAction::ToggleSort(column) => {
                self.controls.toggle_sort(&column);
                Ok(ActionOutcome::Applied)
            }
            ListAction::ToggleFlag { id, field } => {
                let present = self.contains(&id);
                let next = self.guard(mutations::toggle_flag(&self.collection, &id, &field))?;
                self.commit("toggle_flag", &id, present, next)
            }
            ListAction::Remove(id) => {
                let present = self.contains(&id);
                let next = mutations::remove(&self.collection, &id);
                self.commit("remove", &id, present, next)
            }
            ListAction::Add(defaults) => {
                let (next, id) = mutations::add(&self.collection, defaults, &mut self.ids);
                LogHelper::log_record_operation(self.page, "add", id.as_str(), true);
                self.collection = next;
                Ok(ActionOutcome::Added(id))
            }
            ListAction::UpdateField { id, field, value } => {
                let present = self.contains(&id);
                let next = self.guard(mutations::update_field(&self.collection, &id, &field, value))?;
                self.commit("update_field", &id, present, next)
            }
            ListAction::Clear => {
                self.collection.clear();
                Ok(ActionOutcome::Applied)
            }
        }
    }

    fn guard<T>(&self, result: Result<T, DeskError>) -> Result<T, DeskError> {
        result.inspect_err(|error| LogHelper::log_rejected_input(self.page, error))
    }

    fn commit(
        &mut self,
        operation: &str,
        id: &RecordId,
        present: bool,
        next: Collection<R>,
    ) -> Result<ActionOutcome, DeskError> {
        LogHelper::log_record_operation(self.page, operation, id.as_str(), present);
        self.collection = next;
        Ok(if present {
            ActionOutcome::Applied
        } else {
            ActionOutcome::NoOp
        })
    }
}
