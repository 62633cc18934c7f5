use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::record::{Record, RecordId};
use crate::repository::{shared, ActionOutcome, DerivedView, ListAction, ListStore, SharedStore};
use crate::services::error_handling::{DeskError, UserErrorFormatter};
use crate::services::scheduler::Scheduler;
use crate::services::toast::{Toast, ToastSink};
use crate::view::{Control, ListSpec};

/// A busy indicator shared with the deferred task that clears it.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One list page: its store, how its view is derived, and where its
/// toasts and timers go.
pub struct ListPage<R: Record> {
    store: SharedStore<R>,
    spec: ListSpec<R>,
    toasts: Arc<dyn ToastSink>,
    scheduler: Arc<dyn Scheduler>,
}

/// Clones share the store, so a deferred task holding a clone sees the
/// page's latest state.
impl<R: Record> Clone for ListPage<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            spec: self.spec.clone(),
            toasts: self.toasts.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<R: Record> ListPage<R> {
    pub fn new(
        store: ListStore<R>,
        spec: ListSpec<R>,
        toasts: Arc<dyn ToastSink>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            store: shared(store),
            spec,
            toasts,
            scheduler,
        }
    }

    pub fn store(&self) -> SharedStore<R> {
        self.store.clone()
    }

    pub fn spec(&self) -> &ListSpec<R> {
        &self.spec
    }

    pub fn view(&self) -> DerivedView<R> {
        self.store.lock().view(&self.spec)
    }

    pub fn get(&self, id: &RecordId) -> Option<R> {
        self.store.lock().get(id).map(|r| R::clone(r))
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn set_control(&self, control: Control) {
        self.store.lock().set_control(control);
    }

    pub fn search(&self, query: &str) {
        self.set_control(Control::Search(query.to_string()));
    }

    pub fn filter(&self, key: &str) {
        self.set_control(Control::Filter(key.to_string()));
    }

    pub fn dispatch(&self, action: ListAction<R>) -> Result<ActionOutcome, DeskError> {
        self.store.lock().apply(action)
    }

    /// Applies `action` and confirms it with `toast`. Rejected input
    /// produces an error toast instead.
    pub fn dispatch_with_toast(&self, action: ListAction<R>, toast: Toast) -> Result<ActionOutcome, DeskError> {
        match self.dispatch(action) {
            Ok(outcome) => {
                self.notify(toast);
                Ok(outcome)
            }
            Err(error) => {
                self.notify(UserErrorFormatter::toast_for(&error));
                Err(error)
            }
        }
    }

    pub fn notify(&self, toast: Toast) {
        self.toasts.emit(toast);
    }

    pub fn toasts(&self) -> Arc<dyn ToastSink> {
        self.toasts.clone()
    }

    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        self.scheduler.clone()
    }

    pub fn defer_toast(&self, delay: Duration, label: &str, toast: Toast) {
        defer_toast(self.scheduler.as_ref(), self.toasts.clone(), delay, label, toast);
    }

    /// Applies `action` once `delay` has elapsed, clearing `busy` and
    /// emitting `then` afterwards.
    pub fn defer_action(
        &self,
        delay: Duration,
        label: &str,
        action: ListAction<R>,
        busy: Option<BusyFlag>,
        then: Option<Toast>,
    ) {
        let store = self.store.clone();
        let toasts = self.toasts.clone();
        let page = self.spec.name();
        self.scheduler.defer(
            delay,
            label,
            Box::new(move || {
                if let Err(error) = store.lock().apply(action) {
                    warn!(page = page, error = %error, "Deferred action rejected");
                }
                if let Some(busy) = busy {
                    busy.clear();
                }
                if let Some(toast) = then {
                    toasts.emit(toast);
                }
            }),
        );
    }
}

/// Emits `toast` after `delay`.
pub fn defer_toast(
    scheduler: &dyn Scheduler,
    toasts: Arc<dyn ToastSink>,
    delay: Duration,
    label: &str,
    toast: Toast,
) {
    scheduler.defer(delay, label, Box::new(move || toasts.emit(toast)));
}

/// Clears `busy` and emits `toast` after `delay`.
pub fn defer_completion(
    scheduler: &dyn Scheduler,
    toasts: Arc<dyn ToastSink>,
    delay: Duration,
    label: &str,
    busy: BusyFlag,
    toast: Toast,
) {
    busy.set();
    scheduler.defer(
        delay,
        label,
        Box::new(move || {
            busy.clear();
            toasts.emit(toast);
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notice::{fields, Notice, NoticeKind};
    use crate::services::scheduler::ManualScheduler;
    use crate::services::toast::ToastQueue;

    fn page() -> (ListPage<Notice>, Arc<ToastQueue>, Arc<ManualScheduler>) {
        let toasts = Arc::new(ToastQueue::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let store = ListStore::new(
            "notices",
            crate::domain::record::collect(vec![
                Notice::new("1", NoticeKind::Info, "BACKUP CONCLUÍDO", "16/05 às 02:00", "16/05", ""),
            ]),
        );
        let page = ListPage::new(store, ListSpec::new("notices"), toasts.clone(), scheduler.clone());
        (page, toasts, scheduler)
    }

    #[test]
    fn test_rejected_input_toasts_error() {
        let (page, toasts, _) = page();
        let result = page.dispatch_with_toast(
            ListAction::ToggleFlag {
                id: RecordId::from("1"),
                field: fields::TITLE.to_string(),
            },
            Toast::new("Notificação lida"),
        );

        assert!(result.is_err());
        assert_eq!(toasts.titles(), vec!["Ação não concluída"]);
    }

    #[test]
    fn test_deferred_action_applies_later() {
        let (page, toasts, scheduler) = page();
        let busy = BusyFlag::new();
        busy.set();

        page.defer_action(
            Duration::from_millis(500),
            "notices.clear",
            ListAction::Clear,
            Some(busy.clone()),
            Some(Toast::new("Notificações limpas")),
        );

        assert_eq!(page.len(), 1);
        assert!(busy.is_set());

        scheduler.advance_ms(500);
        assert!(page.is_empty());
        assert!(!busy.is_set());
        assert_eq!(toasts.titles(), vec!["Notificações limpas"]);
    }
}
