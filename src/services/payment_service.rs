use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::desk_config::ms;
use crate::domain::payment::{fields, Payment, PaymentSnapshot, PaymentStatus};
use crate::domain::record::RecordId;
use crate::repository::{DerivedView, ListStore};
use crate::services::context::PageContext;
use crate::services::error_handling::DeskError;
use crate::services::list_page::ListPage;
use crate::services::mock_data::MockDataProvider;
use crate::services::scheduler::LiveLoop;
use crate::services::seed;
use crate::services::toast::Toast;
use crate::view::{Control, ListSpec, SortDirection, SortKind};

pub fn payment_spec() -> ListSpec<Payment> {
    ListSpec::new("payments")
        .search_in(&[fields::NAME])
        .filter_by_field(fields::STATUS)
        .sort_column(fields::AMOUNT, SortKind::Numeric)
        .sort_column(fields::DUE_DATE, SortKind::Date)
        .sort_column(fields::NAME, SortKind::Text)
}

struct SnapshotCard {
    snapshot: Mutex<PaymentSnapshot>,
    /// Scheduler time of the last redraw.
    updated_at: Mutex<Duration>,
}

impl SnapshotCard {
    fn redraw(&self, mock: &dyn MockDataProvider, now: Duration) -> PaymentSnapshot {
        let next = mock.payment_snapshot();
        *self.snapshot.lock() = next;
        *self.updated_at.lock() = now;
        info!(
            received = next.total_received,
            pending = next.total_pending,
            "Payment snapshot refreshed"
        );
        next
    }
}

pub struct PaymentService {
    payments: ListPage<Payment>,
    mock: Arc<dyn MockDataProvider>,
    card: Arc<SnapshotCard>,
    live: LiveLoop,
    interval_ms: u64,
}

impl PaymentService {
    pub fn new(ctx: &PageContext) -> Result<Self, DeskError> {
        let store = ListStore::try_from_seed("payments", &seed::payments)?;
        Ok(Self {
            payments: ListPage::new(store, payment_spec(), ctx.toasts.clone(), ctx.scheduler.clone()),
            card: Arc::new(SnapshotCard {
                snapshot: Mutex::new(ctx.mock.payment_snapshot()),
                updated_at: Mutex::new(ctx.scheduler.now()),
            }),
            mock: ctx.mock.clone(),
            live: LiveLoop::new(),
            interval_ms: ctx.delays.payment_snapshot_ms,
        })
    }

    pub fn payments(&self) -> DerivedView<Payment> {
        self.payments.view()
    }

    pub fn search(&self, query: &str) {
        self.payments.search(query);
    }

    /// `"all"` shows every payment; otherwise one of paid, pending or overdue.
    pub fn filter_status(&self, status: &str) {
        self.payments.filter(status);
    }

    pub fn sort_by(&self, column: &str, direction: SortDirection) {
        self.payments.set_control(Control::SortColumn(column.to_string()));
        self.payments.set_control(Control::SortDirection(direction));
    }

    pub fn snapshot(&self) -> PaymentSnapshot {
        *self.card.snapshot.lock()
    }

    pub fn last_update(&self) -> Duration {
        *self.card.updated_at.lock()
    }

    /// Redraws the real-time figures shown in the header cards.
    pub fn refresh_snapshot(&self) -> PaymentSnapshot {
        self.card.redraw(self.mock.as_ref(), self.payments.scheduler().now())
    }

    /// Redraws the header cards once per snapshot interval until stopped.
    pub fn start_live_snapshot(&self) -> bool {
        let card = self.card.clone();
        let mock = self.mock.clone();
        let scheduler = self.payments.scheduler();
        self.live.start(
            self.payments.scheduler(),
            ms(self.interval_ms),
            "payments.snapshot",
            Arc::new(move || {
                card.redraw(mock.as_ref(), scheduler.now());
            }),
        )
    }

    pub fn stop_live_snapshot(&self) {
        self.live.stop();
    }

    pub fn is_live(&self) -> bool {
        self.live.is_live()
    }

    /// Buttons on a payment row (or on the page when `payment_id` is `None`).
    pub fn quick_action(&self, action: &str, payment_id: Option<&RecordId>) {
        let description = match payment_id {
            Some(id) => format!("{} para pagamento #{} realizada com sucesso", action, id),
            None => format!("{} realizada com sucesso", action),
        };
        self.payments
            .notify(Toast::new("Ação Executada").with_description(description));
    }

    pub fn count_by_status(&self, status: PaymentStatus) -> usize {
        self.payments
            .store()
            .lock()
            .collection()
            .iter()
            .filter(|p| p.status == status)
            .count()
    }
}
