use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Delays;
use crate::config::desk_config::ms;
use crate::domain::ledger::{fields, LedgerEntry, LedgerSummary};
use crate::domain::record::RecordId;
use crate::repository::{ActionOutcome, DerivedView, ListAction, ListStore};
use crate::services::context::PageContext;
use crate::services::error_handling::DeskError;
use crate::services::list_page::{defer_completion, BusyFlag, ListPage};
use crate::services::mock_data::MockDataProvider;
use crate::services::scheduler::LiveLoop;
use crate::services::seed;
use crate::services::toast::{Toast, ToastVariant};
use crate::view::{Control, ListSpec, SortKind, ViewControls};

pub const PERIODS: [&str; 3] = ["semanal", "mensal", "anual"];
pub const DEFAULT_PERIOD: &str = "mensal";

/// Odds that a live tick pulls a new transaction.
pub const LIVE_UPDATE_CHANCE: f64 = 0.3;

pub fn ledger_spec() -> ListSpec<LedgerEntry> {
    ListSpec::new("ledger")
        .search_in(&[fields::DESCRIPTION, fields::AMOUNT, fields::DATE, fields::STATUS])
        .filter_by_field(fields::CATEGORY)
        .sort_column(fields::AMOUNT, SortKind::Numeric)
        .sort_column(fields::DATE, SortKind::Date)
        .sort_column(fields::DESCRIPTION, SortKind::Text)
        .sort_column(fields::STATUS, SortKind::Text)
        .sort_column(fields::CATEGORY, SortKind::Text)
}

/// The billing spreadsheet.
pub struct BillingService {
    ledger: ListPage<LedgerEntry>,
    mock: Arc<dyn MockDataProvider>,
    delays: Delays,
    generating_report: BusyFlag,
    updating: BusyFlag,
    live: LiveLoop,
}

impl BillingService {
    pub fn new(ctx: &PageContext) -> Result<Self, DeskError> {
        let controls = ViewControls::default()
            .sorted_by(&ctx.ledger.sort_column, ctx.ledger.sort_direction);
        let mut store = ListStore::try_from_seed("ledger", &seed::ledger_entries)?.with_controls(controls);
        store.set_control(Control::Tab(DEFAULT_PERIOD.to_string()));

        Ok(Self {
            ledger: ListPage::new(store, ledger_spec(), ctx.toasts.clone(), ctx.scheduler.clone()),
            mock: ctx.mock.clone(),
            delays: ctx.delays,
            generating_report: BusyFlag::new(),
            updating: BusyFlag::new(),
            live: LiveLoop::new(),
        })
    }

    pub fn entries(&self) -> DerivedView<LedgerEntry> {
        self.ledger.view()
    }

    pub fn controls(&self) -> ViewControls {
        self.ledger.store().lock().controls().clone()
    }

    pub fn search(&self, query: &str) {
        self.ledger.search(query);
    }

    /// `"receita"`, `"despesa"` or `"all"`.
    pub fn filter_category(&self, category: &str) {
        self.ledger.filter(category);
    }

    pub fn select_period(&self, period: &str) {
        self.ledger.set_control(Control::Tab(period.to_string()));
    }

    /// Column header click.
    pub fn handle_sort(&self, column: &str) {
        if let Err(error) = self.ledger.dispatch(ListAction::ToggleSort(column.to_string())) {
            warn!(error = %error, "Sort toggle rejected");
        }
    }

    /// Totals over every entry, regardless of search and filter.
    pub fn summary(&self) -> LedgerSummary {
        let store = self.ledger.store();
        let store = store.lock();
        LedgerSummary::from_entries(store.collection().iter().map(|e| e.as_ref()))
    }

    pub fn new_transaction(&self) -> Result<RecordId, DeskError> {
        let outcome = self.ledger.dispatch_with_toast(
            ListAction::Add(LedgerEntry::default()),
            Toast::new("Nova transação").with_description("Transação adicionada à planilha."),
        )?;
        match outcome {
            ActionOutcome::Added(id) => Ok(id),
            other => Err(DeskError::InvalidRecord {
                reason: format!("add produced {:?}", other),
            }),
        }
    }

    pub fn delete_entry(&self, id: &RecordId) -> Result<ActionOutcome, DeskError> {
        self.ledger.dispatch_with_toast(
            ListAction::Remove(id.clone()),
            Toast::new("Transação removida"),
        )
    }

    pub fn is_generating_report(&self) -> bool {
        self.generating_report.is_set()
    }

    pub fn is_updating(&self) -> bool {
        self.updating.is_set()
    }

    pub fn generate_report(&self) {
        info!("Generating billing report");
        defer_completion(
            self.ledger.scheduler().as_ref(),
            self.ledger.toasts(),
            ms(self.delays.report_ms),
            "ledger.report",
            self.generating_report.clone(),
            Toast::new("Relatório gerado com sucesso!").with_variant(ToastVariant::Success),
        );
    }

    /// Pulls one new transaction from the mock feed after a delay.
    pub fn update_data(&self) {
        pull_transaction(&self.ledger, self.mock.as_ref(), &self.updating, self.delays.ledger_update_ms);
    }

    /// Every live interval, pulls a transaction with probability
    /// [`LIVE_UPDATE_CHANCE`]. Returns false when already running or the
    /// interval is zero.
    pub fn start_live_updates(&self) -> bool {
        let ledger = self.ledger.clone();
        let mock = self.mock.clone();
        let updating = self.updating.clone();
        let delay_ms = self.delays.ledger_update_ms;
        self.live.start(
            self.ledger.scheduler(),
            ms(self.delays.ledger_live_ms),
            "ledger.live",
            Arc::new(move || {
                if mock.chance(LIVE_UPDATE_CHANCE) {
                    pull_transaction(&ledger, mock.as_ref(), &updating, delay_ms);
                }
            }),
        )
    }

    pub fn stop_live_updates(&self) {
        self.live.stop();
    }
}

fn pull_transaction(
    ledger: &ListPage<LedgerEntry>,
    mock: &dyn MockDataProvider,
    updating: &BusyFlag,
    delay_ms: u64,
) {
    info!("Updating billing data");
    updating.set();
    ledger.defer_action(
        ms(delay_ms),
        "ledger.update",
        ListAction::Add(mock.random_transaction()),
        Some(updating.clone()),
        None,
    );
}
