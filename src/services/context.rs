use std::sync::Arc;

use crate::config::{Delays, DeskConfig, LedgerConfig};
use crate::services::mock_data::{MockDataProvider, RandomMockProvider};
use crate::services::scheduler::Scheduler;
use crate::services::toast::ToastSink;

/// Collaborators every page service is built from.
#[derive(Clone)]
pub struct PageContext {
    pub toasts: Arc<dyn ToastSink>,
    pub scheduler: Arc<dyn Scheduler>,
    pub mock: Arc<dyn MockDataProvider>,
    pub delays: Delays,
    pub ledger: LedgerConfig,
}

impl PageContext {
    pub fn new(
        toasts: Arc<dyn ToastSink>,
        scheduler: Arc<dyn Scheduler>,
        mock: Arc<dyn MockDataProvider>,
        delays: Delays,
    ) -> Self {
        Self {
            toasts,
            scheduler,
            mock,
            delays,
            ledger: LedgerConfig::default(),
        }
    }

    pub fn with_ledger(mut self, ledger: LedgerConfig) -> Self {
        self.ledger = ledger;
        self
    }

    /// Delays and the mock seed come from `config`.
    pub fn from_config(
        config: &DeskConfig,
        toasts: Arc<dyn ToastSink>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self::new(
            toasts,
            scheduler,
            Arc::new(RandomMockProvider::new(config.mock.seed)),
            config.delays,
        )
        .with_ledger(config.ledger.clone())
    }
}
