// Test helpers for integration testing

use std::sync::Arc;

use crate::config::Delays;
use crate::services::context::PageContext;
use crate::services::mock_data::RandomMockProvider;
use crate::services::scheduler::ManualScheduler;
use crate::services::toast::ToastQueue;

pub const TEST_SEED: u64 = 42;

pub struct TestContext {
    pub toasts: Arc<ToastQueue>,
    pub scheduler: Arc<ManualScheduler>,
    pub page: PageContext,
}

impl TestContext {
    /// Virtual clock, in-memory toasts, seeded mock data and the default delays.
    pub fn new_for_test() -> Self {
        Self::with_delays(Delays::default())
    }

    pub fn with_delays(delays: Delays) -> Self {
        let toasts = Arc::new(ToastQueue::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let page = PageContext::new(
            toasts.clone(),
            scheduler.clone(),
            Arc::new(RandomMockProvider::seeded(TEST_SEED)),
            delays,
        );
        Self {
            toasts,
            scheduler,
            page,
        }
    }

    /// Titles emitted since the last call, oldest first.
    pub fn take_titles(&self) -> Vec<String> {
        self.toasts.drain().into_iter().map(|t| t.title).collect()
    }

    pub fn advance_ms(&self, millis: u64) -> usize {
        self.scheduler.advance_ms(millis)
    }
}
