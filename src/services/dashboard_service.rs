use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::config::desk_config::ms;
use crate::domain::metrics::DashboardMetrics;
use crate::services::context::PageContext;
use crate::services::mock_data::MockDataProvider;
use crate::services::scheduler::{LiveLoop, Scheduler};

struct Series {
    metrics: Mutex<DashboardMetrics>,
    ticks: AtomicU64,
}

impl Series {
    fn redraw(&self, mock: &dyn MockDataProvider) {
        *self.metrics.lock() = mock.dashboard_metrics();
        let ticks = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticks, "Dashboard metrics redrawn");
    }
}

/// Chart series of the main dashboard. While live updates run, every series
/// is redrawn once per refresh interval.
pub struct DashboardService {
    series: Arc<Series>,
    mock: Arc<dyn MockDataProvider>,
    scheduler: Arc<dyn Scheduler>,
    live: LiveLoop,
    interval_ms: u64,
}

impl DashboardService {
    pub fn new(ctx: &PageContext) -> Self {
        Self {
            series: Arc::new(Series {
                metrics: Mutex::new(ctx.mock.dashboard_metrics()),
                ticks: AtomicU64::new(0),
            }),
            mock: ctx.mock.clone(),
            scheduler: ctx.scheduler.clone(),
            live: LiveLoop::new(),
            interval_ms: ctx.delays.dashboard_refresh_ms,
        }
    }

    pub fn metrics(&self) -> DashboardMetrics {
        self.series.metrics.lock().clone()
    }

    /// Number of refreshes applied since the page was built.
    pub fn ticks(&self) -> u64 {
        self.series.ticks.load(Ordering::SeqCst)
    }

    pub fn is_live(&self) -> bool {
        self.live.is_live()
    }

    /// Redraws every series now.
    pub fn refresh(&self) {
        self.series.redraw(self.mock.as_ref());
    }

    /// Returns false when updates were already running or the interval is zero.
    pub fn start_live_updates(&self) -> bool {
        let series = self.series.clone();
        let mock = self.mock.clone();
        self.live.start(
            self.scheduler.clone(),
            ms(self.interval_ms),
            "dashboard.refresh",
            Arc::new(move || series.redraw(mock.as_ref())),
        )
    }

    pub fn stop_live_updates(&self) {
        self.live.stop();
    }
}
