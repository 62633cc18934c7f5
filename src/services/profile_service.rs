use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::desk_config::ms;
use crate::config::Delays;
use crate::domain::metrics::ProfileStats;
use crate::services::context::PageContext;
use crate::services::mock_data::MockDataProvider;
use crate::services::scheduler::{LiveLoop, Scheduler};
use crate::services::toast::{Toast, ToastSink};

/// Odds that a status check finds the gym online.
pub const ONLINE_CHANCE: f64 = 0.9;

struct Board {
    stats: Mutex<ProfileStats>,
    updated_at: Mutex<Duration>,
    online: AtomicBool,
}

impl Board {
    fn redraw(&self, mock: &dyn MockDataProvider, now: Duration) {
        let stats = mock.profile_stats();
        *self.stats.lock() = stats;
        *self.updated_at.lock() = now;
        debug!(members = stats.active_members_today, revenue = stats.monthly_revenue, "Profile stats redrawn");
    }
}

/// The gym profile page: headline figures and a simulated connection status.
pub struct ProfileService {
    board: Arc<Board>,
    toasts: Arc<dyn ToastSink>,
    mock: Arc<dyn MockDataProvider>,
    scheduler: Arc<dyn Scheduler>,
    delays: Delays,
    stats_loop: LiveLoop,
    status_loop: LiveLoop,
}

impl ProfileService {
    pub fn new(ctx: &PageContext) -> Self {
        Self {
            board: Arc::new(Board {
                stats: Mutex::new(ctx.mock.profile_stats()),
                updated_at: Mutex::new(ctx.scheduler.now()),
                online: AtomicBool::new(true),
            }),
            toasts: ctx.toasts.clone(),
            mock: ctx.mock.clone(),
            scheduler: ctx.scheduler.clone(),
            delays: ctx.delays,
            stats_loop: LiveLoop::new(),
            status_loop: LiveLoop::new(),
        }
    }

    pub fn stats(&self) -> ProfileStats {
        *self.board.stats.lock()
    }

    /// Scheduler time of the last redraw.
    pub fn last_update(&self) -> Duration {
        *self.board.updated_at.lock()
    }

    pub fn is_online(&self) -> bool {
        self.board.online.load(Ordering::SeqCst)
    }

    /// Starts both the stats redraw and the status check. Returns true when
    /// at least one of them was started by this call.
    pub fn start_live_updates(&self) -> bool {
        let board = self.board.clone();
        let mock = self.mock.clone();
        let scheduler = self.scheduler.clone();
        let stats = self.stats_loop.start(
            self.scheduler.clone(),
            ms(self.delays.profile_stats_ms),
            "profile.stats",
            Arc::new(move || board.redraw(mock.as_ref(), scheduler.now())),
        );

        let board = self.board.clone();
        let mock = self.mock.clone();
        let status = self.status_loop.start(
            self.scheduler.clone(),
            ms(self.delays.profile_status_ms),
            "profile.status",
            Arc::new(move || {
                let online = mock.chance(ONLINE_CHANCE);
                if board.online.swap(online, Ordering::SeqCst) != online {
                    info!(online, "Gym connection status changed");
                }
            }),
        );
        stats || status
    }

    pub fn stop_live_updates(&self) {
        self.stats_loop.stop();
        self.status_loop.stop();
    }

    /// Redraws every figure now and confirms it.
    pub fn sync_all(&self) {
        self.board.redraw(self.mock.as_ref(), self.scheduler.now());
        self.toasts.emit(
            Toast::new("Sincronização Completa").with_description("Todos os dados foram atualizados"),
        );
    }

    pub fn quick_action(&self, action: &str) -> Toast {
        info!(action, "Profile quick action");
        let toast = Toast::new("Ação Executada").with_description(format!("{} realizada com sucesso", action));
        self.toasts.emit(toast.clone());
        toast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TestContext;

    #[test]
    fn test_stats_redraw_on_interval() {
        let ctx = TestContext::new_for_test();
        let profile = ProfileService::new(&ctx.page);
        assert!(profile.is_online());
        assert!(profile.start_live_updates());
        assert!(!profile.start_live_updates());

        ctx.advance_ms(14_999);
        assert_eq!(profile.last_update(), Duration::ZERO);
        ctx.advance_ms(1);
        assert_eq!(profile.last_update(), Duration::from_millis(15_000));

        let stats = profile.stats();
        assert!((70..100).contains(&stats.active_members_today));
        assert!((80..100).contains(&stats.satisfaction));
        assert_eq!(ctx.scheduler.pending_labels(), vec!["profile.status", "profile.stats"]);
    }

    #[test]
    fn test_stop_ends_both_loops() {
        let ctx = TestContext::new_for_test();
        let profile = ProfileService::new(&ctx.page);
        profile.start_live_updates();
        ctx.advance_ms(30_000);
        let updated = profile.last_update();

        profile.stop_live_updates();
        ctx.advance_ms(60_000);

        assert_eq!(profile.last_update(), updated);
        assert_eq!(ctx.scheduler.pending(), 0);
    }

    #[test]
    fn test_zero_intervals_stay_off() {
        let ctx = TestContext::with_delays(Delays::immediate());
        let profile = ProfileService::new(&ctx.page);

        assert!(!profile.start_live_updates());
        assert_eq!(ctx.scheduler.run_until_idle(), 0);
    }

    #[test]
    fn test_sync_all_redraws_and_confirms() {
        let ctx = TestContext::new_for_test();
        let profile = ProfileService::new(&ctx.page);
        ctx.advance_ms(2_000);

        profile.sync_all();

        assert_eq!(profile.last_update(), Duration::from_millis(2_000));
        let toasts = ctx.toasts.drain();
        assert_eq!(toasts[0].title, "Sincronização Completa");
        assert_eq!(toasts[0].description.as_deref(), Some("Todos os dados foram atualizados"));
    }

    #[test]
    fn test_quick_action_names_the_action() {
        let ctx = TestContext::new_for_test();
        let profile = ProfileService::new(&ctx.page);

        let toast = profile.quick_action("Novo Membro");
        assert_eq!(toast.title, "Ação Executada");
        assert_eq!(toast.description.as_deref(), Some("Novo Membro realizada com sucesso"));
        assert_eq!(ctx.toasts.len(), 1);
    }
}
