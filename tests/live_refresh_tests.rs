use mockall::mock;
use mockall::predicate::eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fitdesk::config::Delays;
use fitdesk::domain::churn::ForecastPoint;
use fitdesk::domain::integration::EquipmentLoad;
use fitdesk::domain::ledger::{Category, EntryStatus, LedgerEntry};
use fitdesk::domain::metrics::{ActivityStats, DashboardMetrics, ProfileStats};
use fitdesk::domain::payment::PaymentSnapshot;
use fitdesk::services::billing_service::LIVE_UPDATE_CHANCE;
use fitdesk::services::profile_service::ONLINE_CHANCE;
use fitdesk::services::{BillingService, ManualScheduler, MockDataProvider, PageContext, ProfileService, ToastQueue};

mock! {
    pub Feed {}

    impl MockDataProvider for Feed {
        fn payment_snapshot(&self) -> PaymentSnapshot;
        fn dashboard_metrics(&self) -> DashboardMetrics;
        fn churn_forecast(&self) -> Vec<ForecastPoint>;
        fn random_transaction(&self) -> LedgerEntry;
        fn equipment_loads(&self, current: &[EquipmentLoad]) -> Vec<EquipmentLoad>;
        fn drift_equipment(&self, current: &[EquipmentLoad]) -> Vec<EquipmentLoad>;
        fn activity_stats(&self, current: ActivityStats) -> ActivityStats;
        fn profile_stats(&self) -> ProfileStats;
        fn chance(&self, probability: f64) -> bool;
    }
}

fn context(feed: MockFeed) -> (PageContext, Arc<ToastQueue>, Arc<ManualScheduler>) {
    let toasts = Arc::new(ToastQueue::new());
    let scheduler = Arc::new(ManualScheduler::new());
    let ctx = PageContext::new(toasts.clone(), scheduler.clone(), Arc::new(feed), Delays::default());
    (ctx, toasts, scheduler)
}

fn drawn_transaction() -> LedgerEntry {
    LedgerEntry {
        description: "Transação 512".to_string(),
        amount: 320.0,
        status: EntryStatus::Paid,
        category: Category::Expense,
        ..LedgerEntry::default()
    }
}

fn profile_stats(members: u32) -> ProfileStats {
    ProfileStats {
        active_members_today: members,
        monthly_revenue: 40_000,
        equipment_status: 95,
        new_check_ins: 14,
        satisfaction: 90,
    }
}

#[test]
fn test_live_ledger_pulls_only_on_winning_draws() {
    let draws = Arc::new(AtomicUsize::new(0));
    let counter = draws.clone();
    let mut feed = MockFeed::new();
    feed.expect_chance()
        .with(eq(LIVE_UPDATE_CHANCE))
        .returning(move |_| counter.fetch_add(1, Ordering::SeqCst) % 3 == 1);
    feed.expect_random_transaction().times(2).returning(drawn_transaction);

    let (ctx, toasts, scheduler) = context(feed);
    let billing = BillingService::new(&ctx).unwrap();
    assert!(billing.start_live_updates());
    assert!(!billing.start_live_updates());

    scheduler.advance_ms(5_000);
    assert_eq!(billing.summary().expense_count, 3);
    assert!(!billing.is_updating());

    scheduler.advance_ms(5_000);
    assert!(billing.is_updating());
    scheduler.advance_ms(1_000);
    assert!(!billing.is_updating());
    assert_eq!(billing.summary().expense_count, 4);

    scheduler.advance_ms(4_000);
    scheduler.advance_ms(10_000);
    billing.stop_live_updates();
    scheduler.run_until_idle();

    assert_eq!(draws.load(Ordering::SeqCst), 5);
    assert_eq!(billing.summary().expense_count, 5);
    assert!(toasts.is_empty());
}

#[test]
fn test_profile_status_follows_draws() {
    let mut feed = MockFeed::new();
    feed.expect_profile_stats().returning(|| profile_stats(80));
    let mut online = [false, true].into_iter().cycle();
    feed.expect_chance()
        .with(eq(ONLINE_CHANCE))
        .returning(move |_| online.next().unwrap_or(true));

    let (ctx, _toasts, scheduler) = context(feed);
    let profile = ProfileService::new(&ctx);
    profile.start_live_updates();

    scheduler.advance_ms(30_000);
    assert!(!profile.is_online());
    scheduler.advance_ms(30_000);
    assert!(profile.is_online());
    assert_eq!(profile.stats(), profile_stats(80));
}
