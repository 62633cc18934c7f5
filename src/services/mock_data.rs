//! Random figures the pages show in place of real analytics.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::domain::churn::ForecastPoint;
use crate::domain::integration::EquipmentLoad;
use crate::domain::ledger::{Category, EntryStatus, LedgerEntry};
use crate::domain::metrics::{
    ActivityStats, AttendancePoint, DashboardMetrics, ProfileStats, RetentionPoint, RevenuePoint, MONTHS,
    WEEKDAYS,
};
use crate::domain::payment::PaymentSnapshot;
use crate::services::seed;

/// Bounds a drifting equipment load stays within, in percent.
pub const EQUIPMENT_LOAD_RANGE: (f64, f64) = (10.0, 95.0);

/// Largest step a load moves per drift, either way.
pub const EQUIPMENT_DRIFT: f64 = 5.0;

pub trait MockDataProvider: Send + Sync {
    fn payment_snapshot(&self) -> PaymentSnapshot;

    fn dashboard_metrics(&self) -> DashboardMetrics;

    fn churn_forecast(&self) -> Vec<ForecastPoint>;

    /// A transaction without an id; the ledger store mints one on insert.
    fn random_transaction(&self) -> LedgerEntry;

    /// Fresh whole-percent draw in 10..=99 for every load.
    fn equipment_loads(&self, current: &[EquipmentLoad]) -> Vec<EquipmentLoad>;

    /// Nudges every load by at most [`EQUIPMENT_DRIFT`], kept inside [`EQUIPMENT_LOAD_RANGE`].
    fn drift_equipment(&self, current: &[EquipmentLoad]) -> Vec<EquipmentLoad>;

    fn activity_stats(&self, current: ActivityStats) -> ActivityStats;

    fn profile_stats(&self) -> ProfileStats;

    /// True with the given probability.
    fn chance(&self, probability: f64) -> bool;
}

pub struct RandomMockProvider {
    rng: Mutex<StdRng>,
}

impl RandomMockProvider {
    /// Seeded providers repeat the same sequence of draws.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

fn is_low_season(month: &str) -> bool {
    month == "Jun" || month == "Jul"
}

fn is_weekend(day: &str) -> bool {
    day == "Sáb" || day == "Dom"
}

impl MockDataProvider for RandomMockProvider {
    fn payment_snapshot(&self) -> PaymentSnapshot {
        let mut rng = self.rng.lock();
        PaymentSnapshot {
            total_received: rng.gen_range(25_000..30_000),
            total_pending: rng.gen_range(3_000..5_000),
            canceled_count: rng.gen_range(2..5),
            next_week_prediction: rng.gen_range(8_000..9_000),
            success_rate: rng.gen_range(90..100),
        }
    }

    fn dashboard_metrics(&self) -> DashboardMetrics {
        let mut rng = self.rng.lock();

        let retention = MONTHS
            .iter()
            .map(|month| {
                let current = rng.gen_range(70..=85);
                let predicted = if is_low_season(month) {
                    current - rng.gen_range(0..=15)
                } else {
                    current + rng.gen_range(0..=5)
                };
                RetentionPoint {
                    month: month.to_string(),
                    current,
                    last_year: rng.gen_range(60..=75),
                    predicted,
                }
            })
            .collect();

        let revenue = MONTHS
            .iter()
            .map(|month| {
                let revenue = rng.gen_range(20_000..=30_000);
                let projected = if is_low_season(month) {
                    revenue - rng.gen_range(0..=8_000)
                } else {
                    revenue + rng.gen_range(0..=2_000)
                };
                RevenuePoint {
                    month: month.to_string(),
                    revenue,
                    projected,
                }
            })
            .collect();

        let attendance = WEEKDAYS
            .iter()
            .map(|day| AttendancePoint {
                day: day.to_string(),
                morning: rng.gen_range(20..=50),
                afternoon: rng.gen_range(15..=40),
                evening: if is_weekend(day) {
                    rng.gen_range(5..=20)
                } else {
                    rng.gen_range(30..=70)
                },
            })
            .collect();

        debug!("Dashboard metrics regenerated");
        DashboardMetrics {
            retention,
            revenue,
            attendance,
        }
    }

    fn churn_forecast(&self) -> Vec<ForecastPoint> {
        seed::churn_forecast()
    }

    fn random_transaction(&self) -> LedgerEntry {
        let mut rng = self.rng.lock();
        let status = if rng.gen_bool(0.5) {
            EntryStatus::Paid
        } else {
            EntryStatus::Pending
        };
        let category = if rng.gen_bool(0.5) {
            Category::Income
        } else {
            Category::Expense
        };

        LedgerEntry {
            description: format!("Transação {}", rng.gen_range(0..1000)),
            amount: rng.gen_range(100..600) as f64,
            status,
            category,
            ..LedgerEntry::default()
        }
    }

    fn equipment_loads(&self, current: &[EquipmentLoad]) -> Vec<EquipmentLoad> {
        let mut rng = self.rng.lock();
        current
            .iter()
            .map(|load| EquipmentLoad::new(&load.name, rng.gen_range(10..100) as f64))
            .collect()
    }

    fn drift_equipment(&self, current: &[EquipmentLoad]) -> Vec<EquipmentLoad> {
        let (low, high) = EQUIPMENT_LOAD_RANGE;
        let mut rng = self.rng.lock();
        current
            .iter()
            .map(|load| {
                let step = rng.gen_range(-EQUIPMENT_DRIFT..EQUIPMENT_DRIFT);
                EquipmentLoad::new(&load.name, (load.usage + step).clamp(low, high))
            })
            .collect()
    }

    fn activity_stats(&self, current: ActivityStats) -> ActivityStats {
        let mut rng = self.rng.lock();
        let classes = current.active_classes as i64 + rng.gen_range(-1..=1);
        ActivityStats {
            active_classes: classes.max(1) as u32,
            total_check_ins: current.total_check_ins + rng.gen_range(0..=1),
        }
    }

    fn profile_stats(&self) -> ProfileStats {
        let mut rng = self.rng.lock();
        ProfileStats {
            active_members_today: rng.gen_range(70..100),
            monthly_revenue: rng.gen_range(35_000..45_000),
            equipment_status: rng.gen_range(90..100),
            new_check_ins: rng.gen_range(12..17),
            satisfaction: rng.gen_range(80..100),
        }
    }

    fn chance(&self, probability: f64) -> bool {
        self.rng.lock().gen_bool(probability.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_ranges() {
        let provider = RandomMockProvider::seeded(42);
        for _ in 0..50 {
            let snapshot = provider.payment_snapshot();
            assert!((25_000..30_000).contains(&snapshot.total_received));
            assert!((3_000..5_000).contains(&snapshot.total_pending));
            assert!((2..5).contains(&snapshot.canceled_count));
            assert!((8_000..9_000).contains(&snapshot.next_week_prediction));
            assert!((90..100).contains(&snapshot.success_rate));
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let a = RandomMockProvider::seeded(7);
        let b = RandomMockProvider::seeded(7);
        assert_eq!(a.payment_snapshot(), b.payment_snapshot());
        assert_eq!(a.random_transaction().description, b.random_transaction().description);
    }

    #[test]
    fn test_low_season_prediction_never_exceeds_current() {
        let metrics = RandomMockProvider::seeded(3).dashboard_metrics();
        assert_eq!(metrics.retention.len(), 12);
        assert_eq!(metrics.attendance.len(), 7);

        for point in metrics.retention.iter().filter(|p| is_low_season(&p.month)) {
            assert!(point.predicted <= point.current);
        }
        for point in metrics.attendance.iter().filter(|p| is_weekend(&p.day)) {
            assert!(point.evening <= 20);
        }
    }

    #[test]
    fn test_equipment_redraw_covers_whole_range() {
        let provider = RandomMockProvider::seeded(11);
        let mut seen_above_drift_bound = false;
        for _ in 0..200 {
            let loads = provider.equipment_loads(&seed::equipment_loads());
            assert_eq!(loads.len(), 3);
            assert_eq!(loads[0].name, "Esteiras");
            assert!(loads.iter().all(|l| (10.0..=99.0).contains(&l.usage) && l.usage.fract() == 0.0));
            seen_above_drift_bound |= loads.iter().any(|l| l.usage > 95.0);
        }
        assert!(seen_above_drift_bound);
    }

    #[test]
    fn test_equipment_drift_is_small_and_bounded() {
        let provider = RandomMockProvider::seeded(5);
        let mut loads = vec![EquipmentLoad::new("Halteres", 10.0), EquipmentLoad::new("Bicicletas", 95.0)];
        for _ in 0..100 {
            let next = provider.drift_equipment(&loads);
            for (before, after) in loads.iter().zip(&next) {
                assert_eq!(before.name, after.name);
                assert!((after.usage - before.usage).abs() <= EQUIPMENT_DRIFT);
                assert!((10.0..=95.0).contains(&after.usage));
            }
            loads = next;
        }
    }

    #[test]
    fn test_activity_stats_step() {
        let provider = RandomMockProvider::seeded(9);
        let mut stats = ActivityStats {
            active_classes: 1,
            total_check_ins: 45,
        };
        for _ in 0..100 {
            let next = provider.activity_stats(stats);
            assert!(next.active_classes >= 1);
            assert!(next.active_classes <= stats.active_classes + 1);
            assert!(next.total_check_ins - stats.total_check_ins <= 1);
            stats = next;
        }
    }

    #[test]
    fn test_profile_stats_ranges() {
        let provider = RandomMockProvider::seeded(13);
        for _ in 0..50 {
            let stats = provider.profile_stats();
            assert!((70..100).contains(&stats.active_members_today));
            assert!((35_000..45_000).contains(&stats.monthly_revenue));
            assert!((90..100).contains(&stats.equipment_status));
            assert!((12..17).contains(&stats.new_check_ins));
            assert!((80..100).contains(&stats.satisfaction));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let provider = RandomMockProvider::seeded(2);
        assert!((0..20).all(|_| provider.chance(1.0)));
        assert!((0..20).all(|_| !provider.chance(0.0)));
    }

    #[test]
    fn test_random_transaction_has_no_id() {
        let entry = RandomMockProvider::seeded(1).random_transaction();
        assert!(entry.id.as_str().is_empty());
        assert!((100.0..600.0).contains(&entry.amount));
        assert!(entry.description.starts_with("Transação "));
    }
}
