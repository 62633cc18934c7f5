use serde::{Deserialize, Serialize};

pub const MONTHS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

pub const WEEKDAYS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetentionPoint {
    pub month: String,
    pub current: u32,
    pub last_year: u32,
    pub predicted: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: u32,
    pub projected: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendancePoint {
    pub day: String,
    pub morning: u32,
    pub afternoon: u32,
    pub evening: u32,
}

/// Chart series of the main dashboard, regenerated on every refresh tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    pub retention: Vec<RetentionPoint>,
    pub revenue: Vec<RevenuePoint>,
    pub attendance: Vec<AttendancePoint>,
}

/// Live counters of the activities panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityStats {
    pub active_classes: u32,
    pub total_check_ins: u32,
}

impl Default for ActivityStats {
    fn default() -> Self {
        Self {
            active_classes: 3,
            total_check_ins: 45,
        }
    }
}

/// Headline figures of the gym profile page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileStats {
    pub active_members_today: u32,
    pub monthly_revenue: u32,
    /// Share of equipment in working order, in percent.
    pub equipment_status: u32,
    pub new_check_ins: u32,
    pub satisfaction: u32,
}
