use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::desk_config::ms;
use crate::config::Delays;
use crate::domain::churn::{fields, AtRiskStudent, ForecastPoint};
use crate::domain::record::RecordId;
use crate::repository::{DerivedView, ListStore};
use crate::services::context::PageContext;
use crate::services::error_handling::DeskError;
use crate::services::list_page::{defer_completion, BusyFlag, ListPage};
use crate::services::mock_data::MockDataProvider;
use crate::services::seed;
use crate::services::toast::Toast;
use crate::view::{ListSpec, SortDirection, SortKind, ViewControls};

pub const PERIODS: [&str; 3] = ["7d", "30d", "90d"];
pub const DEFAULT_PERIOD: &str = "7d";

pub fn at_risk_spec() -> ListSpec<AtRiskStudent> {
    ListSpec::new("churn")
        .search_in(&[fields::NAME, fields::REASON])
        .filter_by_field(fields::PATTERN)
        .sort_column(fields::RISK, SortKind::Numeric)
        .sort_column(fields::NAME, SortKind::Text)
}

/// Predicted churn: students at risk and the cancellation forecast.
pub struct ChurnService {
    students: ListPage<AtRiskStudent>,
    mock: Arc<dyn MockDataProvider>,
    delays: Delays,
    period: Mutex<String>,
    expanded: Mutex<Option<RecordId>>,
    refreshing: BusyFlag,
}

impl ChurnService {
    pub fn new(ctx: &PageContext) -> Result<Self, DeskError> {
        let store = ListStore::try_from_seed("churn", &seed::at_risk_students)?
            .with_controls(ViewControls::default().sorted_by(fields::RISK, SortDirection::Desc));

        Ok(Self {
            students: ListPage::new(store, at_risk_spec(), ctx.toasts.clone(), ctx.scheduler.clone()),
            mock: ctx.mock.clone(),
            delays: ctx.delays,
            period: Mutex::new(DEFAULT_PERIOD.to_string()),
            expanded: Mutex::new(None),
            refreshing: BusyFlag::new(),
        })
    }

    /// Highest risk first.
    pub fn at_risk(&self) -> DerivedView<AtRiskStudent> {
        self.students.view()
    }

    pub fn forecast(&self) -> Vec<ForecastPoint> {
        self.mock.churn_forecast()
    }

    pub fn period(&self) -> String {
        self.period.lock().clone()
    }

    pub fn change_period(&self, period: &str) {
        *self.period.lock() = period.to_string();
        self.students
            .notify(Toast::new(format!("Período alterado para: {}", period)));
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_set()
    }

    pub fn refresh(&self) {
        info!(period = %self.period(), "Refreshing churn predictions");
        self.students.notify(
            Toast::new("Atualizando previsões").with_description("Recalculando análises de risco..."),
        );
        defer_completion(
            self.students.scheduler().as_ref(),
            self.students.toasts(),
            ms(self.delays.churn_refresh_ms),
            "churn.refresh",
            self.refreshing.clone(),
            Toast::new("Previsões atualizadas").with_description("Dados de risco atualizados com sucesso"),
        );
    }

    fn student(&self, id: &RecordId) -> Option<AtRiskStudent> {
        let student = self.students.get(id);
        if student.is_none() {
            debug!(%id, "Student not in the forecast list, action skipped");
        }
        student
    }

    /// Returns false when `id` is not in the list; nothing is sent then.
    pub fn send_message(&self, id: &RecordId) -> bool {
        let Some(student) = self.student(id) else {
            return false;
        };
        self.students.notify(
            Toast::new("Mensagem enviada")
                .with_description(format!("Uma mensagem personalizada foi enviada para {}.", student.name)),
        );
        true
    }

    pub fn offer_discount(&self, id: &RecordId) -> bool {
        let Some(student) = self.student(id) else {
            return false;
        };
        self.students.notify(
            Toast::new("Desconto oferecido")
                .with_description(format!("Um desconto promocional foi oferecido para {}.", student.name)),
        );
        true
    }

    /// Expands the row of `id`, or collapses it when it is already open.
    pub fn toggle_details(&self, id: &RecordId) -> Option<RecordId> {
        let mut expanded = self.expanded.lock();
        *expanded = match expanded.take() {
            Some(open) if &open == id => None,
            _ => Some(id.clone()),
        };
        expanded.clone()
    }

    pub fn expanded(&self) -> Option<RecordId> {
        self.expanded.lock().clone()
    }

    pub fn detect_patterns(&self) {
        self.students.notify(
            Toast::new("Padrões Detectados").with_description("Analisando padrões de comportamento..."),
        );
    }

    pub fn adjust_sensitivity(&self) {
        self.students.notify(
            Toast::new("Ajustar Sensibilidade").with_description("Configure os parâmetros da IA de previsão"),
        );
    }

    pub fn export_report(&self) {
        self.students.notify(
            Toast::new("Exportar Relatório").with_description("Seu relatório está sendo preparado para download"),
        );
        self.students.defer_toast(
            ms(self.delays.churn_export_ms),
            "churn.export",
            Toast::new("Relatório Pronto").with_description("Relatório de Previsão de Evasão.pdf"),
        );
    }
}
