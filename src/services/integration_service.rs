use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::desk_config::ms;
use crate::config::Delays;
use crate::domain::integration::{fields, ApiIntegration, EquipmentLoad};
use crate::domain::record::{FieldValue, RecordId};
use crate::repository::{ActionOutcome, DerivedView, ListAction, ListStore};
use crate::services::context::PageContext;
use crate::services::error_handling::DeskError;
use crate::services::list_page::{BusyFlag, ListPage};
use crate::services::mock_data::MockDataProvider;
use crate::services::scheduler::LiveLoop;
use crate::services::seed;
use crate::services::toast::{Toast, ToastVariant};
use crate::view::{ListSpec, SortKind};

pub const AVAILABLE_SYSTEMS: &str = "MyFitnessPal, Apple Health, Strava, Fitbit";

pub fn integration_spec() -> ListSpec<ApiIntegration> {
    ListSpec::new("integrations")
        .search_in(&[fields::NAME, fields::DESCRIPTION])
        .filter_by_field(fields::STATUS)
        .sort_column(fields::NAME, SortKind::Text)
        .sort_column(fields::PROGRESS, SortKind::Numeric)
}

/// API integrations and the live equipment panel.
pub struct IntegrationService {
    integrations: ListPage<ApiIntegration>,
    equipment: Arc<Mutex<Vec<EquipmentLoad>>>,
    mock: Arc<dyn MockDataProvider>,
    delays: Delays,
    refreshing: BusyFlag,
    drift: LiveLoop,
    auto_charge: AtomicBool,
    technical_details: AtomicBool,
}

impl IntegrationService {
    pub fn new(ctx: &PageContext) -> Result<Self, DeskError> {
        let store = ListStore::try_from_seed("integrations", &seed::api_integrations)?;
        Ok(Self {
            integrations: ListPage::new(store, integration_spec(), ctx.toasts.clone(), ctx.scheduler.clone()),
            equipment: Arc::new(Mutex::new(seed::equipment_loads())),
            mock: ctx.mock.clone(),
            delays: ctx.delays,
            refreshing: BusyFlag::new(),
            drift: LiveLoop::new(),
            auto_charge: AtomicBool::new(true),
            technical_details: AtomicBool::new(false),
        })
    }

    pub fn integrations(&self) -> DerivedView<ApiIntegration> {
        self.integrations.view()
    }

    pub fn integration(&self, id: &str) -> Option<ApiIntegration> {
        self.integrations.get(&RecordId::new(id))
    }

    pub fn equipment(&self) -> Vec<EquipmentLoad> {
        self.equipment.lock().clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_set()
    }

    /// Marks the integration fully synced after the sync delay. An id that
    /// is not listed still runs the start and completion toasts; the update
    /// itself lands as a no-op.
    pub fn force_sync(&self, id: &str) {
        let id = RecordId::new(id);
        if self.integrations.get(&id).is_none() {
            debug!(integration = %id, "Integration not listed, sync touches no row");
        }

        info!(integration = %id, "Forcing integration sync");
        self.refreshing.set();
        self.integrations.notify(Toast::new("Iniciando sincronização forçada..."));

        let store = self.integrations.store();
        let toasts = self.integrations.toasts();
        let refreshing = self.refreshing.clone();
        self.integrations.scheduler().defer(
            ms(self.delays.integration_sync_ms),
            "integrations.force_sync",
            Box::new(move || {
                let updates = [
                    (fields::PROGRESS, FieldValue::number(100.0)),
                    (fields::LAST_SYNC, FieldValue::text("agora")),
                ];
                let mut guard = store.lock();
                for (field, value) in updates {
                    let action = ListAction::UpdateField {
                        id: id.clone(),
                        field: field.to_string(),
                        value,
                    };
                    match guard.apply(action) {
                        Ok(ActionOutcome::NoOp) => debug!(integration = %id, field, "Sync update skipped"),
                        Ok(_) => {}
                        Err(error) => warn!(integration = %id, error = %error, "Sync update rejected"),
                    }
                }
                drop(guard);
                refreshing.clear();
                toasts.emit(Toast::new("Sincronização concluída com sucesso").with_variant(ToastVariant::Success));
            }),
        );
    }

    /// Redraws every equipment load after the refresh delay.
    pub fn refresh_equipment(&self) {
        self.refreshing.set();
        let equipment = self.equipment.clone();
        let mock = self.mock.clone();
        let refreshing = self.refreshing.clone();
        self.integrations.scheduler().defer(
            ms(self.delays.equipment_refresh_ms),
            "integrations.equipment",
            Box::new(move || {
                let mut loads = equipment.lock();
                *loads = mock.equipment_loads(&loads);
                refreshing.clear();
            }),
        );
    }

    /// Starts the live panel: every load drifts a few points each interval.
    /// Returns false when it already runs or the interval is zero.
    pub fn start_equipment_drift(&self) -> bool {
        let equipment = self.equipment.clone();
        let mock = self.mock.clone();
        self.drift.start(
            self.integrations.scheduler(),
            ms(self.delays.equipment_drift_ms),
            "integrations.drift",
            Arc::new(move || {
                let mut loads = equipment.lock();
                *loads = mock.drift_equipment(&loads);
            }),
        )
    }

    pub fn stop_equipment_drift(&self) {
        self.drift.stop();
    }

    pub fn open_calendar(&self) {
        self.integrations
            .notify(Toast::new("Abrindo Integração").with_description("Conectando com Google Calendar..."));
    }

    pub fn connect_new_system(&self) {
        self.integrations
            .notify(Toast::new("Sistemas Disponíveis").with_description(AVAILABLE_SYSTEMS));
    }

    pub fn diagnostic(&self) {
        self.integrations.notify(
            Toast::new("Diagnóstico Executado").with_description("Todas as APIs estão funcionando corretamente ✓"),
        );
    }

    pub fn open_priority_settings(&self) {
        self.integrations.notify(Toast::new("Configurações prioritárias abertas"));
    }

    pub fn set_auto_charge(&self, enabled: bool) {
        self.auto_charge.store(enabled, Ordering::SeqCst);
    }

    pub fn auto_charge(&self) -> bool {
        self.auto_charge.load(Ordering::SeqCst)
    }

    pub fn toggle_technical_details(&self) -> bool {
        !self.technical_details.fetch_xor(true, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TestContext;

    fn setup() -> (IntegrationService, TestContext) {
        let ctx = TestContext::new_for_test();
        let service = IntegrationService::new(&ctx.page).unwrap();
        (service, ctx)
    }

    #[test]
    fn test_force_sync_completes_after_delay() {
        let (service, ctx) = setup();
        service.force_sync("members");

        assert_eq!(service.integration("members").unwrap().progress, 98);
        assert!(service.is_refreshing());

        ctx.advance_ms(2000);
        let members = service.integration("members").unwrap();
        assert_eq!(members.progress, 100);
        assert_eq!(members.last_sync, "agora");
        assert!(!service.is_refreshing());
        assert_eq!(
            ctx.take_titles(),
            vec!["Iniciando sincronização forçada...", "Sincronização concluída com sucesso"]
        );
    }

    #[test]
    fn test_force_sync_leaves_others_alone() {
        let (service, ctx) = setup();
        service.force_sync("members");
        ctx.advance_ms(2000);

        assert_eq!(service.integration("schedule").unwrap().last_sync, "2 min atrás");
    }

    #[test]
    fn test_force_sync_missing_integration_still_completes() {
        let (service, ctx) = setup();
        let before = service.integrations().rows;

        service.force_sync("crm");
        assert!(service.is_refreshing());
        ctx.advance_ms(2000);

        assert!(!service.is_refreshing());
        assert_eq!(service.integrations().rows, before);
        assert!(service.integration("crm").is_none());
        assert_eq!(
            ctx.take_titles(),
            vec!["Iniciando sincronização forçada...", "Sincronização concluída com sucesso"]
        );
    }

    #[test]
    fn test_refresh_equipment() {
        let (service, ctx) = setup();
        service.refresh_equipment();
        assert_eq!(service.equipment()[0].usage, 70.0);

        ctx.advance_ms(1000);
        let loads = service.equipment();
        assert_eq!(loads.len(), 3);
        assert!(loads.iter().all(|l| (10.0..=99.0).contains(&l.usage)));
        assert!(!service.is_refreshing());
    }

    #[test]
    fn test_equipment_drift_runs_until_stopped() {
        let (service, ctx) = setup();
        assert!(service.start_equipment_drift());
        assert!(!service.start_equipment_drift());

        ctx.advance_ms(2999);
        assert_eq!(service.equipment()[0].usage, 70.0);

        let mut previous = service.equipment();
        for _ in 0..5 {
            ctx.advance_ms(3000);
            let loads = service.equipment();
            for (before, after) in previous.iter().zip(&loads) {
                assert!((after.usage - before.usage).abs() <= 5.0);
                assert!((10.0..=95.0).contains(&after.usage));
            }
            previous = loads;
        }

        service.stop_equipment_drift();
        ctx.advance_ms(9000);
        assert_eq!(service.equipment(), previous);
        assert_eq!(ctx.scheduler.pending(), 0);
    }

    #[test]
    fn test_calendar_and_priority_toasts() {
        let (service, ctx) = setup();
        service.open_calendar();
        service.open_priority_settings();

        let toasts = ctx.toasts.drain();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].title, "Abrindo Integração");
        assert_eq!(toasts[0].description.as_deref(), Some("Conectando com Google Calendar..."));
        assert_eq!(toasts[1].title, "Configurações prioritárias abertas");
        assert_eq!(toasts[1].description, None);
    }

    #[test]
    fn test_toggles() {
        let (service, _ctx) = setup();
        assert!(service.auto_charge());
        service.set_auto_charge(false);
        assert!(!service.auto_charge());

        assert!(service.toggle_technical_details());
        assert!(!service.toggle_technical_details());
    }

    #[test]
    fn test_connect_new_system() {
        let (service, ctx) = setup();
        service.connect_new_system();
        let toasts = ctx.toasts.drain();
        assert_eq!(toasts[0].description.as_deref(), Some(AVAILABLE_SYSTEMS));
    }
}
