use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::config::desk_config::ms;
use crate::config::Delays;
use crate::domain::settings::{AppearanceChange, AppearanceSettings, StudioSettings};
use crate::services::context::PageContext;
use crate::services::export_service::ExportFormat;
use crate::services::list_page::{defer_completion, BusyFlag};
use crate::services::scheduler::Scheduler;
use crate::services::toast::{Toast, ToastSink, ToastVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceJob {
    Export,
    Backup,
    CleanCache,
    Audit,
}

impl MaintenanceJob {
    fn label(&self) -> &'static str {
        match self {
            MaintenanceJob::Export => "maintenance.export",
            MaintenanceJob::Backup => "maintenance.backup",
            MaintenanceJob::CleanCache => "maintenance.clean_cache",
            MaintenanceJob::Audit => "maintenance.audit",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Database management, essential settings and the appearance editor.
pub struct MaintenanceService {
    toasts: Arc<dyn ToastSink>,
    scheduler: Arc<dyn Scheduler>,
    delays: Delays,
    running: [BusyFlag; 4],
    settings: Mutex<StudioSettings>,
    restore_pending: AtomicBool,
    appearance: Mutex<AppearanceSettings>,
    saving: BusyFlag,
    last_saved: Arc<Mutex<Option<String>>>,
}

impl MaintenanceService {
    pub fn new(ctx: &PageContext) -> Self {
        Self {
            toasts: ctx.toasts.clone(),
            scheduler: ctx.scheduler.clone(),
            delays: ctx.delays,
            running: std::array::from_fn(|_| BusyFlag::new()),
            settings: Mutex::new(StudioSettings::default()),
            restore_pending: AtomicBool::new(false),
            appearance: Mutex::new(AppearanceSettings::default()),
            saving: BusyFlag::new(),
            last_saved: Arc::new(Mutex::new(None)),
        }
    }

    fn start_job(&self, job: MaintenanceJob, delay_ms: u64, started: Toast, finished: Toast) {
        info!(job = job.label(), delay_ms, "Maintenance job started");
        self.toasts.emit(started);
        defer_completion(
            self.scheduler.as_ref(),
            self.toasts.clone(),
            ms(delay_ms),
            job.label(),
            self.running[job.index()].clone(),
            finished,
        );
    }

    pub fn is_running(&self, job: MaintenanceJob) -> bool {
        self.running[job.index()].is_set()
    }

    pub fn export(&self, format: ExportFormat) {
        self.start_job(
            MaintenanceJob::Export,
            self.delays.export_ms,
            Toast::new("Exportação iniciada").with_description(format!("Exportando dados em formato {}...", format)),
            Toast::new("Exportação concluída").with_description("Dados exportados com sucesso."),
        );
    }

    pub fn backup(&self) {
        // The completion time is rendered when the backup is requested.
        let finished_at = chrono::Local::now()
            + chrono::Duration::milliseconds(self.delays.backup_ms as i64);
        self.start_job(
            MaintenanceJob::Backup,
            self.delays.backup_ms,
            Toast::new("Backup iniciado").with_description("Realizando backup dos dados..."),
            Toast::new("Backup concluído")
                .with_description(format!("Backup realizado em {}.", finished_at.format("%H:%M:%S"))),
        );
    }

    pub fn clean_cache(&self) {
        self.start_job(
            MaintenanceJob::CleanCache,
            self.delays.clean_cache_ms,
            Toast::new("Limpeza iniciada").with_description("Removendo dados temporários..."),
            Toast::new("Limpeza concluída").with_description("Cache removido com sucesso."),
        );
    }

    pub fn audit(&self) {
        self.start_job(
            MaintenanceJob::Audit,
            self.delays.audit_ms,
            Toast::new("Auditoria iniciada").with_description("Analisando integridade dos dados..."),
            Toast::new("Auditoria concluída").with_description("Relatório de auditoria gerado com sucesso."),
        );
    }

    pub fn settings(&self) -> StudioSettings {
        self.settings.lock().clone()
    }

    pub fn update_settings(&self, change: impl FnOnce(&mut StudioSettings)) {
        change(&mut self.settings.lock());
    }

    /// First step of "restore defaults": asks for confirmation and changes nothing.
    pub fn request_restore_defaults(&self) {
        self.restore_pending.store(true, Ordering::SeqCst);
        self.toasts.emit(
            Toast::new("Confirmação necessária")
                .with_description("Tem certeza que deseja restaurar todas as configurações para o padrão?")
                .with_variant(ToastVariant::Destructive),
        );
    }

    pub fn restore_pending(&self) -> bool {
        self.restore_pending.load(Ordering::SeqCst)
    }

    /// Returns false when no confirmation was requested.
    pub fn confirm_restore_defaults(&self) -> bool {
        if !self.restore_pending.swap(false, Ordering::SeqCst) {
            return false;
        }
        *self.settings.lock() = StudioSettings::default();
        info!("Studio settings restored to defaults");
        self.toasts.emit(
            Toast::new("Configurações restauradas")
                .with_description("Todas as configurações foram redefinidas para o padrão."),
        );
        true
    }

    pub fn appearance(&self) -> AppearanceSettings {
        self.appearance.lock().clone()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_set()
    }

    pub fn last_saved(&self) -> Option<String> {
        self.last_saved.lock().clone()
    }

    /// Applies the change at once; the "saving" indicator clears after the
    /// autosave delay.
    pub fn change_appearance(&self, change: AppearanceChange) {
        self.appearance.lock().apply(change);
        self.saving.set();

        let saving = self.saving.clone();
        let last_saved = self.last_saved.clone();
        self.scheduler.defer(
            ms(self.delays.autosave_ms),
            "appearance.autosave",
            Box::new(move || {
                saving.clear();
                *last_saved.lock() = Some("agora".to_string());
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::ThemeMode;
    use crate::test_helpers::TestContext;

    fn setup() -> (MaintenanceService, TestContext) {
        let ctx = TestContext::new_for_test();
        let service = MaintenanceService::new(&ctx.page);
        (service, ctx)
    }

    #[test]
    fn test_job_delays() {
        let (service, ctx) = setup();
        service.export(ExportFormat::Csv);
        service.backup();
        service.clean_cache();
        service.audit();
        assert_eq!(
            ctx.take_titles(),
            vec!["Exportação iniciada", "Backup iniciado", "Limpeza iniciada", "Auditoria iniciada"]
        );

        ctx.advance_ms(2000);
        assert_eq!(ctx.take_titles(), vec!["Exportação concluída", "Limpeza concluída"]);
        ctx.advance_ms(1000);
        assert_eq!(ctx.take_titles(), vec!["Backup concluído"]);
        ctx.advance_ms(1000);
        assert_eq!(ctx.take_titles(), vec!["Auditoria concluída"]);
    }

    #[test]
    fn test_restore_requires_confirmation() {
        let (service, ctx) = setup();
        service.update_settings(|s| {
            s.sound_alerts_enabled = true;
            s.backup_frequency_days = 7;
        });

        assert!(!service.confirm_restore_defaults());
        assert!(service.settings().sound_alerts_enabled);

        service.request_restore_defaults();
        assert!(service.restore_pending());
        assert_eq!(service.settings().backup_frequency_days, 7);

        assert!(service.confirm_restore_defaults());
        assert_eq!(service.settings(), StudioSettings::default());
        assert_eq!(ctx.take_titles(), vec!["Confirmação necessária", "Configurações restauradas"]);
    }

    #[test]
    fn test_appearance_autosave() {
        let (service, ctx) = setup();
        service.change_appearance(AppearanceChange::ToggleMode);

        assert_eq!(service.appearance().mode, ThemeMode::Light);
        assert!(service.is_saving());
        assert_eq!(service.last_saved(), None);

        ctx.advance_ms(800);
        assert!(!service.is_saving());
        assert_eq!(service.last_saved().as_deref(), Some("agora"));
    }

    #[test]
    fn test_running_flags() {
        let (service, ctx) = setup();
        service.backup();
        service.audit();

        assert!(service.is_running(MaintenanceJob::Backup));
        assert!(!service.is_running(MaintenanceJob::Export));
        ctx.advance_ms(3000);
        assert!(!service.is_running(MaintenanceJob::Backup));
        assert!(service.is_running(MaintenanceJob::Audit));
        ctx.advance_ms(1000);
        assert!(!service.is_running(MaintenanceJob::Audit));
    }
}
