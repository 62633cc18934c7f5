use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::desk_config::ms;
use crate::domain::metrics::ActivityStats;
use crate::services::context::PageContext;
use crate::services::mock_data::MockDataProvider;
use crate::services::scheduler::{LiveLoop, Scheduler};
use crate::services::toast::{Toast, ToastSink, ToastVariant};

const ACTIVITY_MESSAGES: [(&str, &str); 6] = [
    ("iniciar-aula", "Aula iniciada com sucesso!"),
    ("encerrar-tudo", "Todas as atividades foram encerradas!"),
    ("emergencia", "Protocolo de emergência ativado!"),
    ("exportar-dados", "Dados exportados com sucesso!"),
    ("historico", "Histórico carregado!"),
    ("nova-atividade", "Nova atividade criada!"),
];

pub const EMERGENCY: &str = "emergencia";

/// Resolves the toast title of an activities-panel action.
pub fn activity_title(action: &str) -> String {
    ACTIVITY_MESSAGES
        .iter()
        .find(|(key, _)| *key == action)
        .map(|(_, message)| message.to_string())
        .unwrap_or_else(|| format!("{} executado!", action))
}

/// Resolves the toast title of a programs-page action. Some messages name
/// the program the action was triggered from.
pub fn program_title(action: &str, program: Option<&str>) -> String {
    let program = program.unwrap_or_default();
    match action {
        "create" => "Novo programa criado com sucesso!".to_string(),
        "manage" => format!("Abrindo dashboard de {}", program),
        "preview" => format!("Pré-visualizando {}", program),
        "sync" => "Sincronizando com calendários externos...".to_string(),
        "analytics" => "Carregando analytics avançados...".to_string(),
        "communicate" => "Central de comunicação aberta".to_string(),
        _ => "Ação executada!".to_string(),
    }
}

/// The one-shot action buttons of the activities and programs pages, and
/// the live class and check-in counters of the activities panel.
pub struct QuickActions {
    toasts: Arc<dyn ToastSink>,
    stats: Arc<Mutex<ActivityStats>>,
    mock: Arc<dyn MockDataProvider>,
    scheduler: Arc<dyn Scheduler>,
    live: LiveLoop,
    interval_ms: u64,
}

impl QuickActions {
    pub fn new(ctx: &PageContext) -> Self {
        Self {
            toasts: ctx.toasts.clone(),
            stats: Arc::new(Mutex::new(ActivityStats::default())),
            mock: ctx.mock.clone(),
            scheduler: ctx.scheduler.clone(),
            live: LiveLoop::new(),
            interval_ms: ctx.delays.activity_stats_ms,
        }
    }

    pub fn stats(&self) -> ActivityStats {
        *self.stats.lock()
    }

    /// Steps the counters once per interval: classes move by one at most
    /// and never drop below one, check-ins only grow.
    pub fn start_live_stats(&self) -> bool {
        let stats = self.stats.clone();
        let mock = self.mock.clone();
        self.live.start(
            self.scheduler.clone(),
            ms(self.interval_ms),
            "activities.stats",
            Arc::new(move || {
                let mut stats = stats.lock();
                *stats = mock.activity_stats(*stats);
                debug!(classes = stats.active_classes, check_ins = stats.total_check_ins, "Activity counters stepped");
            }),
        )
    }

    pub fn stop_live_stats(&self) {
        self.live.stop();
    }

    pub fn activity(&self, action: &str) -> Toast {
        info!(action, "Activity quick action");
        let variant = if action == EMERGENCY {
            ToastVariant::Destructive
        } else {
            ToastVariant::Success
        };
        let toast = Toast::new(activity_title(action))
            .with_description(format!("Ação \"{}\" realizada com sucesso.", action))
            .with_variant(variant);
        self.toasts.emit(toast.clone());
        toast
    }

    pub fn program(&self, action: &str, program: Option<&str>) -> Toast {
        info!(action, program, "Program quick action");
        let toast = Toast::new(program_title(action, program));
        self.toasts.emit(toast.clone());
        toast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TestContext;
    use rstest::rstest;

    #[rstest]
    #[case("iniciar-aula", "Aula iniciada com sucesso!")]
    #[case("historico", "Histórico carregado!")]
    #[case("pausar", "pausar executado!")]
    fn test_activity_titles(#[case] action: &str, #[case] expected: &str) {
        assert_eq!(activity_title(action), expected);
    }

    #[test]
    fn test_emergency_is_destructive() {
        let ctx = TestContext::new_for_test();
        let actions = QuickActions::new(&ctx.page);

        let toast = actions.activity(EMERGENCY);
        assert_eq!(toast.variant, ToastVariant::Destructive);
        assert_eq!(toast.description.as_deref(), Some("Ação \"emergencia\" realizada com sucesso."));

        assert_eq!(actions.activity("nova-atividade").variant, ToastVariant::Success);
        assert_eq!(ctx.toasts.len(), 2);
    }

    #[test]
    fn test_live_stats_step_each_interval() {
        let ctx = TestContext::new_for_test();
        let actions = QuickActions::new(&ctx.page);
        assert_eq!(actions.stats(), ActivityStats { active_classes: 3, total_check_ins: 45 });

        assert!(actions.start_live_stats());
        let mut previous = actions.stats();
        for _ in 0..8 {
            ctx.advance_ms(15_000);
            let stats = actions.stats();
            assert!(stats.active_classes >= 1);
            assert!(stats.active_classes.abs_diff(previous.active_classes) <= 1);
            assert!((previous.total_check_ins..=previous.total_check_ins + 1).contains(&stats.total_check_ins));
            previous = stats;
        }

        actions.stop_live_stats();
        ctx.advance_ms(60_000);
        assert_eq!(actions.stats(), previous);
        assert!(ctx.toasts.is_empty());
    }

    #[test]
    fn test_program_titles() {
        let ctx = TestContext::new_for_test();
        let actions = QuickActions::new(&ctx.page);

        actions.program("manage", Some("HIIT Revolucionário"));
        actions.program("settings", None);
        assert_eq!(
            ctx.take_titles(),
            vec!["Abrindo dashboard de HIIT Revolucionário", "Ação executada!"]
        );
    }
}
