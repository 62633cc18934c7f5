use tracing::info;

use crate::domain::class_session::{fields, Achievement, ClassSession};
use crate::domain::record::RecordId;
use crate::repository::{ActionOutcome, DerivedView, ListAction, ListStore};
use crate::services::context::PageContext;
use crate::services::error_handling::DeskError;
use crate::services::list_page::ListPage;
use crate::services::seed;
use crate::services::toast::Toast;
use crate::view::{Control, ListSpec, SortKind};

pub const DEFAULT_DATE_TAB: &str = "hoje";

pub const DATE_TABS: [(&str, &str); 6] = [
    ("Hoje", "hoje"),
    ("Seg 12", "seg12"),
    ("Ter 13", "ter13"),
    ("Qua 14", "qua14"),
    ("Qui 15", "qui15"),
    ("Sex 16", "sex16"),
];

/// Counters shown in the header of the saved-classes page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassStats {
    pub completed: usize,
    pub total: usize,
    pub unlocked_achievements: usize,
    /// Unlocked share of all achievements, rounded to a whole percent.
    pub achievement_percent: u32,
}

pub fn class_spec() -> ListSpec<ClassSession> {
    ListSpec::new("classes")
        .search_in(&[fields::NAME, fields::INSTRUCTOR, fields::KIND])
        .sort_column(fields::TIME, SortKind::Text)
        .sort_column(fields::NAME, SortKind::Text)
        .sort_column(fields::INSTRUCTOR, SortKind::Text)
}

pub fn achievement_spec() -> ListSpec<Achievement> {
    ListSpec::new("achievements")
        .search_in(&["titulo"])
        .sort_column("progresso", SortKind::Numeric)
}

pub struct ClassService {
    classes: ListPage<ClassSession>,
    achievements: ListPage<Achievement>,
}

impl ClassService {
    pub fn new(ctx: &PageContext) -> Result<Self, DeskError> {
        let classes = ListStore::try_from_seed("classes", &seed::class_sessions)?;
        let achievements = ListStore::try_from_seed("achievements", &seed::achievements)?;

        let service = Self {
            classes: ListPage::new(classes, class_spec(), ctx.toasts.clone(), ctx.scheduler.clone()),
            achievements: ListPage::new(
                achievements,
                achievement_spec(),
                ctx.toasts.clone(),
                ctx.scheduler.clone(),
            ),
        };
        service.select_date(DEFAULT_DATE_TAB);
        Ok(service)
    }

    pub fn classes(&self) -> DerivedView<ClassSession> {
        self.classes.view()
    }

    pub fn achievements(&self) -> DerivedView<Achievement> {
        self.achievements.view()
    }

    pub fn search(&self, query: &str) {
        self.classes.search(query);
    }

    /// The date strip above the list. It is display state only; every date
    /// shows the same saved classes.
    pub fn select_date(&self, tab: &str) {
        self.classes.set_control(Control::Tab(tab.to_string()));
    }

    pub fn selected_date(&self) -> String {
        self.classes
            .store()
            .lock()
            .controls()
            .tab
            .clone()
            .unwrap_or_else(|| DEFAULT_DATE_TAB.to_string())
    }

    pub fn toggle_complete(&self, id: &RecordId) -> Result<ActionOutcome, DeskError> {
        self.classes.dispatch_with_toast(
            ListAction::ToggleFlag {
                id: id.clone(),
                field: fields::COMPLETED.to_string(),
            },
            Toast::new("Status da aula atualizado").with_description("A aula foi marcada como concluída."),
        )
    }

    pub fn delete_class(&self, id: &RecordId) -> Result<ActionOutcome, DeskError> {
        self.classes.dispatch_with_toast(
            ListAction::Remove(id.clone()),
            Toast::new("Aula removida").with_description("A aula foi removida com sucesso."),
        )
    }

    pub fn add_class(&self, class: ClassSession) -> Result<RecordId, DeskError> {
        let outcome = self.classes.dispatch_with_toast(
            ListAction::Add(class),
            Toast::new("Aula adicionada").with_description("A aula foi salva com sucesso."),
        )?;
        match outcome {
            ActionOutcome::Added(id) => Ok(id),
            other => Err(DeskError::InvalidRecord {
                reason: format!("add produced {:?}", other),
            }),
        }
    }

    pub fn edit_class(&self, id: &RecordId) {
        if let Some(class) = self.classes.get(id) {
            self.classes
                .notify(Toast::new("Editar aula").with_description(format!("Editando {}", class.name)));
        }
    }

    pub fn share_class(&self, id: &RecordId) {
        if let Some(class) = self.classes.get(id) {
            self.classes
                .notify(Toast::new("Compartilhar aula").with_description(format!("Compartilhando {}", class.name)));
        }
    }

    pub fn stats(&self) -> ClassStats {
        let classes = self.classes.store();
        let classes = classes.lock();
        let achievements = self.achievements.store();
        let achievements = achievements.lock();

        let unlocked = achievements.collection().iter().filter(|a| a.unlocked).count();
        let achievement_percent = if achievements.is_empty() {
            0
        } else {
            ((unlocked as f64 / achievements.len() as f64) * 100.0).round() as u32
        };

        ClassStats {
            completed: classes.collection().iter().filter(|c| c.completed).count(),
            total: classes.len(),
            unlocked_achievements: unlocked,
            achievement_percent,
        }
    }

    /// Selects every unlocked achievement for sharing.
    pub fn select_unlocked_achievements(&self) -> usize {
        let unlocked = self.stats().unlocked_achievements;
        info!(unlocked, "Selecting unlocked achievements");

        let toast = if unlocked > 0 {
            Toast::new(format!("{} conquistas selecionadas", unlocked))
                .with_description("Você pode compartilhá-las agora.")
        } else {
            Toast::new("Nenhuma conquista desbloqueada")
                .with_description("Continue progredindo para desbloquear conquistas.")
        };
        self.achievements.notify(toast);
        unlocked
    }
}
