use tracing::info;

use crate::config::desk_config::ms;
use crate::config::Delays;
use crate::domain::notice::{fields, Notice, NoticeCategory};
use crate::domain::record::{FieldValue, RecordId};
use crate::repository::{ActionOutcome, DerivedView, ListAction, ListStore};
use crate::services::context::PageContext;
use crate::services::error_handling::DeskError;
use crate::services::export_service::{ExportFormat, ExportService};
use crate::services::list_page::ListPage;
use crate::services::seed;
use crate::services::toast::Toast;
use crate::view::{ListSpec, SortKind};

pub const TAB_ALL: &str = "Todos";
pub const TAB_UNREAD: &str = "Não Lidos";
pub const TAB_FINANCIAL: &str = "Financeiro";
pub const TAB_CHURN: &str = "Evasão";

const EXPORT_COLUMNS: [&str; 5] = [fields::KIND, fields::TITLE, fields::DESCRIPTION, fields::DATE, fields::READ];

pub fn notice_spec() -> ListSpec<Notice> {
    ListSpec::<Notice>::new("notices")
        .search_in(&[fields::TITLE, fields::DESCRIPTION, fields::DETAIL])
        .filter_tab(TAB_UNREAD, |n| !n.read)
        .filter_tab(TAB_FINANCIAL, |n| n.category() == NoticeCategory::Financial)
        .filter_tab(TAB_CHURN, |n| n.category() == NoticeCategory::Churn)
        .sort_column(fields::DATE, SortKind::Date)
        .sort_column(fields::KIND, SortKind::Text)
}

/// The notification feed.
pub struct NoticeService {
    notices: ListPage<Notice>,
    delays: Delays,
}

impl NoticeService {
    pub fn new(ctx: &PageContext) -> Result<Self, DeskError> {
        let store = ListStore::try_from_seed("notices", &seed::notices)?;
        Ok(Self {
            notices: ListPage::new(store, notice_spec(), ctx.toasts.clone(), ctx.scheduler.clone()),
            delays: ctx.delays,
        })
    }

    pub fn notices(&self) -> DerivedView<Notice> {
        self.notices.view()
    }

    pub fn select_tab(&self, tab: &str) {
        self.notices.filter(tab);
    }

    pub fn search(&self, query: &str) {
        self.notices.search(query);
    }

    pub fn unread_count(&self) -> usize {
        self.notices
            .store()
            .lock()
            .collection()
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// One of the inline action buttons of a notification.
    pub fn handle_action(&self, action: &str, id: &RecordId) {
        info!(action, notice = %id, "Notification action");
        self.notices.notify(
            Toast::new("Ação executada").with_description(format!("{} para a notificação #{}", action, id)),
        );
    }

    pub fn remove(&self, id: &RecordId) -> Result<ActionOutcome, DeskError> {
        self.notices.dispatch_with_toast(
            ListAction::Remove(id.clone()),
            Toast::new("Notificação removida").with_description("A notificação foi arquivada com sucesso."),
        )
    }

    pub fn mark_read(&self, id: &RecordId) -> Result<ActionOutcome, DeskError> {
        self.notices.dispatch_with_toast(
            ListAction::UpdateField {
                id: id.clone(),
                field: fields::READ.to_string(),
                value: FieldValue::Flag(true),
            },
            Toast::new("Notificação marcada como lida"),
        )
    }

    pub fn clear_all(&self) -> Result<ActionOutcome, DeskError> {
        self.notices.dispatch_with_toast(
            ListAction::Clear,
            Toast::new("Notificações limpas")
                .with_description("Todas as notificações foram arquivadas com sucesso."),
        )
    }

    /// Renders the visible notifications and confirms with a toast.
    pub fn export(&self, format: ExportFormat) -> Result<String, DeskError> {
        let view = self.notices.view();
        let rendered = ExportService::render(&view.rows, &EXPORT_COLUMNS, format)?;
        self.notices.notify(
            Toast::new("Relatório exportado")
                .with_description(format!("Relatório de notificações exportado em formato {}.", format)),
        );
        Ok(rendered)
    }

    pub fn sync(&self) {
        self.notices.notify(Toast::new("Sincronizando...").with_description("Buscando novas notificações..."));
        self.notices.defer_toast(
            ms(self.delays.notification_sync_ms),
            "notices.sync",
            Toast::new("Sincronização concluída").with_description("Não há novas notificações."),
        );
    }
}
