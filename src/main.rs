use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use fitdesk::config::{Delays, DeskConfig};
use fitdesk::domain::record::RecordId;
use fitdesk::services::error_handling::UserErrorFormatter;
use fitdesk::services::{
    BillingService, ChurnService, ClassService, DashboardService, ExportFormat, IntegrationService,
    MaintenanceService, NoticeService, PageContext, PaymentService, ProfileService, QuickActions, TokioScheduler,
    ToastQueue,
};
use fitdesk::view::SortDirection;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = DeskConfig::load().unwrap_or_else(|e| {
        eprintln!("{} ({:#})", UserErrorFormatter::format_for_ui(&e), e);
        DeskConfig::default()
    });
    if std::env::args().any(|arg| arg == "--fast") {
        config.delays = Delays::immediate();
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(config.max_level().unwrap_or(tracing::Level::INFO))
        .init();

    let toasts = Arc::new(ToastQueue::new());
    let scheduler = Arc::new(TokioScheduler::current()?);
    let ctx = PageContext::from_config(&config, toasts.clone(), scheduler.clone());

    info!("Starting fitdesk walkthrough");

    let dashboard = DashboardService::new(&ctx);
    dashboard.start_live_updates();

    let classes = ClassService::new(&ctx)?;
    classes.search("amanda");
    for class in classes.classes().rows.iter() {
        println!("aula  {} {} ({})", class.time, class.name, class.instructor);
    }
    classes.search("");
    classes.toggle_complete(&RecordId::from("1"))?;
    let stats = classes.stats();
    println!("aulas concluídas: {}/{}", stats.completed, stats.total);

    let payments = PaymentService::new(&ctx)?;
    payments.sort_by("amount", SortDirection::Desc);
    for payment in payments.payments().rows.iter() {
        println!("pagamento  {:>8.2} {} [{}]", payment.amount, payment.name, payment.status.as_str());
    }
    payments.quick_action("Enviar Lembrete", Some(&RecordId::from("2")));
    payments.start_live_snapshot();

    let billing = BillingService::new(&ctx)?;
    billing.filter_category("despesa");
    let expenses: f64 = billing.entries().rows.iter().map(|e| e.amount).sum();
    println!("despesas filtradas: R$ {:.2}", expenses);
    billing.generate_report();
    billing.update_data();
    billing.start_live_updates();

    let notices = NoticeService::new(&ctx)?;
    println!("notificações não lidas: {}", notices.unread_count());
    notices.sync();
    println!("{}", notices.export(ExportFormat::Csv)?);

    let churn = ChurnService::new(&ctx)?;
    for student in churn.at_risk().rows.iter() {
        println!("risco  {:>3}% {}", student.risk, student.name);
    }
    churn.refresh();

    let integrations = IntegrationService::new(&ctx)?;
    integrations.force_sync("members");
    integrations.refresh_equipment();
    integrations.start_equipment_drift();
    integrations.open_calendar();
    integrations.open_priority_settings();

    let maintenance = MaintenanceService::new(&ctx);
    maintenance.backup();
    maintenance.export(ExportFormat::Json);

    let activities = QuickActions::new(&ctx);
    activities.activity("iniciar-aula");
    activities.start_live_stats();

    let profile = ProfileService::new(&ctx);
    profile.start_live_updates();
    profile.sync_all();

    // Let every deferred completion fire before printing the toast feed.
    let longest = [
        config.delays.report_ms,
        config.delays.ledger_update_ms,
        config.delays.notification_sync_ms,
        config.delays.churn_refresh_ms,
        config.delays.integration_sync_ms,
        config.delays.equipment_refresh_ms,
        config.delays.backup_ms,
        config.delays.export_ms,
    ]
    .into_iter()
    .max()
    .unwrap_or_default();
    tokio::time::sleep(Duration::from_millis(longest + 100)).await;

    dashboard.stop_live_updates();
    payments.stop_live_snapshot();
    billing.stop_live_updates();
    integrations.stop_equipment_drift();
    activities.stop_live_stats();
    profile.stop_live_updates();

    for load in integrations.equipment() {
        println!("equipamento  {} {:.0}%", load.name, load.usage);
    }
    let stats = activities.stats();
    println!("aulas ativas: {} check-ins: {}", stats.active_classes, stats.total_check_ins);
    println!(
        "academia {} membros hoje: {}",
        if profile.is_online() { "online" } else { "offline" },
        profile.stats().active_members_today
    );

    let metrics = dashboard.metrics();
    if let Some(latest) = metrics.revenue.last() {
        println!("receita {}: R$ {} (projeção R$ {})", latest.month, latest.revenue, latest.projected);
    }

    println!("lançamentos após atualização: {}", billing.entries().summary().total);
    for toast in toasts.drain() {
        match toast.description {
            Some(description) => println!("toast  {} - {}", toast.title, description),
            None => println!("toast  {}", toast.title),
        }
    }

    let aborted = scheduler.shutdown();
    info!(aborted, "Walkthrough finished");
    Ok(())
}
