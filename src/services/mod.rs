pub mod billing_service;
pub mod churn_service;
pub mod class_service;
pub mod context;
pub mod dashboard_service;
pub mod error_handling;
pub mod export_service;
pub mod integration_service;
pub mod list_page;
pub mod maintenance_service;
pub mod mock_data;
pub mod notice_service;
pub mod payment_service;
pub mod profile_service;
pub mod quick_actions;
pub mod scheduler;
pub mod seed;
pub mod toast;

pub use billing_service::BillingService;
pub use churn_service::ChurnService;
pub use class_service::ClassService;
pub use context::PageContext;
pub use dashboard_service::DashboardService;
pub use error_handling::DeskError;
pub use export_service::{ExportFormat, ExportService};
pub use integration_service::IntegrationService;
pub use list_page::{BusyFlag, ListPage};
pub use maintenance_service::{MaintenanceJob, MaintenanceService};
pub use mock_data::{MockDataProvider, RandomMockProvider};
pub use notice_service::NoticeService;
pub use payment_service::PaymentService;
pub use profile_service::ProfileService;
pub use quick_actions::QuickActions;
pub use scheduler::{LiveLoop, ManualScheduler, Scheduler, TokioScheduler};
pub use toast::{Toast, ToastQueue, ToastSink, ToastVariant};
