pub mod record;
pub mod class_session;
pub mod payment;
pub mod ledger;
pub mod notice;
pub mod churn;
pub mod integration;
pub mod settings;
pub mod metrics;
