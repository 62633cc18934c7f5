use anyhow::{Context, Result};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::services::toast::{Toast, ToastVariant};

/// Errors a page can surface for genuinely invalid input.
///
/// Missing identifiers are deliberately absent: deleting or updating an id
/// that is not in the collection is a silent no-op, not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeskError {
    #[error("Invalid record: {reason}")]
    InvalidRecord { reason: String },

    #[error("Unknown field '{field}' on {record}")]
    UnknownField { record: &'static str, field: String },

    #[error("Field '{field}' expects a {expected} value")]
    FieldTypeMismatch { field: String, expected: &'static str },

    #[error("Duplicate record id: {id}")]
    DuplicateId { id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Export failed ({format}): {message}")]
    Export { format: String, message: String },
}

/// Error context wrapper for better debugging
pub struct ErrorContext {
    operation: String,
    details: Vec<(String, String)>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.details.push((key.into(), value.to_string()));
        self
    }

    pub fn wrap<T>(self, result: Result<T>) -> Result<T> {
        result.with_context(|| {
            let mut msg = format!("Operation '{}' failed", self.operation);
            if !self.details.is_empty() {
                msg.push_str(" with context:");
                for (key, value) in self.details {
                    msg.push_str(&format!("\n  {}: {}", key, value));
                }
            }
            msg
        })
    }
}

/// Structured logging helpers
pub struct LogHelper;

impl LogHelper {
    pub fn log_record_operation(page: &str, operation: &str, record_id: &str, changed: bool) {
        if changed {
            info!(
                page = %page,
                operation = %operation,
                record_id = %record_id,
                "Record operation applied"
            );
        } else {
            debug!(
                page = %page,
                operation = %operation,
                record_id = %record_id,
                "Record operation was a no-op"
            );
        }
    }

    pub fn log_rejected_input(page: &str, error: &DeskError) {
        warn!(
            page = %page,
            error = %error,
            "Rejected invalid input"
        );
    }

    pub fn log_deferred(label: &str, delay_ms: u64) {
        debug!(
            label = %label,
            delay_ms = delay_ms,
            "Deferred task scheduled"
        );
    }
}

/// User-friendly error messages
pub struct UserErrorFormatter;

impl UserErrorFormatter {
    pub fn format_for_ui(error: &anyhow::Error) -> String {
        if let Some(desk_error) = error.downcast_ref::<DeskError>() {
            return Self::format_desk_error(desk_error);
        }

        let error_str = error.to_string();

        if error_str.contains("toml") || error_str.contains("config") {
            return "As configurações não puderam ser carregadas.".to_string();
        }

        "Ocorreu um erro inesperado. Tente novamente.".to_string()
    }

    pub fn format_desk_error(error: &DeskError) -> String {
        match error {
            DeskError::InvalidRecord { reason } => format!("Registro inválido: {}", reason),
            DeskError::UnknownField { field, .. } => format!("Campo desconhecido: {}", field),
            DeskError::FieldTypeMismatch { field, expected } => {
                format!("O campo {} espera um valor do tipo {}", field, expected)
            }
            DeskError::DuplicateId { id } => format!("Identificador duplicado: {}", id),
            DeskError::Configuration { message } => format!("Erro de configuração: {}", message),
            DeskError::Export { format, .. } => {
                format!("Não foi possível exportar em formato {}", format)
            }
        }
    }

    /// Renders an error as a destructive toast.
    pub fn toast_for(error: &DeskError) -> Toast {
        Toast::new("Ação não concluída")
            .with_description(Self::format_desk_error(error))
            .with_variant(ToastVariant::Destructive)
    }
}
