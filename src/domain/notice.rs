use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::record::{expect_flag, expect_text, unknown_field, FieldValue, Record, RecordId};
use crate::services::error_handling::DeskError;

pub mod fields {
    pub const KIND: &str = "type";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const DATE: &str = "date";
    pub const DETAIL: &str = "detail";
    pub const CHANCE: &str = "chance";
    pub const READ: &str = "lida";
    /// Derived from the title; read-only.
    pub const CATEGORY: &str = "categoria";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Critical,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Critical => "critical",
            NoticeKind::Warning => "warning",
            NoticeKind::Info => "info",
        }
    }
}

impl FromStr for NoticeKind {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(NoticeKind::Critical),
            "warning" => Ok(NoticeKind::Warning),
            "info" => Ok(NoticeKind::Info),
            other => Err(DeskError::InvalidRecord {
                reason: format!("unknown notice type '{}'", other),
            }),
        }
    }
}

/// Grouping used by the notification feed tabs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NoticeCategory {
    Financial,
    Churn,
    General,
}

impl NoticeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeCategory::Financial => "financeiro",
            NoticeCategory::Churn => "evasao",
            NoticeCategory::General => "geral",
        }
    }
}

/// An entry of the notification feed (not to be confused with a toast).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub id: RecordId,
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
    pub date: String, // "DD/MM"
    pub detail: String,
    pub chance: Option<String>,
    pub actions: Vec<String>,
    pub read: bool,
}

impl Notice {
    pub fn new(
        id: impl Into<RecordId>,
        kind: NoticeKind,
        title: &str,
        description: &str,
        date: &str,
        detail: &str,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.to_string(),
            description: description.to_string(),
            date: date.to_string(),
            detail: detail.to_string(),
            chance: None,
            actions: Vec::new(),
            read: false,
        }
    }

    pub fn with_chance(mut self, chance: &str) -> Self {
        self.chance = Some(chance.to_string());
        self
    }

    pub fn with_actions(mut self, actions: &[&str]) -> Self {
        self.actions = actions.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn category(&self) -> NoticeCategory {
        if self.title.contains("PAGAMENTO") {
            NoticeCategory::Financial
        } else if self.title.contains("CANCELAMENTO") || self.title.contains("INATIVO") {
            NoticeCategory::Churn
        } else {
            NoticeCategory::General
        }
    }
}

impl Record for Notice {
    const KIND: &'static str = "notice";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            fields::KIND => Some(FieldValue::text(self.kind.as_str())),
            fields::TITLE => Some(FieldValue::text(&self.title)),
            fields::DESCRIPTION => Some(FieldValue::text(&self.description)),
            fields::DATE => Some(FieldValue::date(&self.date)),
            fields::DETAIL => Some(FieldValue::text(&self.detail)),
            fields::CHANCE => self.chance.as_ref().map(FieldValue::text),
            fields::READ => Some(FieldValue::Flag(self.read)),
            fields::CATEGORY => Some(FieldValue::text(self.category().as_str())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DeskError> {
        match name {
            fields::KIND => self.kind = expect_text(name, value)?.parse()?,
            fields::TITLE => self.title = expect_text(name, value)?,
            fields::DESCRIPTION => self.description = expect_text(name, value)?,
            fields::DATE => self.date = expect_text(name, value)?,
            fields::DETAIL => self.detail = expect_text(name, value)?,
            fields::CHANCE => self.chance = Some(expect_text(name, value)?),
            fields::READ => self.read = expect_flag(name, value)?,
            fields::CATEGORY => {
                return Err(DeskError::InvalidRecord {
                    reason: "categoria is derived from the title".to_string(),
                });
            }
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}
