use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::record::{expect_number, expect_text, unknown_field, FieldValue, Record, RecordId};
use crate::services::error_handling::DeskError;

pub mod fields {
    pub const NAME: &str = "name";
    pub const STATUS: &str = "status";
    pub const LAST_SYNC: &str = "last_sync";
    pub const PROGRESS: &str = "progress";
    pub const DESCRIPTION: &str = "description";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Active,
    Unstable,
    Offline,
}

impl IntegrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationStatus::Active => "active",
            IntegrationStatus::Unstable => "unstable",
            IntegrationStatus::Offline => "offline",
        }
    }
}

impl FromStr for IntegrationStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(IntegrationStatus::Active),
            "unstable" => Ok(IntegrationStatus::Unstable),
            "offline" => Ok(IntegrationStatus::Offline),
            other => Err(DeskError::InvalidRecord {
                reason: format!("unknown integration status '{}'", other),
            }),
        }
    }
}

/// An external system the studio syncs with (CRM, calendar, payment gateway).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiIntegration {
    pub id: RecordId,
    pub name: String,
    pub status: IntegrationStatus,
    pub last_sync: String,
    pub progress: u8,
    pub description: String,
}

impl ApiIntegration {
    pub fn new(id: &str, name: &str, last_sync: &str, progress: u8, description: &str) -> Self {
        Self {
            id: RecordId::new(id),
            name: name.to_string(),
            status: IntegrationStatus::Active,
            last_sync: last_sync.to_string(),
            progress: progress.min(100),
            description: description.to_string(),
        }
    }
}

impl Record for ApiIntegration {
    const KIND: &'static str = "integration";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            fields::NAME => Some(FieldValue::text(&self.name)),
            fields::STATUS => Some(FieldValue::text(self.status.as_str())),
            fields::LAST_SYNC => Some(FieldValue::text(&self.last_sync)),
            fields::PROGRESS => Some(FieldValue::number(self.progress as f64)),
            fields::DESCRIPTION => Some(FieldValue::text(&self.description)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DeskError> {
        match name {
            fields::NAME => self.name = expect_text(name, value)?,
            fields::STATUS => self.status = expect_text(name, value)?.parse()?,
            fields::LAST_SYNC => self.last_sync = expect_text(name, value)?,
            fields::PROGRESS => self.progress = expect_number(name, value)?.clamp(0.0, 100.0) as u8,
            fields::DESCRIPTION => self.description = expect_text(name, value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}

/// Live usage gauge of an equipment group, in percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentLoad {
    pub name: String,
    pub usage: f64,
}

impl EquipmentLoad {
    pub fn new(name: &str, usage: f64) -> Self {
        Self {
            name: name.to_string(),
            usage,
        }
    }
}
