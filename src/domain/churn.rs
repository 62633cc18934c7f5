use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::record::{expect_number, expect_text, unknown_field, FieldValue, Record, RecordId};
use crate::services::error_handling::DeskError;

pub mod fields {
    pub const NAME: &str = "nome";
    pub const RISK: &str = "risco";
    pub const PATTERN: &str = "padrao";
    pub const REASON: &str = "razao";
}

/// Behaviour that flagged the student.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskPattern {
    #[serde(rename = "frequencia")]
    Attendance,
    #[serde(rename = "pagamento")]
    Payment,
    #[serde(rename = "feedback")]
    Feedback,
}

impl RiskPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskPattern::Attendance => "frequencia",
            RiskPattern::Payment => "pagamento",
            RiskPattern::Feedback => "feedback",
        }
    }
}

impl FromStr for RiskPattern {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frequencia" => Ok(RiskPattern::Attendance),
            "pagamento" => Ok(RiskPattern::Payment),
            "feedback" => Ok(RiskPattern::Feedback),
            other => Err(DeskError::InvalidRecord {
                reason: format!("unknown risk pattern '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtRiskStudent {
    pub id: RecordId,
    pub name: String,
    /// Churn likelihood in percent, 0..=100.
    pub risk: u8,
    pub pattern: RiskPattern,
    pub reason: String,
}

impl AtRiskStudent {
    pub fn new(id: impl Into<RecordId>, name: &str, risk: u8, pattern: RiskPattern, reason: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            risk: risk.min(100),
            pattern,
            reason: reason.to_string(),
        }
    }
}

impl Record for AtRiskStudent {
    const KIND: &'static str = "at_risk_student";

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
            fields::RISK => Some(FieldValue::number(self.risk as f64)),
            fields::PATTERN => Some(FieldValue::text(self.pattern.as_str())),
            fields::REASON => Some(FieldValue::text(&self.reason)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DeskError> {
        match name {
            fields::NAME => self.name = expect_text(name, value)?,
            fields::RISK => self.risk = expect_number(name, value)?.clamp(0.0, 100.0) as u8,
            fields::PATTERN => self.pattern = expect_text(name, value)?.parse()?,
            fields::REASON => self.reason = expect_text(name, value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}

/// One day of the cancellation chart. `cancellations` is `None` for days
/// that have not happened yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub date: String,
    pub cancellations: Option<u32>,
    pub forecast: u32,
}
