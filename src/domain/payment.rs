use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::record::{expect_number, expect_text, unknown_field, FieldValue, Record, RecordId};
use crate::services::error_handling::DeskError;

pub mod fields {
    pub const NAME: &str = "name";
    pub const AMOUNT: &str = "amount";
    pub const DUE_DATE: &str = "due_date";
    pub const STATUS: &str = "status";
    pub const PLAN: &str = "plan";
    pub const METHOD: &str = "method";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            "overdue" => Ok(PaymentStatus::Overdue),
            other => Err(DeskError::InvalidRecord {
                reason: format!("unknown payment status '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: RecordId,
    pub name: String,
    pub amount: f64,
    pub due_date: String, // ISO "YYYY-MM-DD"
    pub status: PaymentStatus,
    pub plan: String,
    pub method: String,
}

impl Payment {
    pub fn new(
        id: impl Into<RecordId>,
        name: &str,
        amount: f64,
        due_date: &str,
        status: PaymentStatus,
        plan: &str,
        method: &str,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            amount,
            due_date: due_date.to_string(),
            status,
            plan: plan.to_string(),
            method: method.to_string(),
        }
    }
}

impl Record for Payment {
    const KIND: &'static str = "payment";

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
            fields::AMOUNT => Some(FieldValue::number(self.amount)),
            fields::DUE_DATE => Some(FieldValue::date(&self.due_date)),
            fields::STATUS => Some(FieldValue::text(self.status.as_str())),
            fields::PLAN => Some(FieldValue::text(&self.plan)),
            fields::METHOD => Some(FieldValue::text(&self.method)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DeskError> {
        match name {
            fields::NAME => self.name = expect_text(name, value)?,
            fields::AMOUNT => self.amount = expect_number(name, value)?,
            fields::DUE_DATE => self.due_date = expect_text(name, value)?,
            fields::STATUS => self.status = expect_text(name, value)?.parse()?,
            fields::PLAN => self.plan = expect_text(name, value)?,
            fields::METHOD => self.method = expect_text(name, value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}

/// Headline numbers of the payments page, regenerated on every refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PaymentSnapshot {
    pub total_received: u32,
    pub total_pending: u32,
    pub canceled_count: u32,
    pub next_week_prediction: u32,
    pub success_rate: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_field_parses() {
        let mut payment = Payment::new("3", "Marta Rocha", 90.0, "2024-05-25", PaymentStatus::Pending, "Basic", "Boleto");
        payment.set_field(fields::STATUS, FieldValue::text("paid")).unwrap();
        assert_eq!(payment.status, PaymentStatus::Paid);

        let err = payment.set_field(fields::STATUS, FieldValue::text("refunded")).unwrap_err();
        assert!(matches!(err, DeskError::InvalidRecord { .. }));
    }

    #[test]
    fn test_due_date_is_date_field() {
        let payment = Payment::new("1", "Ana Silva", 120.0, "2024-05-20", PaymentStatus::Paid, "Premium", "PIX");
        assert_eq!(payment.field(fields::DUE_DATE), Some(FieldValue::date("2024-05-20")));
        assert_eq!(payment.field(fields::STATUS), Some(FieldValue::text("paid")));
    }
}
