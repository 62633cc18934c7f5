use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::record::{expect_number, expect_text, unknown_field, FieldValue, Record, RecordId};
use crate::services::error_handling::DeskError;

pub mod fields {
    pub const DESCRIPTION: &str = "descricao";
    pub const AMOUNT: &str = "valor";
    pub const DATE: &str = "data";
    pub const STATUS: &str = "status";
    pub const CATEGORY: &str = "categoria";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    #[serde(rename = "pago")]
    Paid,
    #[serde(rename = "pendente")]
    Pending,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Paid => "pago",
            EntryStatus::Pending => "pendente",
        }
    }
}

impl FromStr for EntryStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pago" => Ok(EntryStatus::Paid),
            "pendente" => Ok(EntryStatus::Pending),
            other => Err(DeskError::InvalidRecord {
                reason: format!("unknown ledger status '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "receita")]
    Income,
    #[serde(rename = "despesa")]
    Expense,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "receita",
            Category::Expense => "despesa",
        }
    }
}

impl FromStr for Category {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receita" => Ok(Category::Income),
            "despesa" => Ok(Category::Expense),
            other => Err(DeskError::InvalidRecord {
                reason: format!("unknown ledger category '{}'", other),
            }),
        }
    }
}

/// One row of the billing spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: RecordId,
    pub description: String,
    pub amount: f64,
    pub date: String, // "DD/MM/YYYY"
    pub status: EntryStatus,
    pub category: Category,
}

impl Default for LedgerEntry {
    fn default() -> Self {
        Self {
            id: RecordId::new(""),
            description: "Nova transação".to_string(),
            amount: 0.0,
            date: chrono::Local::now().format("%d/%m/%Y").to_string(),
            status: EntryStatus::Pending,
            category: Category::Income,
        }
    }
}

impl LedgerEntry {
    pub fn new(
        id: impl Into<RecordId>,
        description: &str,
        amount: f64,
        date: &str,
        status: EntryStatus,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.to_string(),
            amount,
            date: date.to_string(),
            status,
            category,
        }
    }
}

impl Record for LedgerEntry {
    const KIND: &'static str = "ledger_entry";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            fields::DESCRIPTION => Some(FieldValue::text(&self.description)),
            fields::AMOUNT => Some(FieldValue::number(self.amount)),
            fields::DATE => Some(FieldValue::date(&self.date)),
            fields::STATUS => Some(FieldValue::text(self.status.as_str())),
            fields::CATEGORY => Some(FieldValue::text(self.category.as_str())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DeskError> {
        match name {
            fields::DESCRIPTION => self.description = expect_text(name, value)?,
            fields::AMOUNT => self.amount = expect_number(name, value)?,
            fields::DATE => self.date = expect_text(name, value)?,
            fields::STATUS => self.status = expect_text(name, value)?.parse()?,
            fields::CATEGORY => self.category = expect_text(name, value)?.parse()?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}

/// Totals shown above the spreadsheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LedgerSummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub income_count: usize,
    pub expense_count: usize,
}

impl LedgerSummary {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Self {
        let mut summary = LedgerSummary {
            income: 0.0,
            expenses: 0.0,
            balance: 0.0,
            income_count: 0,
            expense_count: 0,
        };

        for entry in entries {
            match entry.category {
                Category::Income => {
                    summary.income += entry.amount;
                    summary.income_count += 1;
                }
                Category::Expense => {
                    summary.expenses += entry.amount;
                    summary.expense_count += 1;
                }
            }
        }

        summary.balance = summary.income - summary.expenses;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let entries = vec![
            LedgerEntry::new("1", "Mensalidade - Ana Silva", 150.0, "15/05/2024", EntryStatus::Paid, Category::Income),
            LedgerEntry::new("2", "Agua Mineral", 250.0, "10/05/2024", EntryStatus::Paid, Category::Expense),
            LedgerEntry::new("3", "Mensalidade - João Costa", 180.0, "18/05/2024", EntryStatus::Paid, Category::Income),
        ];

        let summary = LedgerSummary::from_entries(&entries);
        assert_eq!(summary.income, 330.0);
        assert_eq!(summary.expenses, 250.0);
        assert_eq!(summary.balance, 80.0);
        assert_eq!(summary.income_count, 2);
        assert_eq!(summary.expense_count, 1);
    }

    #[test]
    fn test_category_field_and_parse() {
        let mut entry = LedgerEntry::default();
        assert_eq!(entry.field(fields::CATEGORY), Some(FieldValue::text("receita")));
        entry.set_field(fields::CATEGORY, FieldValue::text("despesa")).unwrap();
        assert_eq!(entry.category, Category::Expense);
        assert!("lucro".parse::<Category>().is_err());
    }

    #[test]
    fn test_default_entry_is_placeholder() {
        let entry = LedgerEntry::default();
        assert_eq!(entry.description, "Nova transação");
        assert_eq!(entry.amount, 0.0);
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.date.len(), 10);
    }
}
