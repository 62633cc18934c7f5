use serde::{Deserialize, Serialize};

use super::record::{
    expect_flag, expect_number, expect_text, unknown_field, FieldValue, Record, RecordId,
};
use crate::services::error_handling::DeskError;

/// Field names of a saved class, as used by search, sort and update controls.
pub mod fields {
    pub const NAME: &str = "nome";
    pub const TIME: &str = "horario";
    pub const INSTRUCTOR: &str = "instrutor";
    pub const DURATION: &str = "duracao";
    pub const LEVEL: &str = "nivel";
    pub const KIND: &str = "tipo";
    pub const COMPLETED: &str = "concluida";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassSession {
    pub id: RecordId,
    pub name: String,
    pub time: String, // "HH:MM"
    pub instructor: String,
    pub duration: String,
    pub level: String,
    pub kind: String,
    pub completed: bool,
}

impl Default for ClassSession {
    fn default() -> Self {
        Self {
            id: RecordId::new(""),
            name: "Nova aula".to_string(),
            time: "00:00".to_string(),
            instructor: String::new(),
            duration: "60 min".to_string(),
            level: "Todos".to_string(),
            kind: String::new(),
            completed: false,
        }
    }
}

impl ClassSession {
    pub fn new(
        id: impl Into<RecordId>,
        name: &str,
        time: &str,
        instructor: &str,
        duration: &str,
        level: &str,
        kind: &str,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            time: time.to_string(),
            instructor: instructor.to_string(),
            duration: duration.to_string(),
            level: level.to_string(),
            kind: kind.to_string(),
            completed: false,
        }
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }
}

impl Record for ClassSession {
    const KIND: &'static str = "class";

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
            // Zero-padded "HH:MM" already sorts chronologically as text.
            fields::TIME => Some(FieldValue::text(&self.time)),
            fields::INSTRUCTOR => Some(FieldValue::text(&self.instructor)),
            fields::DURATION => Some(FieldValue::text(&self.duration)),
            fields::LEVEL => Some(FieldValue::text(&self.level)),
            fields::KIND => Some(FieldValue::text(&self.kind)),
            fields::COMPLETED => Some(FieldValue::Flag(self.completed)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DeskError> {
        match name {
            fields::NAME => self.name = expect_text(name, value)?,
            fields::TIME => self.time = expect_text(name, value)?,
            fields::INSTRUCTOR => self.instructor = expect_text(name, value)?,
            fields::DURATION => self.duration = expect_text(name, value)?,
            fields::LEVEL => self.level = expect_text(name, value)?,
            fields::KIND => self.kind = expect_text(name, value)?,
            fields::COMPLETED => self.completed = expect_flag(name, value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}

/// Progress badge shown next to the saved classes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: RecordId,
    pub title: String,
    pub progress: u32,
    pub total: u32,
    pub unlocked: bool,
}

impl Achievement {
    pub fn new(id: impl Into<RecordId>, title: &str, progress: u32, total: u32) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            progress,
            total,
            unlocked: total > 0 && progress >= total,
        }
    }

    /// Completion ratio in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.progress as f64 / self.total as f64).min(1.0)
    }
}

impl Record for Achievement {
    const KIND: &'static str = "achievement";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "titulo" => Some(FieldValue::text(&self.title)),
            "progresso" => Some(FieldValue::number(self.progress as f64)),
            "total" => Some(FieldValue::number(self.total as f64)),
            "desbloqueada" => Some(FieldValue::Flag(self.unlocked)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DeskError> {
        match name {
            "titulo" => self.title = expect_text(name, value)?,
            "progresso" => self.progress = expect_number(name, value)?.max(0.0) as u32,
            "total" => self.total = expect_number(name, value)?.max(0.0) as u32,
            "desbloqueada" => self.unlocked = expect_flag(name, value)?,
            _ => return Err(unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}
