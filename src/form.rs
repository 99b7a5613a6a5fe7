// ============================================
// src/form.rs
// The three form fields and their presence check
// ============================================

use serde::{Deserialize, Serialize};

use crate::activity::SubjectArea;
use crate::error::{AppError, Result};

/// Which of the three inputs a key press or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    YearLevel,
    SubjectArea,
    UnitTopic,
}

impl Field {
    /// Form order, top to bottom.
    pub const ALL: [Field; 3] = [Field::YearLevel, Field::SubjectArea, Field::UnitTopic];

    pub fn label(self) -> &'static str {
        match self {
            Field::YearLevel => "Year Level",
            Field::SubjectArea => "Subject Area",
            Field::UnitTopic => "Unit Topic",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::YearLevel => "e.g. Year 8, Grade 10, etc.",
            Field::SubjectArea => "Select a subject area",
            Field::UnitTopic => "e.g. Fractions, Photosynthesis, World War I",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Field::YearLevel => Field::SubjectArea,
            Field::SubjectArea => Field::UnitTopic,
            Field::UnitTopic => Field::YearLevel,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Field::YearLevel => Field::UnitTopic,
            Field::SubjectArea => Field::YearLevel,
            Field::UnitTopic => Field::SubjectArea,
        }
    }
}

/// Raw form contents, edited a keystroke at a time.
///
/// Also the request shape of the generation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub year_level: String,
    pub subject_area: String,
    pub unit_topic: String,
}

/// Form contents that passed the presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub year_level: String,
    pub subject_area: SubjectArea,
    pub unit_topic: String,
}

impl FormInput {
    pub fn new(
        year_level: impl Into<String>,
        subject_area: impl Into<String>,
        unit_topic: impl Into<String>,
    ) -> Self {
        Self {
            year_level: year_level.into(),
            subject_area: subject_area.into(),
            unit_topic: unit_topic.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::YearLevel => &self.year_level,
            Field::SubjectArea => &self.subject_area,
            Field::UnitTopic => &self.unit_topic,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::YearLevel => &mut self.year_level,
            Field::SubjectArea => &mut self.subject_area,
            Field::UnitTopic => &mut self.unit_topic,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    pub fn push_char(&mut self, field: Field, c: char) {
        self.get_mut(field).push(c);
    }

    pub fn pop_char(&mut self, field: Field) {
        self.get_mut(field).pop();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fields that are empty, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    /// MARK: presence check
    pub fn validate(&self) -> Result<ValidatedInput> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        Ok(ValidatedInput {
            year_level: self.year_level.clone(),
            subject_area: SubjectArea::parse(&self.subject_area),
            unit_topic: self.unit_topic.clone(),
        })
    }
}
