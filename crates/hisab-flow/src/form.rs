//! Group name/description draft and its validation schema.

use std::fmt;
use validator::Validate;

pub const NAME_REQUIRED: &str = "Group name is required";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => f.write_str("name"),
            Field::Description => f.write_str("description"),
        }
    }
}

/// Message attached to one form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Draft that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidGroup {
    pub name: String,
    /// `None` when the description was left empty.
    pub description: Option<String>,
}

/// Name/description draft of the group being created.
#[derive(Clone, Debug, Default)]
pub struct GroupForm {
    name: String,
    description: String,
    errors: Vec<FieldError>,
}

impl GroupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Check the draft against the schema and record the outcome.
    ///
    /// Messages from a previous attempt are replaced, so a field that became
    /// valid loses its message.
    pub fn validate(&mut self) -> Result<ValidGroup, Vec<FieldError>> {
        let outcome = check(&self.name, &self.description);
        self.errors = match &outcome {
            Ok(_) => Vec::new(),
            Err(errors) => errors.clone(),
        };
        outcome
    }

    /// Message currently shown under `field`, if any.
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
        self.errors.clear();
    }

    pub fn is_pristine(&self) -> bool {
        self.name.is_empty() && self.description.is_empty() && self.errors.is_empty()
    }
}

/// Validation schema of the creation form.
#[derive(Debug, Validate)]
struct GroupDraft {
    #[validate(length(min = 1, message = "Group name is required"))]
    name: String,
    description: Option<String>,
}

fn check(name: &str, description: &str) -> Result<ValidGroup, Vec<FieldError>> {
    let draft = GroupDraft {
        name: name.to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
    };

    if let Err(e) = draft.validate() {
        let mut errors = Vec::new();
        for (field, failures) in e.field_errors() {
            let field = match &*field {
                "name" => Field::Name,
                "description" => Field::Description,
                _ => continue,
            };
            errors.extend(failures.iter().map(|failure| FieldError {
                field,
                message: failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string()),
            }));
        }
        return Err(errors);
    }

    Ok(ValidGroup {
        name: draft.name,
        description: draft.description,
    })
}
