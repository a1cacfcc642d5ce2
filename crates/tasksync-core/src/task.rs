use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: &[Priority] = &[Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Priority::Low => "-",
            Priority::Medium => "!",
            Priority::High => "!!",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A task in display form, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    /// `DD/MM/YYYY`, or `None` when the task has no due date.
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Epoch milliseconds, set once by whoever assigned the id.
    pub created_at: i64,
}

/// A task in storage form. Only the persistence layer handles this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub due_date: Option<i64>,
    pub created_at: i64,
}

impl StoredTask {
    /// The canonical record handed back across the persistence boundary.
    pub fn to_display(&self) -> Task {
        Task {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            due_date: date::to_display(self.due_date),
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

/// What a user fills in to create a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: String,
}

impl TaskInput {
    /// Checks that can be made before anything leaves the client.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        date::to_timestamp(&self.due_date)?;
        Ok(())
    }
}

/// Create payload as it arrives over the wire. Every field is optional here
/// so that a missing field is reported as a validation failure rather than a
/// decode error. Client-sent `id`, `completed` and `createdAt` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl From<&TaskInput> for CreateTask {
    fn from(input: &TaskInput) -> Self {
        Self {
            title: Some(input.title.clone()),
            description: Some(input.description.clone()),
            priority: Some(input.priority.as_str().to_string()),
            due_date: Some(input.due_date.clone()),
        }
    }
}

impl CreateTask {
    /// Check presence of every field and convert the due date to storage form.
    pub fn validate(&self) -> Result<NewTask, ValidationError> {
        let title = self
            .title
            .as_deref()
            .ok_or(ValidationError::MissingField("title"))?;
        let description = self
            .description
            .as_deref()
            .ok_or(ValidationError::MissingField("description"))?;
        let priority = self
            .priority
            .as_deref()
            .ok_or(ValidationError::MissingField("priority"))?;
        let due_date = self
            .due_date
            .as_deref()
            .ok_or(ValidationError::MissingField("dueDate"))?;

        if title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        let priority = Priority::parse_str(priority)
            .ok_or_else(|| ValidationError::InvalidPriority(priority.to_string()))?;
        let due_date = date::to_timestamp(due_date)?;

        Ok(NewTask {
            title: title.to_string(),
            description: description.to_string(),
            priority,
            due_date,
        })
    }
}

/// A validated create request in storage form. The store adds `id`,
/// `createdAt` and `completed = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateError;

    fn payload() -> CreateTask {
        CreateTask {
            title: Some("Buy milk".into()),
            description: Some("2%".into()),
            priority: Some("low".into()),
            due_date: Some("01/06/2024".into()),
        }
    }

    #[test]
    fn every_priority_parses_from_its_wire_name() {
        for p in Priority::ALL {
            assert_eq!(Priority::parse_str(p.as_str()), Some(*p));
        }
        assert_eq!(Priority::High.to_string(), "High");
    }

    #[test]
    fn priority_defaults_to_medium() {
        let task: Task = serde_json::from_str(
            r#"{"id":"a","title":"t","completed":false,"createdAt":1}"#,
        )
        .unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.description, "");
    }

    #[test]
    fn task_uses_camel_case_on_the_wire() {
        let task = Task {
            id: "a".into(),
            title: "t".into(),
            description: String::new(),
            priority: Priority::High,
            due_date: Some("01/06/2024".into()),
            completed: true,
            created_at: 42,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "01/06/2024");
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["priority"], "high");
    }

    #[test]
    fn valid_payload_converts_due_date() {
        let new_task = payload().validate().unwrap();
        assert_eq!(new_task.title, "Buy milk");
        assert_eq!(new_task.priority, Priority::Low);
        assert_eq!(new_task.due_date, 1_717_200_000_000);
    }

    #[test]
    fn each_missing_field_is_reported() {
        let cases: [(&str, fn(&mut CreateTask)); 4] = [
            ("title", |c| c.title = None),
            ("description", |c| c.description = None),
            ("priority", |c| c.priority = None),
            ("dueDate", |c| c.due_date = None),
        ];
        for (field, clear) in cases {
            let mut input = payload();
            clear(&mut input);
            assert_eq!(input.validate(), Err(ValidationError::MissingField(field)));
        }
    }

    #[test]
    fn empty_description_is_allowed() {
        let mut input = payload();
        input.description = Some(String::new());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn bad_priority_and_date_are_rejected() {
        let mut input = payload();
        input.priority = Some("urgent".into());
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidPriority("urgent".into()))
        );

        let mut input = payload();
        input.due_date = Some("31/02/2024".into());
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidDate(DateError::NotACalendarDate(
                "31/02/2024".into()
            )))
        );
    }

    #[test]
    fn stored_task_renders_display_form() {
        let stored = StoredTask {
            id: "x".into(),
            title: "t".into(),
            description: "d".into(),
            priority: Priority::Low,
            completed: false,
            due_date: Some(1_717_200_000_000),
            created_at: 7,
        };
        assert_eq!(stored.to_display().due_date.as_deref(), Some("01/06/2024"));
    }

    #[test]
    fn input_validation_catches_blank_title() {
        let input = TaskInput {
            title: "   ".into(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: "01/06/2024".into(),
        };
        assert_eq!(input.validate(), Err(ValidationError::BlankTitle));
    }
}
