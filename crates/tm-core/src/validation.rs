use crate::error::{ConversationError, TaskError};
use crate::types::io::{CreateTaskInput, CreateTurnInput, UpdateTaskInput};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Checks a task about to be written. Every violated rule is collected so
/// the caller gets one aggregate error instead of the first failure.
pub fn validate_create(input: &CreateTaskInput) -> Result<(), TaskError> {
    let mut errors = Vec::new();

    if input.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    } else if input.title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!("Title must be at most {MAX_TITLE_LEN} characters"));
    }
    if input.description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        ));
    }
    if input.duration_minutes == 0 {
        errors.push("Duration must be a positive number of minutes".to_string());
    }
    if input.recurrence.interval == 0 {
        errors.push("Recurrence interval must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TaskError::Validation { errors })
    }
}

pub fn validate_update(input: &UpdateTaskInput) -> Result<(), TaskError> {
    let mut errors = Vec::new();

    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            errors.push("Title is required".to_string());
        } else if title.chars().count() > MAX_TITLE_LEN {
            errors.push(format!("Title must be at most {MAX_TITLE_LEN} characters"));
        }
    }
    if let Some(description) = &input.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            ));
        }
    }
    if input.duration_minutes == Some(0) {
        errors.push("Duration must be a positive number of minutes".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TaskError::Validation { errors })
    }
}

pub fn validate_turn(input: &CreateTurnInput) -> Result<(), ConversationError> {
    let mut errors = Vec::new();

    if input.message.trim().is_empty() {
        errors.push("Message is required".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConversationError::Validation { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::enums::TurnKind;
    use crate::types::ids::UserId;
    use crate::types::task::TaskDraft;

    #[test]
    fn create_aggregates_every_violation() {
        let draft = TaskDraft {
            duration_minutes: Some(0),
            description: Some("x".repeat(1001)),
            ..TaskDraft::default()
        };
        let input = CreateTaskInput::from_draft(UserId::default(), draft);
        let err = validate_create(&input).unwrap_err();
        match err {
            TaskError::Validation { errors } => {
                assert_eq!(errors.len(), 3);
                assert!(errors.iter().any(|rule| rule == "Title is required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_accepts_minimal_valid_input() {
        let draft = TaskDraft {
            title: Some("Dentist".to_string()),
            ..TaskDraft::default()
        };
        let input = CreateTaskInput::from_draft(UserId::default(), draft);
        assert!(validate_create(&input).is_ok());
        assert_eq!(input.duration_minutes, 30);
    }

    #[test]
    fn update_rejects_blank_title_patch() {
        let input = UpdateTaskInput {
            title: Some("   ".to_string()),
            ..UpdateTaskInput::default()
        };
        assert!(validate_update(&input).is_err());
    }

    #[test]
    fn turn_requires_message() {
        let input = CreateTurnInput {
            user_id: UserId::default(),
            message: " ".to_string(),
            kind: TurnKind::User,
            data: None,
        };
        assert!(validate_turn(&input).is_err());
    }
}
