//! Orchestration layer: one inbound chat message in, one structured
//! outcome out. Stateless across requests; everything durable lives in
//! the store.

use crate::conflict::{find_time_conflicts, suggest_alternative_times};
use crate::conversations::ConversationRepository;
use crate::error::{ChatError, TaskmateError};
use crate::prompt;
use crate::store::Store;
use crate::tasks::{find_by_identifier, TaskRepository};
use crate::types::chat::{
    ChatInput, ChatOutcome, ChatPayload, ConflictReport, ResolveConflictInput, MAX_MESSAGE_LEN,
};
use crate::types::conversation::ConversationTurn;
use crate::types::enums::{ChatIntent, TurnKind};
use crate::types::ids::{TaskId, UserId};
use crate::types::io::{
    CreateTaskInput, CreateTurnInput, UpdateTaskInput, DEFAULT_DURATION_MINUTES,
};
use crate::types::task::{Task, TaskDraft};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use std::sync::Arc;
use tm_ai::reply::{generate_reply, AiAction, AiFailure, AiMessage};
use tm_ai::Generator;

pub struct Taskmate<S: Store> {
    store: S,
    generator: Arc<dyn Generator>,
}

impl<S: Store> Taskmate<S> {
    pub fn new(store: S, generator: Arc<dyn Generator>) -> Self {
        Self { store, generator }
    }

    pub fn tasks(&self) -> TasksApi<'_, S> {
        TasksApi { core: self }
    }

    pub fn conversations(&self) -> ConversationsApi<'_, S> {
        ConversationsApi { core: self }
    }

    pub fn chat(&self) -> ChatApi<'_, S> {
        ChatApi { core: self }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub struct TasksApi<'a, S: Store> {
    core: &'a Taskmate<S>,
}

impl<S: Store> TasksApi<'_, S> {
    pub fn list(&self, user_id: &UserId) -> Result<Vec<Task>, TaskmateError> {
        Ok(self.core.store.tasks().find_by_user(user_id)?)
    }

    pub fn get(&self, user_id: &UserId, id: &TaskId) -> Result<Task, TaskmateError> {
        self.core
            .store
            .tasks()
            .find_by_id(user_id, id)?
            .ok_or(crate::error::TaskError::NotFound.into())
    }

    pub fn create(&self, input: CreateTaskInput) -> Result<Task, TaskmateError> {
        Ok(self.core.store.tasks().create(input)?)
    }

    pub fn update(
        &self,
        user_id: &UserId,
        id: &TaskId,
        input: UpdateTaskInput,
    ) -> Result<Task, TaskmateError> {
        Ok(self.core.store.tasks().update(user_id, id, input)?)
    }

    pub fn delete(&self, user_id: &UserId, id: &TaskId) -> Result<(), TaskmateError> {
        Ok(self.core.store.tasks().delete(user_id, id)?)
    }
}

pub struct ConversationsApi<'a, S: Store> {
    core: &'a Taskmate<S>,
}

impl<S: Store> ConversationsApi<'_, S> {
    pub fn history(&self, user_id: &UserId) -> Result<Vec<ConversationTurn>, TaskmateError> {
        Ok(self.core.store.conversations().recent_by_user(user_id)?)
    }
}

pub struct ChatApi<'a, S: Store> {
    core: &'a Taskmate<S>,
}

impl<S: Store> ChatApi<'_, S> {
    /// Runs the full per-request pipeline: validate, record the user
    /// turn, consult the generator, apply the implied task mutation, and
    /// record the assistant turn. A failure at any step aborts the rest;
    /// already-written turns are left in place.
    pub async fn process(
        &self,
        input: ChatInput,
        now: DateTime<Utc>,
    ) -> Result<ChatOutcome, TaskmateError> {
        let message = input.message.trim().to_string();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage.into());
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ChatError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            }
            .into());
        }
        let intent = input
            .intent
            .as_deref()
            .map(|raw| {
                ChatIntent::from_str(raw).map_err(|value| ChatError::InvalidIntent { value })
            })
            .transpose()?;

        self.core.store.conversations().create(CreateTurnInput {
            user_id: input.user_id.clone(),
            message: message.clone(),
            kind: TurnKind::User,
            data: None,
        })?;

        let existing = self.core.store.tasks().find_by_user(&input.user_id)?;
        let composed = prompt::compose(now, intent, &existing, &message);
        let reply = generate_reply(self.core.generator.as_ref(), &composed).await?;

        let outcome = match reply.action {
            AiAction::CreateTask => self.apply_create(&input.user_id, &reply, &existing)?,
            AiAction::UpdateTask => self.apply_update(&input.user_id, &reply, &existing)?,
            _ => informational_outcome(&reply)?,
        };

        self.core.store.conversations().create(CreateTurnInput {
            user_id: input.user_id,
            message: outcome.message.clone(),
            kind: TurnKind::Assistant,
            data: outcome.payload.to_value(),
        })?;

        Ok(outcome)
    }

    /// Schedules a previously conflicting proposal at a caller-chosen
    /// time. The conflict check reruns against a fresh snapshot; a slot
    /// taken in the meantime yields another conflict outcome instead of a
    /// double booking.
    pub fn resolve_conflict(
        &self,
        input: ResolveConflictInput,
    ) -> Result<ChatOutcome, TaskmateError> {
        let mut draft = input.task;
        draft.start_date = Some(input.start_date);

        let existing = self.core.store.tasks().find_by_user(&input.user_id)?;
        let duration = draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        let conflicts = find_time_conflicts(input.start_date, duration, &existing);
        if !conflicts.is_empty() {
            return Ok(conflict_outcome(
                draft,
                conflicts,
                input.start_date,
                duration,
                &existing,
            ));
        }

        let task = self
            .core
            .store
            .tasks()
            .create(CreateTaskInput::from_draft(input.user_id, draft))?;
        Ok(ChatOutcome {
            action: AiAction::CreateTask,
            message: "Conflict resolved successfully".to_string(),
            suggestions: Vec::new(),
            payload: ChatPayload::Task(task),
        })
    }

    fn apply_create(
        &self,
        user_id: &UserId,
        reply: &AiMessage,
        existing: &[Task],
    ) -> Result<ChatOutcome, TaskmateError> {
        let draft = first_draft(reply)?;

        if let Some(start) = draft.start_date {
            let duration = draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
            let conflicts = find_time_conflicts(start, duration, existing);
            if !conflicts.is_empty() {
                return Ok(conflict_outcome(draft, conflicts, start, duration, existing));
            }
        }

        let task = self
            .core
            .store
            .tasks()
            .create(CreateTaskInput::from_draft(user_id.clone(), draft))?;
        Ok(ChatOutcome {
            action: AiAction::CreateTask,
            message: reply.message.clone(),
            suggestions: reply.suggestions.clone(),
            payload: ChatPayload::Task(task),
        })
    }

    fn apply_update(
        &self,
        user_id: &UserId,
        reply: &AiMessage,
        existing: &[Task],
    ) -> Result<ChatOutcome, TaskmateError> {
        let draft = first_draft(reply)?;

        let Some(target) = draft
            .task_id
            .as_deref()
            .and_then(|identifier| find_by_identifier(existing, identifier))
        else {
            return Ok(clarification_outcome());
        };
        let target_id = target.id.clone();

        let updated = self.core.store.tasks().update(
            user_id,
            &target_id,
            UpdateTaskInput::from_draft(draft),
        )?;
        Ok(ChatOutcome {
            action: AiAction::UpdateTask,
            message: reply.message.clone(),
            suggestions: reply.suggestions.clone(),
            payload: ChatPayload::Task(updated),
        })
    }
}

fn first_draft(reply: &AiMessage) -> Result<TaskDraft, AiFailure> {
    let value = reply
        .task_data
        .first()
        .ok_or_else(|| AiFailure::missing_field("task_data"))?;
    decode_draft(value)
}

fn decode_draft(value: &serde_json::Value) -> Result<TaskDraft, AiFailure> {
    serde_json::from_value(value.clone())
        .map_err(|err| AiFailure::bad_shape(format!("task_data entry is malformed: {err}")))
}

fn informational_outcome(reply: &AiMessage) -> Result<ChatOutcome, TaskmateError> {
    let payload = if reply.task_data.is_empty() {
        ChatPayload::None
    } else {
        let drafts = reply
            .task_data
            .iter()
            .map(decode_draft)
            .collect::<Result<Vec<_>, _>>()?;
        ChatPayload::Drafts(drafts)
    };
    Ok(ChatOutcome {
        action: reply.action,
        message: reply.message.clone(),
        suggestions: reply.suggestions.clone(),
        payload,
    })
}

fn conflict_outcome(
    draft: TaskDraft,
    conflicts: Vec<Task>,
    start: DateTime<Utc>,
    duration_minutes: u32,
    existing: &[Task],
) -> ChatOutcome {
    let alternatives = suggest_alternative_times(start, duration_minutes, existing);
    let suggestions: Vec<String> = alternatives
        .iter()
        .map(|slot| slot.description.clone())
        .collect();
    let count = conflicts.len();
    let plural = if count == 1 { "" } else { "s" };
    let message = if alternatives.is_empty() {
        format!("That time overlaps {count} scheduled task{plural}, and no nearby slot is free. Try a different time.")
    } else {
        format!("That time overlaps {count} scheduled task{plural}. Here are some free slots.")
    };
    ChatOutcome {
        action: AiAction::ConflictResolution,
        message,
        suggestions,
        payload: ChatPayload::Conflict(ConflictReport {
            has_conflicts: true,
            conflicts,
            proposed_task: draft,
            alternatives,
        }),
    }
}

fn clarification_outcome() -> ChatOutcome {
    ChatOutcome {
        action: AiAction::Query,
        message: "I couldn't tell which task you meant. Could you give the exact title or task id?"
            .to_string(),
        suggestions: vec![
            "Use the exact task title".to_string(),
            "Include the task id from your task list".to_string(),
        ],
        payload: ChatPayload::None,
    }
}
