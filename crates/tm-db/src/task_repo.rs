use crate::codec::{
    enum_from_sql, enum_to_sql, json_from_sql, json_to_sql, ts_from_sql, ts_to_sql,
};
use crate::schema;
use rusqlite::{params, Connection, Row};
use std::fmt::Display;
use std::path::PathBuf;
use tm_core::error::TaskError;
use tm_core::tasks::TaskRepository;
use tm_core::types::{CreateTaskInput, Task, TaskId, UpdateTaskInput, UserId};
use tm_core::validation::{validate_create, validate_update};

const TASK_COLUMNS: &str = "id, user_id, title, description, category, priority, start_date, \
     duration_minutes, status, location, notes, recurrence, reminders, collaboration, \
     created_at, updated_at";

/// Task rows keyed by `(user_id, id)`. Every statement filters on
/// `user_id`, so one user's namespace can never leak into another's.
pub struct TaskRepo {
    path: PathBuf,
}

impl TaskRepo {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn conn(&self) -> Result<Connection, TaskError> {
        schema::open(&self.path).map_err(storage)
    }
}

fn storage(err: impl Display) -> TaskError {
    TaskError::Storage {
        message: err.to_string(),
    }
}

impl TaskRepository for TaskRepo {
    fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY created_at"
            ))
            .map_err(storage)?;
        let mut rows = stmt.query([user_id.as_str()]).map_err(storage)?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().map_err(storage)? {
            tasks.push(map_task_row(row)?);
        }
        Ok(tasks)
    }

    fn find_by_id(&self, user_id: &UserId, id: &TaskId) -> Result<Option<Task>, TaskError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 AND id = ?2"
            ))
            .map_err(storage)?;
        let mut rows = stmt
            .query([user_id.as_str(), id.as_str()])
            .map_err(storage)?;
        let Some(row) = rows.next().map_err(storage)? else {
            return Ok(None);
        };
        map_task_row(row).map(Some)
    }

    fn create(&self, input: CreateTaskInput) -> Result<Task, TaskError> {
        validate_create(&input)?;

        let now = chrono::Utc::now();
        let task = Task {
            id: TaskId::generate(),
            user_id: input.user_id,
            title: input.title,
            description: input.description,
            category: input.category,
            priority: input.priority,
            start_date: input.start_date,
            duration_minutes: input.duration_minutes,
            status: input.status,
            location: input.location,
            notes: input.notes,
            recurrence: input.recurrence,
            reminders: input.reminders,
            collaboration: input.collaboration,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO tasks ({TASK_COLUMNS}) VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
            ),
            params![
                task.id.as_str(),
                task.user_id.as_str(),
                task.title,
                task.description,
                enum_to_sql(&task.category).map_err(storage)?,
                enum_to_sql(&task.priority).map_err(storage)?,
                task.start_date.map(|value| ts_to_sql(&value)),
                i64::from(task.duration_minutes),
                enum_to_sql(&task.status).map_err(storage)?,
                task.location,
                task.notes,
                json_to_sql(&task.recurrence).map_err(storage)?,
                json_to_sql(&task.reminders).map_err(storage)?,
                json_to_sql(&task.collaboration).map_err(storage)?,
                ts_to_sql(&task.created_at),
                ts_to_sql(&task.updated_at),
            ],
        )
        .map_err(storage)?;

        Ok(task)
    }

    fn update(
        &self,
        user_id: &UserId,
        id: &TaskId,
        input: UpdateTaskInput,
    ) -> Result<Task, TaskError> {
        validate_update(&input)?;

        let mut task = self.find_by_id(user_id, id)?.ok_or(TaskError::NotFound)?;
        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(description) = input.description {
            task.description = description;
        }
        if let Some(category) = input.category {
            task.category = category;
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        if let Some(start_date) = input.start_date {
            task.start_date = Some(start_date);
        }
        if let Some(duration) = input.duration_minutes {
            task.duration_minutes = duration;
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        if let Some(location) = input.location {
            task.location = location;
        }
        if let Some(notes) = input.notes {
            task.notes = notes;
        }
        if let Some(recurrence) = input.recurrence {
            task.recurrence = recurrence;
        }
        if let Some(reminders) = input.reminders {
            task.reminders = reminders;
        }
        if let Some(collaboration) = input.collaboration {
            task.collaboration = collaboration;
        }
        task.updated_at = chrono::Utc::now();

        let conn = self.conn()?;
        conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, category = ?3, priority = ?4, \
             start_date = ?5, duration_minutes = ?6, status = ?7, location = ?8, notes = ?9, \
             recurrence = ?10, reminders = ?11, collaboration = ?12, updated_at = ?13 \
             WHERE user_id = ?14 AND id = ?15",
            params![
                task.title,
                task.description,
                enum_to_sql(&task.category).map_err(storage)?,
                enum_to_sql(&task.priority).map_err(storage)?,
                task.start_date.map(|value| ts_to_sql(&value)),
                i64::from(task.duration_minutes),
                enum_to_sql(&task.status).map_err(storage)?,
                task.location,
                task.notes,
                json_to_sql(&task.recurrence).map_err(storage)?,
                json_to_sql(&task.reminders).map_err(storage)?,
                json_to_sql(&task.collaboration).map_err(storage)?,
                ts_to_sql(&task.updated_at),
                user_id.as_str(),
                task.id.as_str(),
            ],
        )
        .map_err(storage)?;

        // Read-after-write: callers get the row as the store now holds it.
        self.find_by_id(user_id, id)?.ok_or(TaskError::NotFound)
    }

    fn delete(&self, user_id: &UserId, id: &TaskId) -> Result<(), TaskError> {
        let conn = self.conn()?;
        let affected = conn
            .execute(
                "DELETE FROM tasks WHERE user_id = ?1 AND id = ?2",
                [user_id.as_str(), id.as_str()],
            )
            .map_err(storage)?;
        if affected == 0 {
            return Err(TaskError::NotFound);
        }
        Ok(())
    }
}

fn map_task_row(row: &Row<'_>) -> Result<Task, TaskError> {
    let id: String = row.get(0).map_err(storage)?;
    let user_id: String = row.get(1).map_err(storage)?;
    let title: String = row.get(2).map_err(storage)?;
    let description: String = row.get(3).map_err(storage)?;
    let category: String = row.get(4).map_err(storage)?;
    let priority: String = row.get(5).map_err(storage)?;
    let start_date: Option<String> = row.get(6).map_err(storage)?;
    let duration_minutes: i64 = row.get(7).map_err(storage)?;
    let status: String = row.get(8).map_err(storage)?;
    let location: String = row.get(9).map_err(storage)?;
    let notes: String = row.get(10).map_err(storage)?;
    let recurrence: String = row.get(11).map_err(storage)?;
    let reminders: String = row.get(12).map_err(storage)?;
    let collaboration: String = row.get(13).map_err(storage)?;
    let created_at: String = row.get(14).map_err(storage)?;
    let updated_at: String = row.get(15).map_err(storage)?;

    Ok(Task {
        id: TaskId::new(id).map_err(storage)?,
        user_id: UserId::new(user_id).map_err(storage)?,
        title,
        description,
        category: enum_from_sql(&category).map_err(storage)?,
        priority: enum_from_sql(&priority).map_err(storage)?,
        start_date: start_date
            .map(|value| ts_from_sql(&value))
            .transpose()
            .map_err(storage)?,
        duration_minutes: u32::try_from(duration_minutes).map_err(storage)?,
        status: enum_from_sql(&status).map_err(storage)?,
        location,
        notes,
        recurrence: json_from_sql(&recurrence).map_err(storage)?,
        reminders: json_from_sql(&reminders).map_err(storage)?,
        collaboration: json_from_sql(&collaboration).map_err(storage)?,
        created_at: ts_from_sql(&created_at).map_err(storage)?,
        updated_at: ts_from_sql(&updated_at).map_err(storage)?,
    })
}
