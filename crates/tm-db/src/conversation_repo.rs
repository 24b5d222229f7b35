use crate::codec::{enum_from_sql, enum_to_sql, json_from_sql, json_to_sql, ts_from_sql, ts_to_sql};
use crate::schema;
use rusqlite::{params, Connection, Row};
use std::fmt::Display;
use std::path::PathBuf;
use tm_core::conversations::{ConversationRepository, RECENT_TURN_LIMIT};
use tm_core::error::ConversationError;
use tm_core::types::{ConversationId, ConversationTurn, CreateTurnInput, UserId};
use tm_core::validation::validate_turn;

/// Append-only transcript rows. Reads pull the newest window and restore
/// chronological order before returning.
pub struct ConversationRepo {
    path: PathBuf,
}

impl ConversationRepo {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn conn(&self) -> Result<Connection, ConversationError> {
        schema::open(&self.path).map_err(storage)
    }
}

fn storage(err: impl Display) -> ConversationError {
    ConversationError::Storage {
        message: err.to_string(),
    }
}

impl ConversationRepository for ConversationRepo {
    fn recent_by_user(&self, user_id: &UserId) -> Result<Vec<ConversationTurn>, ConversationError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, message, timestamp, kind, data FROM conversations \
                 WHERE user_id = ?1 ORDER BY timestamp DESC LIMIT ?2",
            )
            .map_err(storage)?;
        let limit = i64::try_from(RECENT_TURN_LIMIT).map_err(storage)?;
        let mut rows = stmt
            .query(params![user_id.as_str(), limit])
            .map_err(storage)?;
        let mut turns = Vec::new();
        while let Some(row) = rows.next().map_err(storage)? {
            turns.push(map_turn_row(row)?);
        }
        turns.reverse();
        Ok(turns)
    }

    fn create(&self, input: CreateTurnInput) -> Result<ConversationTurn, ConversationError> {
        validate_turn(&input)?;

        let turn = ConversationTurn {
            id: ConversationId::generate(),
            user_id: input.user_id,
            message: input.message,
            timestamp: chrono::Utc::now(),
            kind: input.kind,
            data: input.data,
        };

        let data = turn
            .data
            .as_ref()
            .map(json_to_sql)
            .transpose()
            .map_err(storage)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO conversations (id, user_id, message, timestamp, kind, data) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                turn.id.as_str(),
                turn.user_id.as_str(),
                turn.message,
                ts_to_sql(&turn.timestamp),
                enum_to_sql(&turn.kind).map_err(storage)?,
                data,
            ],
        )
        .map_err(storage)?;

        Ok(turn)
    }
}

fn map_turn_row(row: &Row<'_>) -> Result<ConversationTurn, ConversationError> {
    let id: String = row.get(0).map_err(storage)?;
    let user_id: String = row.get(1).map_err(storage)?;
    let message: String = row.get(2).map_err(storage)?;
    let timestamp: String = row.get(3).map_err(storage)?;
    let kind: String = row.get(4).map_err(storage)?;
    let data: Option<String> = row.get(5).map_err(storage)?;

    Ok(ConversationTurn {
        id: ConversationId::new(id).map_err(storage)?,
        user_id: UserId::new(user_id).map_err(storage)?,
        message,
        timestamp: ts_from_sql(&timestamp).map_err(storage)?,
        kind: enum_from_sql(&kind).map_err(storage)?,
        data: data.map(|raw| json_from_sql(&raw)).transpose().map_err(storage)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DbStore;
    use tm_core::types::TurnKind;
    use tm_core::Store;

    fn test_store() -> DbStore {
        DbStore::open(schema::test_db_path()).unwrap()
    }

    fn turn(message: &str, kind: TurnKind) -> CreateTurnInput {
        CreateTurnInput {
            user_id: UserId::default(),
            message: message.to_string(),
            kind,
            data: None,
        }
    }

    #[test]
    fn history_comes_back_in_chronological_order() {
        let store = test_store();
        store
            .conversations()
            .create(turn("first", TurnKind::User))
            .unwrap();
        store
            .conversations()
            .create(turn("second", TurnKind::Assistant))
            .unwrap();
        store
            .conversations()
            .create(turn("third", TurnKind::User))
            .unwrap();

        let history = store
            .conversations()
            .recent_by_user(&UserId::default())
            .unwrap();

        let messages: Vec<&str> = history.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn history_window_keeps_only_the_newest_turns() {
        let store = test_store();
        for n in 0..(RECENT_TURN_LIMIT + 5) {
            store
                .conversations()
                .create(turn(&format!("msg {n}"), TurnKind::User))
                .unwrap();
        }

        let history = store
            .conversations()
            .recent_by_user(&UserId::default())
            .unwrap();

        assert_eq!(history.len(), RECENT_TURN_LIMIT);
        assert_eq!(history[0].message, "msg 5");
        assert_eq!(history.last().unwrap().message, format!("msg {}", RECENT_TURN_LIMIT + 4));
    }

    #[test]
    fn payload_survives_the_round_trip() {
        let store = test_store();
        let payload = serde_json::json!({"title": "Dentist", "duration": 60});
        store
            .conversations()
            .create(CreateTurnInput {
                user_id: UserId::default(),
                message: "Scheduled it".to_string(),
                kind: TurnKind::Assistant,
                data: Some(payload.clone()),
            })
            .unwrap();

        let history = store
            .conversations()
            .recent_by_user(&UserId::default())
            .unwrap();
        assert_eq!(history[0].data.as_ref(), Some(&payload));
    }

    #[test]
    fn empty_message_is_rejected_before_the_write() {
        let store = test_store();
        let err = store
            .conversations()
            .create(turn("  ", TurnKind::User))
            .unwrap_err();
        assert!(matches!(err, ConversationError::Validation { .. }));
        assert!(store
            .conversations()
            .recent_by_user(&UserId::default())
            .unwrap()
            .is_empty());
    }
}
