//! Core domain models for the collaborative editing application.

use serde::{Deserialize, Serialize};

use super::value_object::{CodeBlockId, CodeContent, ConnectionId, RatingScore, Timestamp};

/// Role assigned to a room participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mentor,
    Student,
}

impl Role {
    /// Wire representation of the role (`"mentor"` / `"student"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mentor => "mentor",
            Role::Student => "student",
        }
    }
}

/// Running rating aggregate for a code block.
///
/// Not room-scoped: it lives on the stored `CodeBlock` and survives room
/// teardown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingAggregate {
    /// Sum of all submitted ratings
    pub total: u64,
    /// Number of submitted ratings
    pub count: u64,
}

impl RatingAggregate {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one rating submission
    pub fn record(&mut self, score: RatingScore) {
        self.total += u64::from(score.value());
        self.count += 1;
    }

    /// Current average rating (0.0 when nothing has been submitted yet)
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total as f64 / self.count as f64
    }
}

/// A code block exercise: the static definition that seeds a room.
///
/// Immutable except for the rating aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Code block identifier
    pub id: CodeBlockId,
    /// Display name shown in the lobby
    pub name: String,
    /// Starting code text every fresh room is seeded with
    pub initial_code: CodeContent,
    /// Target solution text
    pub solution: CodeContent,
    /// Running difficulty rating
    pub rating: RatingAggregate,
}

impl CodeBlock {
    /// Create a new code block with an empty rating aggregate
    pub fn new(
        id: CodeBlockId,
        name: String,
        initial_code: CodeContent,
        solution: CodeContent,
    ) -> Self {
        Self {
            id,
            name,
            initial_code,
            solution,
            rating: RatingAggregate::new(),
        }
    }
}

/// Represents a participant in a collaboration room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Participant identifier (connection id)
    pub id: ConnectionId,
    /// Role assigned at join time; fixed for the connection's lifetime
    pub role: Role,
    /// Timestamp when the participant connected
    pub connected_at: Timestamp,
}

impl Participant {
    /// Create a new participant
    pub fn new(id: ConnectionId, role: Role, connected_at: Timestamp) -> Self {
        Self {
            id,
            role,
            connected_at,
        }
    }
}

/// The live collaboration session bound to one code block.
///
/// Holds the shared code text (last writer wins) and the participant roster.
/// Invariant: at most one mentor; since the mentor's departure dissolves the
/// room, a non-empty room always has its mentor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Code block this room is bound to
    pub code_block_id: CodeBlockId,
    /// Current shared code text
    pub current_code: CodeContent,
    /// Participants currently in the room
    pub participants: Vec<Participant>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new empty room seeded with the code block's initial code
    pub fn new(code_block_id: CodeBlockId, initial_code: CodeContent, created_at: Timestamp) -> Self {
        Self {
            code_block_id,
            current_code: initial_code,
            participants: Vec::new(),
            created_at,
        }
    }

    /// Admit a connection and assign its role.
    ///
    /// The first participant of an empty room becomes the mentor; every
    /// subsequent participant is a student. Roles are never reassigned.
    pub fn join(&mut self, connection_id: ConnectionId, connected_at: Timestamp) -> Role {
        let role = if self.participants.is_empty() {
            Role::Mentor
        } else {
            Role::Student
        };
        self.participants
            .push(Participant::new(connection_id, role, connected_at));
        role
    }

    /// Remove a participant, returning its role when it was present
    pub fn remove_participant(&mut self, connection_id: &ConnectionId) -> Option<Role> {
        let pos = self
            .participants
            .iter()
            .position(|p| &p.id == connection_id)?;
        Some(self.participants.remove(pos).role)
    }

    /// Overwrite the shared code text (last writer wins, no conflict check)
    pub fn apply_edit(&mut self, code: CodeContent) {
        self.current_code = code;
    }

    /// Get a participant by connection id
    pub fn get_participant(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == connection_id)
    }

    /// Whether a mentor is currently present
    pub fn has_mentor(&self) -> bool {
        self.participants.iter().any(|p| p.role == Role::Mentor)
    }

    /// Number of participants with the student role
    pub fn student_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.role == Role::Student)
            .count()
    }

    /// Whether the room has no participants left
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::ConnectionIdFactory;

    fn test_room() -> Room {
        Room::new(
            CodeBlockId::new("async-case".to_string()).unwrap(),
            CodeContent::new("// start".to_string()).unwrap(),
            Timestamp::new(0),
        )
    }

    #[test]
    fn test_room_new() {
        // テスト項目: 新しい Room は空で、初期コードがセットされる
        // given (前提条件):
        let code_block_id = CodeBlockId::new("async-case".to_string()).unwrap();
        let initial_code = CodeContent::new("// start".to_string()).unwrap();

        // when (操作):
        let room = Room::new(code_block_id.clone(), initial_code.clone(), Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(room.code_block_id, code_block_id);
        assert_eq!(room.current_code, initial_code);
        assert_eq!(room.participants.len(), 0);
        assert!(!room.has_mentor());
    }

    #[test]
    fn test_room_first_joiner_is_mentor() {
        // テスト項目: 空の Room への最初の参加者だけがメンターになる
        // given (前提条件):
        let mut room = test_room();

        // when (操作):
        let first = room.join(ConnectionIdFactory::generate(), Timestamp::new(1000));
        let second = room.join(ConnectionIdFactory::generate(), Timestamp::new(2000));
        let third = room.join(ConnectionIdFactory::generate(), Timestamp::new(3000));

        // then (期待する結果):
        assert_eq!(first, Role::Mentor);
        assert_eq!(second, Role::Student);
        assert_eq!(third, Role::Student);
        assert!(room.has_mentor());
    }

    #[test]
    fn test_room_student_count_excludes_mentor() {
        // テスト項目: 学生数 = 参加者数 - (メンターがいれば 1)
        // given (前提条件):
        let mut room = test_room();
        room.join(ConnectionIdFactory::generate(), Timestamp::new(1000));
        room.join(ConnectionIdFactory::generate(), Timestamp::new(2000));
        room.join(ConnectionIdFactory::generate(), Timestamp::new(3000));

        // then (期待する結果):
        assert_eq!(room.participants.len(), 3);
        assert_eq!(room.student_count(), 2);
        assert_eq!(
            room.student_count(),
            room.participants.len() - usize::from(room.has_mentor())
        );
    }

    #[test]
    fn test_room_remove_participant_returns_role() {
        // テスト項目: 参加者を削除するとそのロールが返される
        // given (前提条件):
        let mut room = test_room();
        let mentor_id = ConnectionIdFactory::generate();
        let student_id = ConnectionIdFactory::generate();
        room.join(mentor_id.clone(), Timestamp::new(1000));
        room.join(student_id.clone(), Timestamp::new(2000));

        // when (操作):
        let student_role = room.remove_participant(&student_id);
        let mentor_role = room.remove_participant(&mentor_id);

        // then (期待する結果):
        assert_eq!(student_role, Some(Role::Student));
        assert_eq!(mentor_role, Some(Role::Mentor));
        assert!(room.is_empty());
    }

    #[test]
    fn test_room_remove_nonexistent_participant() {
        // テスト項目: 存在しない参加者の削除は None を返す
        // given (前提条件):
        let mut room = test_room();
        room.join(ConnectionIdFactory::generate(), Timestamp::new(1000));

        // when (操作):
        let result = room.remove_participant(&ConnectionIdFactory::generate());

        // then (期待する結果):
        assert_eq!(result, None);
        assert_eq!(room.participants.len(), 1);
    }

    #[test]
    fn test_room_apply_edit_overwrites() {
        // テスト項目: 編集は共有コードを無条件に上書きする
        // given (前提条件):
        let mut room = test_room();

        // when (操作):
        room.apply_edit(CodeContent::new("x = 1".to_string()).unwrap());
        room.apply_edit(CodeContent::new("x = 2".to_string()).unwrap());

        // then (期待する結果): 最後の書き込みが残る
        assert_eq!(room.current_code.as_str(), "x = 2");
    }

    #[test]
    fn test_room_apply_identical_edit_twice() {
        // テスト項目: 同一内容の編集を2回適用してもエラーにならない
        // given (前提条件):
        let mut room = test_room();
        let code = CodeContent::new("x = 1".to_string()).unwrap();

        // when (操作):
        room.apply_edit(code.clone());
        room.apply_edit(code.clone());

        // then (期待する結果):
        assert_eq!(room.current_code, code);
    }

    #[test]
    fn test_room_get_participant() {
        // テスト項目: 接続 ID で参加者を取得できる
        // given (前提条件):
        let mut room = test_room();
        let connection_id = ConnectionIdFactory::generate();
        room.join(connection_id.clone(), Timestamp::new(1000));

        // when (操作):
        let participant = room.get_participant(&connection_id);

        // then (期待する結果):
        assert!(participant.is_some());
        assert_eq!(participant.unwrap().role, Role::Mentor);
    }

    #[test]
    fn test_rating_aggregate_average_empty() {
        // テスト項目: 評価が無いとき平均は 0.0
        // given (前提条件):
        let aggregate = RatingAggregate::new();

        // then (期待する結果):
        assert_eq!(aggregate.average(), 0.0);
    }

    #[test]
    fn test_rating_aggregate_running_average() {
        // テスト項目: 4 を記録すると平均 4.0、続けて 2 を記録すると平均 3.0
        // given (前提条件):
        let mut aggregate = RatingAggregate::new();

        // when (操作):
        aggregate.record(RatingScore::new(4).unwrap());
        let first = aggregate.average();
        aggregate.record(RatingScore::new(2).unwrap());
        let second = aggregate.average();

        // then (期待する結果):
        assert_eq!(first, 4.0);
        assert_eq!(second, 3.0);
        assert_eq!(aggregate.total, 6);
        assert_eq!(aggregate.count, 2);
    }

    #[test]
    fn test_code_block_new_has_empty_rating() {
        // テスト項目: 新しい CodeBlock の評価集計は空
        // given (前提条件):
        let block = CodeBlock::new(
            CodeBlockId::new("async-case".to_string()).unwrap(),
            "Async case".to_string(),
            CodeContent::new("// initial".to_string()).unwrap(),
            CodeContent::new("// solution".to_string()).unwrap(),
        );

        // then (期待する結果):
        assert_eq!(block.rating.count, 0);
        assert_eq!(block.rating.average(), 0.0);
    }
}
