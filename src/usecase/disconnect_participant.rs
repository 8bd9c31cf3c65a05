//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 学生退出時の学生数通知、メンター退出時の mentorLeft 通知とルーム解散
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証:メンター退出はルーム全体の解散を引き起こす
//! - 学生の昇格は行わない(観測された仕様に一致)ことを保証
//! - 最後の参加者の退出でルームが静かに破棄されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系:学生の退出と通知
//! - 正常系:メンターの退出、残存参加者への通知、解散
//! - エッジケース:最後の参加者の退出(通知対象なし)、解散済みルームへの切断

use std::sync::Arc;

use crate::{
    domain::{CodeBlockId, ConnectionId, Role},
    infrastructure::dto::websocket::{MentorLeftMessage, MessageType, StudentsCountUpdateMessage},
    ui::state::RoomRegistry,
};

/// Result of processing a departure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 学生が退出し、残りの参加者へ学生数を通知した
    StudentLeft { student_count: usize },
    /// メンターが退出し、残存参加者へ通知してルームを解散した
    MentorLeft { notified: usize },
    /// 最後の参加者が退出し、ルームを静かに破棄した
    RoomEmptied,
    /// ルームは存在しないか、接続は参加者ではなかった(解散後の切断で正常)
    AlreadyGone,
}

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// アクティブなルームのレジストリ
    registry: Arc<RoomRegistry>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 参加者切断を実行
    ///
    /// トランスポート層が検知したあらゆる切断(明示的な退出・突然の切断)は
    /// この処理に集約されます。
    ///
    /// # Arguments
    ///
    /// * `code_block_id` - 接続が参加していたコードブロックの ID
    /// * `connection_id` - 切断した接続の ID
    pub async fn execute(
        &self,
        code_block_id: &CodeBlockId,
        connection_id: &ConnectionId,
    ) -> LeaveOutcome {
        let Some(room_arc) = self.registry.get(code_block_id).await else {
            return LeaveOutcome::AlreadyGone;
        };

        let outcome = {
            let mut state = room_arc.lock().await;
            state.clients.remove(connection_id);
            let Some(role) = state.room.remove_participant(connection_id) else {
                return LeaveOutcome::AlreadyGone;
            };

            match role {
                Role::Mentor => {
                    if state.room.is_empty() {
                        state.dissolved = true;
                        LeaveOutcome::RoomEmptied
                    } else {
                        // 残存参加者へ通知してから全接続を排除して解散する。
                        // 送信キューを落とすと転送タスクが終了し、ソケットは
                        // 通常の切断経路で閉じられる。
                        let left_msg = MentorLeftMessage {
                            r#type: MessageType::MentorLeft,
                        };
                        let left_json = serde_json::to_string(&left_msg).unwrap();
                        let notified = state.broadcast(&left_json);
                        state.clients.clear();
                        state.dissolved = true;
                        LeaveOutcome::MentorLeft { notified }
                    }
                }
                Role::Student => {
                    if state.room.is_empty() {
                        state.dissolved = true;
                        LeaveOutcome::RoomEmptied
                    } else {
                        let student_count = state.room.student_count();
                        let count_msg = StudentsCountUpdateMessage {
                            r#type: MessageType::StudentsCountUpdate,
                            count: student_count,
                        };
                        let count_json = serde_json::to_string(&count_msg).unwrap();
                        state.broadcast(&count_json);
                        LeaveOutcome::StudentLeft { student_count }
                    }
                }
            }
        };

        // 解散したルームはレジストリから取り除く
        if matches!(
            outcome,
            LeaveOutcome::MentorLeft { .. } | LeaveOutcome::RoomEmptied
        ) {
            self.registry.remove_if_same(code_block_id, &room_arc).await;
        }

        outcome
    }
}
