//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ロール割り当て(最初の参加者のみメンター)、参加スナップショット送信
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証:ルームはコードブロックごとに一つだけ作られる
//! - 後から参加した接続が最新のコード(編集後)を受け取ることを保証
//! - 解散済みルームを掴んだ参加が新しいルームとして作り直されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系:最初の参加(メンター)、以降の参加(学生)
//! - 異常系:存在しないコードブロック ID での参加試行
//! - エッジケース:解散直後の再参加

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{CodeBlockId, CodeBlockRepository, ConnectionId, Role, Room, Timestamp},
    infrastructure::dto::websocket::{
        CodeUpdateMessage, MessageType, RoleMessage, StudentsCountUpdateMessage,
    },
    time::get_unix_timestamp_millis,
    ui::state::{ClientInfo, RoomRegistry},
};

use super::error::JoinError;

/// Result of a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    /// Role assigned to the joining connection
    pub role: Role,
    /// Student count after the join
    pub student_count: usize,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn CodeBlockRepository>,
    /// アクティブなルームのレジストリ
    registry: Arc<RoomRegistry>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn CodeBlockRepository>, registry: Arc<RoomRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `code_block_id` - 参加するコードブロックの ID
    /// * `connection_id` - 参加する接続の ID
    /// * `sender` - この接続への送信キュー
    ///
    /// # Returns
    ///
    /// * `Ok(JoinedRoom)` - 割り当てられたロールと学生数
    /// * `Err(JoinError)` - 参加失敗
    pub async fn execute(
        &self,
        code_block_id: &CodeBlockId,
        connection_id: &ConnectionId,
        sender: mpsc::Sender<String>,
    ) -> Result<JoinedRoom, JoinError> {
        // 1. CodeBlock を取得(存在しない ID は NotFound)
        let code_block = self
            .repository
            .get_code_block(code_block_id)
            .await
            .map_err(|_| JoinError::CodeBlockNotFound(code_block_id.to_string()))?;

        let connected_at = get_unix_timestamp_millis();

        // 2. ルームを取得または作成(作成はレジストリのロックで直列化される)。
        //    解散済みルームを掴んだ場合はエントリを取り除いて作り直す。
        loop {
            let room_arc = self
                .registry
                .get_or_create(code_block_id, || {
                    Room::new(
                        code_block_id.clone(),
                        code_block.initial_code.clone(),
                        Timestamp::new(connected_at),
                    )
                })
                .await;
            let mut state = room_arc.lock().await;
            if state.dissolved {
                drop(state);
                self.registry.remove_if_same(code_block_id, &room_arc).await;
                continue;
            }

            // 3. ロールを割り当てて送信キューを登録
            let role = state.room.join(connection_id.clone(), Timestamp::new(connected_at));
            state.clients.insert(
                connection_id.clone(),
                ClientInfo {
                    sender,
                    connected_at,
                },
            );

            // 4. 参加者本人へロールと現在のコードを送信(参加スナップショット)。
            //    ルームのロックを保持したまま積むので、後続のブロードキャストに
            //    追い越されることはない。
            let role_msg = RoleMessage {
                r#type: MessageType::Role,
                role: role.as_str().to_string(),
            };
            let role_json = serde_json::to_string(&role_msg).unwrap();
            state.send_to(connection_id, &role_json);

            let snapshot_msg = CodeUpdateMessage {
                r#type: MessageType::CodeUpdate,
                code: state.room.current_code.as_str().to_string(),
            };
            let snapshot_json = serde_json::to_string(&snapshot_msg).unwrap();
            state.send_to(connection_id, &snapshot_json);

            // 5. 全参加者(本人含む)へ学生数を通知
            let student_count = state.room.student_count();
            let count_msg = StudentsCountUpdateMessage {
                r#type: MessageType::StudentsCountUpdate,
                count: student_count,
            };
            let count_json = serde_json::to_string(&count_msg).unwrap();
            state.broadcast(&count_json);

            return Ok(JoinedRoom {
                role,
                student_count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{CodeContent, ConnectionIdFactory, repository::MockCodeBlockRepository},
        infrastructure::{repository::InMemoryCodeBlockRepository, seed::default_code_blocks},
        ui::state::SEND_QUEUE_CAPACITY,
        usecase::{ApplyEditUseCase, DisconnectParticipantUseCase},
    };

    fn create_test_usecase() -> (JoinRoomUseCase, Arc<RoomRegistry>) {
        let repository = Arc::new(InMemoryCodeBlockRepository::new(default_code_blocks()));
        let registry = Arc::new(RoomRegistry::new());
        (
            JoinRoomUseCase::new(repository, registry.clone()),
            registry,
        )
    }

    fn async_case_id() -> CodeBlockId {
        CodeBlockId::new("async-case".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_first_joiner_is_mentor() {
        // テスト項目: 空のルームへの最初の参加者がメンターになり、以降は学生
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let id = async_case_id();
        let (tx1, mut rx1) = mpsc::channel(SEND_QUEUE_CAPACITY);
        let (tx2, mut rx2) = mpsc::channel(SEND_QUEUE_CAPACITY);

        // when (操作):
        let first = usecase
            .execute(&id, &ConnectionIdFactory::generate(), tx1)
            .await
            .unwrap();
        let second = usecase
            .execute(&id, &ConnectionIdFactory::generate(), tx2)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(first.role, Role::Mentor);
        assert_eq!(first.student_count, 0);
        assert_eq!(second.role, Role::Student);
        assert_eq!(second.student_count, 1);
        assert_eq!(registry.room_count().await, 1);

        // 最初の参加者はロール・スナップショット・学生数 0 と 1 を受信する
        let role: serde_json::Value =
            serde_json::from_str(&rx1.recv().await.unwrap()).unwrap();
        assert_eq!(role["type"], "role");
        assert_eq!(role["role"], "mentor");
        let snapshot: serde_json::Value =
            serde_json::from_str(&rx1.recv().await.unwrap()).unwrap();
        assert_eq!(snapshot["type"], "codeUpdate");
        let count0: serde_json::Value =
            serde_json::from_str(&rx1.recv().await.unwrap()).unwrap();
        assert_eq!(count0["type"], "studentsCountUpdate");
        assert_eq!(count0["count"], 0);
        let count1: serde_json::Value =
            serde_json::from_str(&rx1.recv().await.unwrap()).unwrap();
        assert_eq!(count1["count"], 1);

        // 2 人目はロール(student)を受信する
        let role2: serde_json::Value =
            serde_json::from_str(&rx2.recv().await.unwrap()).unwrap();
        assert_eq!(role2["role"], "student");
    }

    #[tokio::test]
    async fn test_join_snapshot_contains_latest_edit() {
        // テスト項目: 編集後に参加した接続は初期コードではなく最新の編集内容を受け取る
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let id = async_case_id();
        let mentor = ConnectionIdFactory::generate();
        let (tx1, _rx1) = mpsc::channel(SEND_QUEUE_CAPACITY);
        usecase.execute(&id, &mentor, tx1).await.unwrap();

        // メンターが編集
        let edit_usecase = ApplyEditUseCase::new(registry.clone());
        edit_usecase
            .execute(&id, &mentor, CodeContent::new("x = 1".to_string()).unwrap())
            .await
            .unwrap();

        // when (操作): 学生が参加
        let (tx2, mut rx2) = mpsc::channel(SEND_QUEUE_CAPACITY);
        usecase
            .execute(&id, &ConnectionIdFactory::generate(), tx2)
            .await
            .unwrap();

        // then (期待する結果): スナップショットは最新の編集内容
        let _role = rx2.recv().await.unwrap();
        let snapshot: serde_json::Value =
            serde_json::from_str(&rx2.recv().await.unwrap()).unwrap();
        assert_eq!(snapshot["type"], "codeUpdate");
        assert_eq!(snapshot["code"], "x = 1");
    }

    #[tokio::test]
    async fn test_join_unknown_code_block_fails() {
        // テスト項目: 存在しないコードブロック ID での参加は NotFound になる
        // given (前提条件): 空のリポジトリ(モック)
        let mut mock = MockCodeBlockRepository::new();
        mock.expect_get_code_block().returning(|id| {
            Err(crate::domain::RepositoryError::CodeBlockNotFound(
                id.to_string(),
            ))
        });
        let registry = Arc::new(RoomRegistry::new());
        let usecase = JoinRoomUseCase::new(Arc::new(mock), registry.clone());
        let (tx, _rx) = mpsc::channel(SEND_QUEUE_CAPACITY);

        // when (操作):
        let result = usecase
            .execute(
                &CodeBlockId::new("nonexistent".to_string()).unwrap(),
                &ConnectionIdFactory::generate(),
                tx,
            )
            .await;

        // then (期待する結果): ルームは作られない
        assert_eq!(
            result,
            Err(JoinError::CodeBlockNotFound("nonexistent".to_string()))
        );
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_rejoin_after_dissolution_creates_fresh_room() {
        // テスト項目: 解散後の再参加は初期コードの新しいルームを作り、参加者はメンターになる
        // given (前提条件): メンターと学生が参加し、編集後にメンターが退出して解散
        let (usecase, registry) = create_test_usecase();
        let id = async_case_id();
        let mentor = ConnectionIdFactory::generate();
        let student = ConnectionIdFactory::generate();
        let (tx1, _rx1) = mpsc::channel(SEND_QUEUE_CAPACITY);
        let (tx2, _rx2) = mpsc::channel(SEND_QUEUE_CAPACITY);
        usecase.execute(&id, &mentor, tx1).await.unwrap();
        usecase.execute(&id, &student, tx2).await.unwrap();

        let edit_usecase = ApplyEditUseCase::new(registry.clone());
        edit_usecase
            .execute(&id, &student, CodeContent::new("x = 1".to_string()).unwrap())
            .await
            .unwrap();

        let disconnect_usecase = DisconnectParticipantUseCase::new(registry.clone());
        disconnect_usecase.execute(&id, &mentor).await;
        assert_eq!(registry.room_count().await, 0);

        // when (操作): 学生だった接続が参加し直す
        let (tx3, mut rx3) = mpsc::channel(SEND_QUEUE_CAPACITY);
        let rejoined = usecase.execute(&id, &student, tx3).await.unwrap();

        // then (期待する結果): 新しいルームのメンターになり、初期コードを受け取る
        assert_eq!(rejoined.role, Role::Mentor);
        assert_eq!(registry.room_count().await, 1);

        let role: serde_json::Value =
            serde_json::from_str(&rx3.recv().await.unwrap()).unwrap();
        assert_eq!(role["role"], "mentor");
        let snapshot: serde_json::Value =
            serde_json::from_str(&rx3.recv().await.unwrap()).unwrap();
        let initial = default_code_blocks()
            .into_iter()
            .find(|b| b.id.as_str() == "async-case")
            .unwrap()
            .initial_code;
        assert_eq!(snapshot["code"], initial.as_str());
    }

    #[tokio::test]
    async fn test_concurrent_first_joins_resolve_to_single_room() {
        // テスト項目: 同時の初回参加が一つのルームに解決され、メンターは一人だけ
        // given (前提条件):
        let repository = Arc::new(InMemoryCodeBlockRepository::new(default_code_blocks()));
        let registry = Arc::new(RoomRegistry::new());
        let id = async_case_id();

        // when (操作): 8 接続が同時に参加する
        let mut handles = Vec::new();
        for _ in 0..8 {
            let usecase =
                JoinRoomUseCase::new(repository.clone(), registry.clone());
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                let (tx, _rx) = mpsc::channel(SEND_QUEUE_CAPACITY);
                usecase
                    .execute(&id, &ConnectionIdFactory::generate(), tx)
                    .await
                    .unwrap()
            }));
        }
        let mut mentor_count = 0;
        for handle in handles {
            if handle.await.unwrap().role == Role::Mentor {
                mentor_count += 1;
            }
        }

        // then (期待する結果):
        assert_eq!(mentor_count, 1);
        assert_eq!(registry.room_count().await, 1);
    }
}
