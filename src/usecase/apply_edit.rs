//! UseCase: コード編集処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ApplyEditUseCase::execute() メソッド
//! - 共有コードの上書き(last-writer-wins)と送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証:編集は衝突検知なしで無条件に適用される
//! - 送信者自身にはエコーバックされないことを保証
//! - 解散済みルームへの編集が拒否されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系:編集の適用とブロードキャスト
//! - 冪等性:同一内容の編集を連続して送っても 2 回ブロードキャストされる
//! - 異常系:アクティブなルームが無い、参加者ではない接続からの編集

use std::sync::Arc;

use crate::{
    domain::{CodeBlockId, CodeContent, ConnectionId},
    infrastructure::dto::websocket::{CodeUpdateMessage, MessageType},
    ui::state::RoomRegistry,
};

use super::error::EditError;

/// コード編集のユースケース
pub struct ApplyEditUseCase {
    /// アクティブなルームのレジストリ
    registry: Arc<RoomRegistry>,
}

impl ApplyEditUseCase {
    /// 新しい ApplyEditUseCase を作成
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// コード編集を実行
    ///
    /// 共有コードを無条件に上書きし、送信者以外の全参加者へ新しいコードを
    /// ブロードキャストします。メンターからの編集も受理されます(サーバー側では
    /// 読み取り専用を強制しない)。
    ///
    /// # Arguments
    ///
    /// * `code_block_id` - 編集対象のコードブロック ID
    /// * `connection_id` - 編集を送信した接続の ID
    /// * `code` - 新しいコード全文
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - ブロードキャストが届いた接続数
    /// * `Err(EditError)` - 編集失敗
    pub async fn execute(
        &self,
        code_block_id: &CodeBlockId,
        connection_id: &ConnectionId,
        code: CodeContent,
    ) -> Result<usize, EditError> {
        // 1. アクティブなルームを取得(解散済み・未作成は拒否)
        let room_arc = self
            .registry
            .get(code_block_id)
            .await
            .ok_or_else(|| EditError::RoomNotActive(code_block_id.to_string()))?;
        let mut state = room_arc.lock().await;
        if state.dissolved {
            return Err(EditError::RoomNotActive(code_block_id.to_string()));
        }
        if state.room.get_participant(connection_id).is_none() {
            return Err(EditError::NotAParticipant(connection_id.to_string()));
        }

        // 2. 共有コードを上書きし、送信者以外へブロードキャスト。
        //    ルームのロックを保持したまま積むので、ルーム内の配信順序は
        //    編集の適用順序と一致する。
        let update_msg = CodeUpdateMessage {
            r#type: MessageType::CodeUpdate,
            code: code.as_str().to_string(),
        };
        state.room.apply_edit(code);
        let update_json = serde_json::to_string(&update_msg).unwrap();
        let delivered = state.broadcast_except(connection_id, &update_json);

        Ok(delivered)
    }
}
