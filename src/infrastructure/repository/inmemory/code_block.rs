//! InMemory CodeBlock Repository 実装
//!
//! ドメイン層が定義する CodeBlockRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 技術的負債
//!
//! 現在、ドメインモデル（`CodeBlock`）を直接ストレージとして使用しています。
//! これは InMemory 実装では許容される妥協ですが、将来 MongoDB などの
//! DBMS を実装する際は、以下の変換層が必要になります：
//!
//! ```text
//! DB Row/JSON → CodeBlockData (DTO) → CodeBlock (ドメインモデル)
//! ```

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    CodeBlock, CodeBlockId, CodeBlockRepository, RatingAggregate, RatingScore, RepositoryError,
};

/// インメモリ CodeBlock Repository 実装
///
/// HashMap をインメモリ DB として使用する実装。評価集計はストアされた
/// CodeBlock 上に保持されるため、ルームの解散をまたいで維持されます。
pub struct InMemoryCodeBlockRepository {
    /// CodeBlock ドメインモデル（シードデータで初期化）
    blocks: Arc<Mutex<HashMap<CodeBlockId, CodeBlock>>>,
}

impl InMemoryCodeBlockRepository {
    /// 新しい InMemoryCodeBlockRepository を作成
    pub fn new(blocks: Vec<CodeBlock>) -> Self {
        let map = blocks.into_iter().map(|b| (b.id.clone(), b)).collect();
        Self {
            blocks: Arc::new(Mutex::new(map)),
        }
    }
}

#[async_trait]
impl CodeBlockRepository for InMemoryCodeBlockRepository {
    async fn list_code_blocks(&self) -> Vec<CodeBlock> {
        let blocks = self.blocks.lock().await;
        let mut list: Vec<CodeBlock> = blocks.values().cloned().collect();
        // Sort by name for consistent ordering
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    async fn get_code_block(&self, id: &CodeBlockId) -> Result<CodeBlock, RepositoryError> {
        let blocks = self.blocks.lock().await;
        blocks
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::CodeBlockNotFound(id.to_string()))
    }

    async fn add_rating(
        &self,
        id: &CodeBlockId,
        score: RatingScore,
    ) -> Result<RatingAggregate, RepositoryError> {
        let mut blocks = self.blocks.lock().await;
        let block = blocks
            .get_mut(id)
            .ok_or_else(|| RepositoryError::CodeBlockNotFound(id.to_string()))?;
        block.rating.record(score);
        Ok(block.rating)
    }

    async fn get_rating(&self, id: &CodeBlockId) -> Result<RatingAggregate, RepositoryError> {
        let blocks = self.blocks.lock().await;
        blocks
            .get(id)
            .map(|b| b.rating)
            .ok_or_else(|| RepositoryError::CodeBlockNotFound(id.to_string()))
    }
}
