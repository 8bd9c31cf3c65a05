//! Repository trait 定義
//!
//! ドメイン層が定義するデータアクセスの抽象化。UseCase 層と UI 層は
//! この trait に依存し、具体的な実装には直接依存しません（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;

use super::{
    entity::{CodeBlock, RatingAggregate},
    value_object::{CodeBlockId, RatingScore},
};

/// Repository layer errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Unknown code block id
    #[error("code block not found: {0}")]
    CodeBlockNotFound(String),
}

/// Data access abstraction for code blocks and their rating aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeBlockRepository: Send + Sync {
    /// List every code block in the catalog.
    async fn list_code_blocks(&self) -> Vec<CodeBlock>;

    /// Get one code block by id.
    async fn get_code_block(&self, id: &CodeBlockId) -> Result<CodeBlock, RepositoryError>;

    /// Record a rating and return the updated aggregate.
    async fn add_rating(
        &self,
        id: &CodeBlockId,
        score: RatingScore,
    ) -> Result<RatingAggregate, RepositoryError>;

    /// Get the current rating aggregate for a code block.
    async fn get_rating(&self, id: &CodeBlockId) -> Result<RatingAggregate, RepositoryError>;
}
