//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod apply_edit;
pub mod disconnect_participant;
pub mod error;
pub mod join_room;
pub mod submit_rating;

pub use apply_edit::ApplyEditUseCase;
pub use disconnect_participant::{DisconnectParticipantUseCase, LeaveOutcome};
pub use error::{EditError, JoinError, RatingError};
pub use join_room::{JoinRoomUseCase, JoinedRoom};
pub use submit_rating::SubmitRatingUseCase;
