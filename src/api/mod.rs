//! Внешний API покерного движка.
//!
//! Здесь описываются:
//! - намерения клиента (commands.rs);
//! - сообщения сервера (dto.rs);
//! - ошибки (errors.rs) — то, что видит клиент;
//! - лобби (queries.rs) — только чтение;
//! - проекция состояния под получателя (projection.rs).

pub mod commands;
pub mod dto;
pub mod errors;
pub mod projection;
pub mod queries;

pub use commands::ClientIntent;
pub use dto::ServerMessage;
pub use errors::{ApiError, ErrorCode, HAND_VOIDED_NOTICE};
pub use projection::{project, HoleCardsView, SeatView, TableSnapshot, Viewer};
pub use queries::{summarize, TableSummary};
