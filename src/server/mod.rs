//! Серверный слой: актор на каждый стол, лобби, сессии клиентов.
//!
//! Транспорт (WebSocket и т.п.) сюда не входит: он создаёт `ClientSession`
//! на соединение и пересылает в неё разобранные намерения.

pub mod actor;
pub mod lobby;
pub mod session;

pub use actor::{ConnectionId, Outbox, TableActor, TableCommand, TableHandle};
pub use lobby::{ArchiveFactory, Lobby, SeedFactory};
pub use session::ClientSession;
