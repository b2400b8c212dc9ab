//! Store contracts and their implementations.

pub mod memory;
pub mod players;
pub mod sessions;

pub use memory::InMemoryStore;
pub use players::{Player, PlayerStore, PlayerStoreSea};
pub use sessions::{
    NewSession, Session, SessionStore, SessionStoreSea, WinnerRanking, WinnerStats,
};
