pub mod players;
pub mod sessions;

pub use players::Entity as Players;
pub use players::Model as Player;
pub use sessions::Entity as Sessions;
pub use sessions::Model as SessionRow;
