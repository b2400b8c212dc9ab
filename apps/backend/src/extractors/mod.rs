pub mod path_ids;
pub mod validated_json;

pub use path_ids::{PlayerId, SessionId};
pub use validated_json::ValidatedJson;
