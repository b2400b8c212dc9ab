//! Unique test data so suites sharing a database never collide.

use ulid::Ulid;

/// Longest username the backend accepts.
const MAX_USERNAME_CHARS: usize = 32;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("session");
/// assert_ne!(a, unique_str("session"));
/// assert!(a.starts_with("session-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}

/// A username that fits the backend's length limit.
///
/// The prefix is cut to leave room for the 16 random characters of a ULID.
///
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let name = unique_username("a-rather-long-prefix-for-a-name");
/// assert!(name.chars().count() <= 32);
/// assert_ne!(name, unique_username("a-rather-long-prefix-for-a-name"));
/// ```
pub fn unique_username(prefix: &str) -> String {
    let ulid = Ulid::new().to_string();
    // the last 16 characters are the random component
    let random = &ulid[ulid.len() - 16..];
    let room = MAX_USERNAME_CHARS - random.len() - 1;
    let prefix: String = prefix.chars().take(room).collect();
    format!("{prefix}-{random}")
}
