// @zen-component: EDT-SessionId
// Helper for editor session identifiers.
//
// Each editor instance gets a UUIDv7 so log lines from one editing session
// can be grouped and ordered by start time. Row identities are not UUIDs;
// they come from the draft store's own counter.

use uuid::Uuid;

/// Generate a new session id (UUIDv7, timestamp-sortable).
pub fn session_id() -> Uuid {
    Uuid::now_v7()
}
