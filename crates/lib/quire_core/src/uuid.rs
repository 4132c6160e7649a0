// Helper for generating UUIDv7 (timestamp-sortable UUIDs)
//
// All primary keys are generated app-side so rows sort by creation time
// and inserts never depend on store-specific id generation.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}
