//! Exit codes for the randorder CLI.
//! These codes are part of the public contract; wrappers branch on them.

pub const SUCCESS: i32 = 0;
pub const INTEGRITY_VIOLATION: i32 = 1; // Reordering lost or duplicated test items
pub const INTERNAL_ERROR: i32 = 2; // Config, cache or input error
