//! process exit codes, stable so scripts can branch on them
//!
//! `eval` and `classify` use NO_MATCH as a normal outcome, like `grep`

pub const SUCCESS: i32 = 0;

/// anything without a more specific code
pub const ERROR: i32 = 1;

/// the condition was false, or no rule matched
pub const NO_MATCH: i32 = 2;

/// spec text or file could not be compiled into a condition
pub const INVALID_SPEC: i32 = 3;

/// receipt unreadable or not shaped like a receipt
pub const INVALID_RECEIPT: i32 = 4;

/// rule file missing, unparsable or failing verification
pub const CONFIG_ERROR: i32 = 5;
