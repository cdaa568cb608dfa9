//! sea-orm entities for the auth service's tables.

pub mod identities;
pub mod one_time_codes;
pub mod session_tokens;
