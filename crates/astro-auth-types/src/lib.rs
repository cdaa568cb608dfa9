//! Auth types shared across Astro services.
//!
//! Provides session-token claims/validation and the `AuthenticatedIdentity`
//! extractor that protected handlers use to read the identity resolved by the
//! auth middleware.

pub mod identity;
pub mod token;
