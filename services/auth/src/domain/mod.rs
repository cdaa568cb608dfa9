pub mod lockout;
pub mod repository;
pub mod types;
