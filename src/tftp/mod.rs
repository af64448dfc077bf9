pub mod error;
pub mod shared;
