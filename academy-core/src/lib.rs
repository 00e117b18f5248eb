//! The sports-academy side of the roster app: record kinds, seed data, the attendance and officer-ordering
//! rules, and [`Academy`], which keeps all of it in sync through `rally`.

pub mod academy;
pub mod attendance;
pub mod models;
pub mod officers;
pub mod seeds;

pub use academy::{Academy, BrandingSlot, LoadReport};
pub use models::*;
