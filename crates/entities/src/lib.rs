//! Core entity definitions for the bulletin-board portal.
//!
//! This crate defines the data types shared by the store and the server:
//! the fixed category set, portal item records and the session user.

mod category;
mod error;
mod item;
mod user;

pub use category::*;
pub use error::*;
pub use item::*;
pub use user::*;
