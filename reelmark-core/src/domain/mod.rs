//! Domain types and pure decision logic.

pub mod bookmark;
pub mod classify;
pub mod clock;
pub mod history;
pub mod ids;
pub mod keys;
pub mod meta;
pub mod progress;
pub mod session;
pub mod settings;
pub mod validation;
