pub mod commands;
pub mod session;

pub use commands::Action;
pub use session::{Outcome, Session};
