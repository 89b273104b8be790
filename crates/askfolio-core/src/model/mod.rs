mod chat;
mod rating;
mod session;

pub use chat::*;
pub use rating::*;
pub use session::*;
