pub mod auth;
pub mod page;
pub mod team;

pub use auth::*;
pub use page::*;
pub use team::*;
