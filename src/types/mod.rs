//! Type definitions

pub mod crew;
pub mod messages;
pub mod route;
pub mod ticket;

pub use crew::*;
pub use messages::*;
pub use route::*;
pub use ticket::*;
