//! Session data model: token secrets, opaque user records, session snapshots, and the wire
//! payloads exchanged with credential endpoints.

pub mod grant;
pub mod secret;
pub mod session;
pub mod user;

pub use grant::*;
pub use secret::*;
pub use session::*;
pub use user::*;
