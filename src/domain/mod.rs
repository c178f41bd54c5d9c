//! Domain models

pub mod member;
pub mod user;

pub use member::{Member, MemberInput, SearchQuery};
pub use user::{LoginRequest, LoginResponse, User, UserSummary};
