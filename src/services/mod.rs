//! Session handling and authentication forms.

pub mod auth;
pub mod session;
