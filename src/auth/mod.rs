//! Auth Module
//!
//! Session state for checkout, input validation for the login and
//! registration forms, and a client for the external auth service.

mod client;
mod session;
mod validation;

pub use client::AuthClient;
pub use session::{AuthResponse, Role, Session, SessionStore, User, TOKEN_KEY, USER_KEY};
pub use validation::{validate_login, validate_registration, LoginRequest, RegisterRequest};
