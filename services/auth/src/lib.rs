//! Authentication service for postboard
//!
//! Cookie-based JWT authentication with one active refresh token per user.
//! Access and refresh tokens are signed with separate secrets, and every
//! refresh rotates the pair so the presented refresh token stops working.

pub mod auth_service;
pub mod cookies;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod settings;
pub mod validation;

use crate::auth_service::AuthService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub secure_cookies: bool,
}
