//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface over a [`FlatRequest`](crate::flat::FlatRequest).
//!
//! | Module | Backend route | Description |
//! |--------|---------------|-------------|
//! | `auth` | `/auth/login` | Session login |

pub mod auth;

pub use auth::AuthApi;
