//! # System Interaction Layer
//!
//! Everything that leaves the process: the HTTP conversation with the command
//! service and the session token kept on disk.
//!
//! ## Modules
//!
//! - **`transport`**: The [`transport::Transport`] seam and its blocking HTTP
//!   implementation. Every invocation-style call comes back as an
//!   [`crate::models::ApiResponse`], success or not.
//! - **`session_store`**: Loads, saves and clears `session.toml`, the Basic-auth
//!   token the dashboard presents on every request.

pub mod session_store;
pub mod transport;
