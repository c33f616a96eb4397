//! # commander-dash
//!
//! A terminal operator dashboard for remote command-execution services. The service
//! declares a tree of invokable commands, each with an option schema; this crate
//! compiles the tree into a navigable menu, synthesizes input widgets from each
//! schema, decodes submitted text into a typed payload and renders the service's
//! answer.
//!
//! The engine lives in [`core`] and is free of side effects. [`system`] talks to
//! the service and keeps the session token; [`cli`] applies the engine's
//! descriptors to the terminal.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
