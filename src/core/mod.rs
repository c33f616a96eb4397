// src/core/mod.rs

pub mod coordinator;
pub mod form;
pub mod menu;
pub mod paths;
pub mod pretty;
pub mod settings;
