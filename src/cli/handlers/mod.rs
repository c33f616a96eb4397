// src/cli/handlers/mod.rs

// One module per CLI action.

pub mod commons;
pub mod form;
pub mod login;
pub mod logout;
pub mod menu;
pub mod password;
pub mod reload;
pub mod run;
pub mod tree;
