// src/models/mod.rs

pub mod group;
pub mod password_reset;
pub mod role;
pub mod session;
pub mod user;
