// src/handlers/mod.rs

pub mod quiz;
pub mod submission;
pub mod user;
