//! HTTP handlers

pub mod extract;
pub mod health;
pub mod manual;
pub mod models;
pub mod predict;
