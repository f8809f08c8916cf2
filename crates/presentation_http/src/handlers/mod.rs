//! HTTP request handlers

pub mod health;
pub mod send;
