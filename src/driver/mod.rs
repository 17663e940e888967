// src/driver/mod.rs
pub mod button;
pub mod display;
