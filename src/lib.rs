// src/lib.rs

//! 七色墨水屏按键面板
//!
//! 四个物理按键分别触发：天气与行星时日历、局域网主机表、图片轮播（两个按键）。
//! 每次按键生成一张 600x448 的位图并整屏刷新到墨水屏。

#![allow(async_fn_in_trait)]

pub mod common;
pub mod driver;
pub mod platform;
pub mod render;
pub mod service;
pub mod tasks;
