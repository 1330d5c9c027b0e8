#![allow(async_fn_in_trait)]

pub mod commands;
pub mod context;
pub mod logs;
pub mod nuzlocke;
pub mod stats;
pub mod time;
