// src/core/mod.rs

pub mod html;
pub mod text;
pub mod net;
pub mod sanitize;
