//! Interactive terminal globe: a slowly spinning dotted sphere with city
//! markers, drag-to-rotate, and hover tooltips.

pub mod app;
pub mod braille;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod markers;
pub mod rotation;
pub mod ui;
