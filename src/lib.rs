//! webgrid - speech/keyboard grid acquisition game
//!
//! A terminal re-creation of the "Speech Webgrid" HCI task: steer a marker
//! across a bounded grid toward randomly placed goals using arrow keys or
//! spoken commands, while the game measures input throughput in bits per
//! second. The main binary is in `main.rs`.

pub mod config;
pub mod errors;
pub mod events;
pub mod grid;
pub mod interp;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod stt;
pub mod ui;
