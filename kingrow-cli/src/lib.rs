//! KINGROW CLI - command implementations
//!
//! The `kingrow` binary parses arguments and hands off to these modules.

pub mod analyze_cmd;
pub mod display;
pub mod play_cmd;
pub mod selfplay_cmd;
