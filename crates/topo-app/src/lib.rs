//! Application shell for the globe viewer: window, event loop, frame pacing
//! and the title-bar HUD.

pub mod error;
pub mod game_loop;
pub mod hud;
pub mod platform;
pub mod scene;
pub mod window;

pub use error::AppError;
pub use window::{AppState, run_with_config};
