// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod bonus;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod lifeline;
pub mod logging;
pub mod question;
pub mod quiz;
pub mod runtime;
pub mod score;
pub mod session;
pub mod theme;
pub mod timer;
pub mod ui;

pub use app::{Action, App};
pub use error::{BankError, QuizError};
