pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Calendar, GameDate, SeasonPhase};
pub use config::BalanceConfig;
pub use error::{GuildError, PersistenceError, Result};
