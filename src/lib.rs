pub mod adapters;
pub mod api;
pub mod budget;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod stats;

pub use adapters::PostgresStore;
pub use budget::{BudgetService, BudgetStore};
pub use config::AppConfig;
pub use error::{BetTrackerError, Result};
pub use notifier::Notifier;
pub use stats::{BetSource, StatisticsService};
