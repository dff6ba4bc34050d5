//! Per-mode spending limits: consumption against daily, weekly and monthly
//! windows, and threshold alerts.

pub mod consumption;
pub mod service;

pub use consumption::{consumption, evaluate_alert, AlertLevel, BudgetAlert, BudgetConsumption};
pub use service::{BudgetOverview, BudgetService, BudgetStore};
