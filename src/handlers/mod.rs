pub mod accounts;
pub mod activities;
pub mod anomalies;
pub mod categories;
pub mod closings;
pub mod common;
pub mod companies;
pub mod fees;
pub mod health;
pub mod investments;
pub mod journal;
pub mod profit_sharing;
pub mod rentals;
pub mod reports;
pub mod settlements;
pub mod users;
