pub mod account;
pub mod activity;
pub mod activity_registration;
pub mod anomaly;
pub mod category;
pub mod company;
pub mod fee_invoice;
pub mod fee_setting;
pub mod investment;
pub mod investment_inquiry;
pub mod journal_entry;
pub mod monthly_closing;
pub mod payable;
pub mod profit_sharing_distribution;
pub mod profit_sharing_project;
pub mod receivable;
pub mod rental_payment;
pub mod rental_property;
pub mod user;
