pub mod catalog;
pub mod exchange_rate;
pub mod holding;
pub mod news;
pub mod price;
pub mod report;
pub mod series;
pub mod settings;
pub mod valuation;
