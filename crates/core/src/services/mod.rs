pub mod aggregation_service;
pub mod alignment_service;
pub mod exchange_rate_service;
pub mod news_service;
pub mod quote_service;
pub mod report_service;
pub mod simulation_service;
pub mod valuation_service;
