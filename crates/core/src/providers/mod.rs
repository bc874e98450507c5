pub mod traits;

// Provider implementations
pub mod rss_feed;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo_finance;
