pub mod cache;
pub mod position;
pub mod price;
pub mod settings;
pub mod valuation;
