pub mod analysis;
pub mod cash_flow;
pub mod form;
pub mod metrics;
pub mod projection;
pub mod property;
pub mod risk;
