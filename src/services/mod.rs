pub mod aggregator;
pub mod mutator;
pub mod net_worth;
