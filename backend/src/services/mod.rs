pub mod aggregator;
pub mod positions;
pub mod resolver;
pub mod youtube;
