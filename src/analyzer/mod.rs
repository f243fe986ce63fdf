// Analyzer module: aggregates submodules for different aspects of analysis.

pub mod aggregate;
pub mod query;
pub mod scoring;

pub use aggregate::{category_breakdown, growth_distribution, statistics, Statistics};
pub use query::{filter, sort, FilterCriteria, SortKey};
pub use scoring::{competition_level, is_hidden_gem, is_rising_star, saturation_score};
