//! Provider-facing half of the stock forecast pipeline: fetching raw daily
//! series and normalizing them into canonical price records.

pub mod fetch;
pub mod models;
pub mod normalize;
pub mod providers;
