//! Provider adapters.
//!
//! | Adapter | Upstream | Notes |
//! |---------|----------|-------|
//! | [`PolygonProvider`] | Polygon.io previous-close aggregates | key via query param |
//! | [`FmpProvider`] | Financial Modeling Prep quote endpoint | key via query param |
//! | [`DemoProvider`] | none (seeded PRNG) | credential-free fallback |

mod demo;
mod fmp;
mod polygon;

pub use demo::DemoProvider;
pub use fmp::FmpProvider;
pub use polygon::PolygonProvider;
