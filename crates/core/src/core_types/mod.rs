//! Core types and utilities

pub mod draws;
pub mod season;
pub mod volume;

pub use draws::{PoissonDraw, VolumeDraw, MAX_POISSON_MEAN, VOLUME_RESOLUTION};
pub use season::{Season, SeasonParams};
pub use volume::UnitVolume;
