//! Seasonality comparison charts
//!
//! Figures are plain values: [`season_compare`] takes a [`Figure`], adds one
//! curve per model and hands it back. Rendering to SVG or PNG is available
//! with the `visualization` feature.

pub mod figure;
pub mod palette;
pub mod seasonality;

#[cfg(feature = "visualization")]
mod plotters_ext;

pub use self::figure::{Axis, Curve, Figure};
pub use self::palette::{Color, Palette};
pub use self::seasonality::{season_compare, DAYS_IN_CYCLE};
