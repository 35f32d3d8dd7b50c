//! End-to-end runs of the two network instances.

pub mod curve_fit;
pub mod diamond_price;

pub use curve_fit::CurveFitReport;
pub use diamond_price::DiamondReport;
