pub mod classifier;
pub mod contour;
pub mod motion;
pub mod types;
