mod overlay;

pub use overlay::OverlayRenderer;
