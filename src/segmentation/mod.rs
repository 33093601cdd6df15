pub mod background;
pub mod normalize;
pub mod remover;
