pub mod navigation;
pub mod styles;
