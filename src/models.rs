mod config;
pub use config::*;

mod light;
pub use light::*;

pub type Color = palette::rgb::Srgb<u8>;
