//! Conversion of light state to displayable colors

use std::fmt;

use palette::{FromColor, Hsv, Srgb};

use crate::models::{Color, LightState, MAX_BRIGHTNESS, MAX_HUE, MAX_SATURATION};

/// Glyph used to draw one step of a [GlyphBar]
pub const GLYPH: char = '█';

/// Brightness range covered by a single glyph
const BRIGHTNESS_STEP: u8 = 51;

/// Displayable form of a light: its color and a brightness meter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered {
    pub rgb: Color,
    pub bar: GlyphBar,
}

/// Crude brightness meter, one to five glyphs long
///
/// Formatting honors width and alignment flags, so `{:<5}` pads the bar to a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBar(u8);

impl GlyphBar {
    pub fn from_brightness(brightness: u8) -> Self {
        Self(brightness / BRIGHTNESS_STEP + 1)
    }

    pub fn glyph_count(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GlyphBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bar: String = std::iter::repeat(GLYPH).take(self.glyph_count()).collect();
        f.pad(&bar)
    }
}

fn channel(component: f64) -> u8 {
    // Truncation floors the positive component
    (component.max(0.0).min(1.0) * 255.0) as u8
}

/// Convert the hue, saturation and brightness of a light to RGB
pub fn hsv_to_rgb(hue: u16, saturation: u8, brightness: u8) -> Color {
    let hue = f64::from(hue) / f64::from(MAX_HUE);
    let saturation = f64::from(saturation) / f64::from(MAX_SATURATION);
    let value = f64::from(brightness) / f64::from(MAX_BRIGHTNESS);

    // Double precision keeps the floored channels exact near integer boundaries
    let hsv = Hsv::<_, f64>::new_srgb(hue * 360.0, saturation, value);
    let (r, g, b) = Srgb::<f64>::from_color(hsv).into_components();

    Color::new(channel(r), channel(g), channel(b))
}

pub fn render(light: &LightState) -> Rendered {
    Rendered {
        rgb: hsv_to_rgb(light.hue, light.saturation, light.brightness),
        bar: GlyphBar::from_brightness(light.brightness),
    }
}
