use derive_more::{Display, From, FromStr};

/// Highest brightness a light accepts
pub const MAX_BRIGHTNESS: u8 = 254;
/// Highest saturation a light accepts
pub const MAX_SATURATION: u8 = 254;
/// Highest hue value, 65535 wraps around to red
pub const MAX_HUE: u16 = u16::MAX;

/// Identifier of a light on the bridge
#[derive(Display, From, FromStr, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightState {
    pub on: bool,
    pub brightness: u8,
    pub hue: u16,
    pub saturation: u8,
    name: String,
}

impl LightState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            on: false,
            brightness: 0,
            hue: 0,
            saturation: 0,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overwrite the fields present in `patch`, leaving the others untouched
    ///
    /// Values outside of the light's domain are clamped.
    pub fn apply(&mut self, patch: &LightPatch) {
        if let Some(on) = patch.on {
            self.on = on;
        }

        if let Some(brightness) = patch.brightness {
            if brightness > MAX_BRIGHTNESS {
                debug!(brightness, "clamping brightness");
            }

            self.brightness = brightness.min(MAX_BRIGHTNESS);
        }

        if let Some(hue) = patch.hue {
            self.hue = hue;
        }

        if let Some(saturation) = patch.saturation {
            if saturation > MAX_SATURATION {
                debug!(saturation, "clamping saturation");
            }

            self.saturation = saturation.min(MAX_SATURATION);
        }
    }
}

/// Partial update of a [LightState]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightPatch {
    pub on: Option<bool>,
    pub brightness: Option<u8>,
    pub hue: Option<u16>,
    pub saturation: Option<u8>,
}

impl LightPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn the light off and drop its brightness to zero
    pub fn off() -> Self {
        Self::new().on(false).brightness(0)
    }

    pub fn on(mut self, on: bool) -> Self {
        self.on = Some(on);
        self
    }

    pub fn brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn hue(mut self, hue: u16) -> Self {
        self.hue = Some(hue);
        self
    }

    pub fn saturation(mut self, saturation: u8) -> Self {
        self.saturation = Some(saturation);
        self
    }
}
