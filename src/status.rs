//! Human-readable status of the bridge lights

use crate::{
    color::{self, Rendered},
    models::{Color, LightId, LightState},
    registry::Lights,
};

pub const HEADER: &str = "=== Virtual Hue bridge status ===";
pub const FOOTER: &str = "=================================";

/// Marker in front of every light status
pub const INDICATOR: char = '●';

const ANSI_RED: &str = "\x1B[31m";
const ANSI_GREEN: &str = "\x1B[32m";
const ANSI_RESET: &str = "\x1B[0m";

fn push_indicator(buf: &mut String, escape: &str, ansi: bool) {
    if ansi {
        buf.push_str(escape);
        buf.push(INDICATOR);
        buf.push_str(ANSI_RESET);
    } else {
        buf.push(INDICATOR);
    }
}

fn push_bar(buf: &mut String, rendered: &Rendered, ansi: bool) {
    buf.push('[');

    if ansi {
        let Color {
            red, green, blue, ..
        } = rendered.rgb;

        buf.push_str(&format!(
            "\x1B[38;2;{};{};{}m{:<5}{}",
            red, green, blue, rendered.bar, ANSI_RESET
        ));
    } else {
        buf.push_str(&format!("{:<5}", rendered.bar));
    }

    buf.push(']');
}

/// One-line summary of a light
///
/// An off light is summarized by its marker only. An on light also shows its brightness bar and
/// its RGB color.
pub fn describe(light: &LightState, ansi: bool) -> String {
    let mut buf = String::new();

    if !light.on {
        push_indicator(&mut buf, ANSI_RED, ansi);
        buf.push_str(" Off");
        return buf;
    }

    let rendered = color::render(light);
    let Color {
        red, green, blue, ..
    } = rendered.rgb;

    push_indicator(&mut buf, ANSI_GREEN, ansi);
    buf.push_str(" On ");
    push_bar(&mut buf, &rendered, ansi);
    buf.push_str(&format!(" RGB({},{},{})", red, green, blue));

    buf
}

pub fn light_line(id: LightId, light: &LightState, ansi: bool) -> String {
    format!("Light {} ({}): {}", id, light.name(), describe(light, ansi))
}

/// Status of all the lights in identifier order, framed by a header and a footer
pub fn status_lines(lights: &Lights, ansi: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(lights.len() + 2);
    lines.push(HEADER.to_owned());
    lines.extend(lights.iter().map(|(id, light)| light_line(id, light, ansi)));
    lines.push(FOOTER.to_owned());
    lines
}
