//! Interactive menu driving the bridge

use std::{
    io::{self, BufRead, Write},
    time::Duration,
};

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::{
    bridge::{Bridge, BridgeError},
    clock::Clock,
    effects::{EffectOutcome, Effects},
    methods::Method,
    models::{LightId, LightPatch, MAX_BRIGHTNESS},
};

/// Disco duration when none is given
pub const DEFAULT_DISCO_SECONDS: u64 = 5;

/// Light the color presets apply to
const STRIP: LightId = LightId(2);

#[derive(Debug, Error)]
pub enum CliError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum MenuChoice {
    #[strum(serialize = "1")]
    Toggle,
    #[strum(serialize = "2")]
    Brightness,
    #[strum(serialize = "3")]
    StripColor,
    #[strum(serialize = "4")]
    Disco,
    #[strum(serialize = "5")]
    Morse,
    #[strum(serialize = "6")]
    Status,
    #[strum(serialize = "0")]
    Quit,
}

const MENU: &str = "\
Virtual Hue controller
1. Turn a light on/off
2. Set brightness
3. Change the LED strip color
4. Disco mode
5. Morse message
6. Show light status
0. Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorPreset {
    Red,
    Green,
    Blue,
    Yellow,
}

impl ColorPreset {
    pub fn hue(self) -> u16 {
        match self {
            Self::Red => 0,
            Self::Green => 21845,
            Self::Blue => 43690,
            Self::Yellow => 10922,
        }
    }

    pub fn patch(self) -> LightPatch {
        LightPatch::new()
            .on(true)
            .brightness(MAX_BRIGHTNESS)
            .hue(self.hue())
            .saturation(254)
    }
}

/// Parse an integer, clamping it into `[0, max]`
pub fn parse_clamped(input: &str, max: u8) -> Option<u8> {
    let value: i64 = input.trim().parse().ok()?;
    Some(value.max(0).min(i64::from(max)) as u8)
}

/// Parse a yes/no answer, `y` or `k` meaning yes
pub fn parse_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "k")
}

pub struct Cli<R, W, M, C> {
    input: R,
    output: W,
    bridge: Bridge<M>,
    effects: Effects<C>,
    rng: fastrand::Rng,
}

impl<R: BufRead, W: Write, M: Method, C: Clock> Cli<R, W, M, C> {
    pub fn new(
        input: R,
        output: W,
        bridge: Bridge<M>,
        effects: Effects<C>,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            input,
            output,
            bridge,
            effects,
            rng,
        }
    }

    pub fn bridge(&self) -> &Bridge<M> {
        &self.bridge
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Pair with the bridge, waiting for the operator unless `auto` is set
    pub fn pair(&mut self, auto: bool) -> Result<(), CliError> {
        let Self {
            input,
            output,
            bridge,
            ..
        } = self;

        bridge.connect(|_address: &str| -> io::Result<()> {
            if auto {
                return Ok(());
            }

            writeln!(output, "⚡ Press the bridge button to connect...")?;
            match read_line(&mut *input, &mut *output, "Press Enter...")? {
                Some(_) => Ok(()),
                None => Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before pairing",
                )),
            }
        })?;

        Ok(())
    }

    /// Run the menu until the operator quits or the input is closed
    pub fn run(&mut self) -> Result<(), CliError> {
        loop {
            writeln!(self.output, "\n{}", MENU)?;

            let choice = match self.prompt("\nChoose an action (0-6): ")? {
                Some(choice) => choice,
                None => break,
            };

            let choice = match choice.trim().parse::<MenuChoice>() {
                Ok(MenuChoice::Quit) => break,
                Ok(choice) => choice,
                Err(_) => {
                    writeln!(self.output, "Invalid choice!")?;
                    continue;
                }
            };

            match self.dispatch(choice) {
                Ok(()) => {}
                Err(CliError::Bridge(error)) => {
                    warn!(error = %error, "command failed");
                    writeln!(self.output, "Error: {}", error)?;
                }
                Err(error) => return Err(error),
            }
        }

        writeln!(self.output, "Closing the program...")?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>, CliError> {
        Ok(read_line(&mut self.input, &mut self.output, text)?)
    }

    fn prompt_light(&mut self) -> Result<Option<LightId>, CliError> {
        let ids: Vec<String> = self.bridge.lights().ids().map(|id| id.to_string()).collect();
        let text = format!("Choose a light ({}): ", ids.join("/"));

        match self.prompt(&text)? {
            Some(line) => match line.trim().parse() {
                Ok(id) => Ok(Some(id)),
                Err(_) => {
                    writeln!(self.output, "Invalid light!")?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<(), CliError> {
        match choice {
            MenuChoice::Toggle => {
                if let Some(id) = self.prompt_light()? {
                    if let Some(answer) = self.prompt("Turn on (y/n)? ")? {
                        self.bridge
                            .set_light(id, LightPatch::new().on(parse_yes(&answer)))?;
                    }
                }
            }
            MenuChoice::Brightness => {
                if let Some(id) = self.prompt_light()? {
                    if let Some(answer) = self.prompt("Brightness (0-254): ")? {
                        match parse_clamped(&answer, MAX_BRIGHTNESS) {
                            Some(brightness) => self
                                .bridge
                                .set_light(id, LightPatch::new().brightness(brightness))?,
                            None => writeln!(self.output, "Invalid brightness!")?,
                        }
                    }
                }
            }
            MenuChoice::StripColor => {
                let names: Vec<&'static str> = ColorPreset::iter().map(Into::into).collect();
                let text = format!("Choose a color ({}): ", names.join("/"));

                if let Some(answer) = self.prompt(&text)? {
                    match answer.trim().parse::<ColorPreset>() {
                        Ok(preset) => self.bridge.set_light(STRIP, preset.patch())?,
                        Err(_) => writeln!(self.output, "Unknown color!")?,
                    }
                }
            }
            MenuChoice::Disco => {
                if let Some(id) = self.prompt_light()? {
                    let text = format!("Duration in seconds [{}]: ", DEFAULT_DISCO_SECONDS);

                    if let Some(answer) = self.prompt(&text)? {
                        let answer = answer.trim();
                        let seconds = if answer.is_empty() {
                            Some(DEFAULT_DISCO_SECONDS)
                        } else {
                            answer.parse().ok()
                        };

                        match seconds {
                            Some(seconds) => {
                                let outcome = self.effects.disco(
                                    &mut self.bridge,
                                    id,
                                    Duration::from_secs(seconds),
                                    &mut self.rng,
                                )?;
                                self.report(outcome)?;
                            }
                            None => writeln!(self.output, "Invalid duration!")?,
                        }
                    }
                }
            }
            MenuChoice::Morse => {
                if let Some(id) = self.prompt_light()? {
                    if let Some(text) = self.prompt("Morse message: ")? {
                        let outcome = self.effects.morse(&mut self.bridge, id, &text)?;
                        self.report(outcome)?;
                    }
                }
            }
            MenuChoice::Status => self.bridge.display_all()?,
            MenuChoice::Quit => {}
        }

        Ok(())
    }

    fn report(&mut self, outcome: EffectOutcome) -> Result<(), CliError> {
        if outcome == EffectOutcome::Aborted {
            writeln!(self.output, "Effect stopped.")?;
        }

        Ok(())
    }
}

/// Print `text` and read one line, `None` once the input is closed
fn read_line(
    input: &mut impl BufRead,
    output: &mut impl Write,
    text: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_owned()))
}
