use super::{check_target, EffectOutcome, Effects};
use crate::{
    bridge::{Bridge, BridgeError},
    clock::Clock,
    methods::Method,
    models::{LightId, LightPatch},
};

/// Morse pattern of an upper-case letter or a space
pub fn pattern(c: char) -> Option<&'static str> {
    Some(match c {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        ' ' => " ",
        _ => return None,
    })
}

impl<C: Clock> Effects<C> {
    /// Blink `text` in Morse code on a light
    ///
    /// Characters without a Morse pattern are skipped. A space only produces the gap between
    /// characters. Blocks until the whole message has been played or the effect is aborted.
    #[instrument(skip(self, bridge))]
    pub fn morse<M: Method>(
        &self,
        bridge: &mut Bridge<M>,
        id: LightId,
        text: &str,
    ) -> Result<EffectOutcome, BridgeError> {
        check_target(bridge, id)?;
        let _running = self.abort.start();
        let config = &self.morse;

        for c in text.to_uppercase().chars() {
            let pattern = match pattern(c) {
                Some(pattern) => pattern,
                None => {
                    trace!(?c, "no morse pattern, skipping");
                    continue;
                }
            };

            if self.aborted() {
                return Ok(EffectOutcome::Aborted);
            }

            bridge.notice(&format!("Morse '{}': {}", c, pattern))?;

            for symbol in pattern.chars() {
                let duration = match symbol {
                    '.' => config.dot(),
                    '-' => config.dash(),
                    _ => continue,
                };

                if self.aborted() {
                    return Ok(EffectOutcome::Aborted);
                }

                bridge.set_light(id, LightPatch::new().on(true).brightness(config.brightness))?;
                self.clock.sleep(duration);

                bridge.set_light(id, LightPatch::off())?;
                self.clock.sleep(config.symbol_gap());
            }

            self.clock.sleep(config.char_gap());
        }

        info!("morse message complete");
        Ok(EffectOutcome::Completed)
    }
}
