use std::time::Duration;

use super::{check_target, EffectOutcome, Effects};
use crate::{
    bridge::{Bridge, BridgeError},
    clock::Clock,
    methods::Method,
    models::{LightId, LightPatch},
};

impl<C: Clock> Effects<C> {
    /// Flash random colors on a light for `duration`, one draw per tick
    ///
    /// The light is turned off when the effect ends, whether it completed, was aborted or failed.
    /// A `duration` too large for the clock to represent runs until aborted.
    #[instrument(skip(self, bridge, rng))]
    pub fn disco<M: Method>(
        &self,
        bridge: &mut Bridge<M>,
        id: LightId,
        duration: Duration,
        rng: &mut fastrand::Rng,
    ) -> Result<EffectOutcome, BridgeError> {
        check_target(bridge, id)?;
        let _running = self.abort.start();

        let result = bridge
            .notice(&format!(
                "🪩 Starting disco mode for {} seconds!",
                duration.as_secs_f32()
            ))
            .and_then(|_| self.disco_ticks(bridge, id, duration, rng));

        let off = bridge.set_light(id, LightPatch::off());

        match result {
            Ok(outcome) => {
                off?;
                Ok(outcome)
            }
            Err(error) => {
                if let Err(off_error) = off {
                    warn!(error = %off_error, "failed to turn light off");
                }

                Err(error)
            }
        }
    }

    fn disco_ticks<M: Method>(
        &self,
        bridge: &mut Bridge<M>,
        id: LightId,
        duration: Duration,
        rng: &mut fastrand::Rng,
    ) -> Result<EffectOutcome, BridgeError> {
        let config = &self.disco;
        let end = self.clock.now().checked_add(duration);
        if end.is_none() {
            debug!(?duration, "disco deadline out of range, running until aborted");
        }

        let mut tick = 0usize;

        while end.map_or(true, |end| self.clock.now() < end) {
            if self.aborted() {
                return Ok(EffectOutcome::Aborted);
            }

            let patch = LightPatch::new()
                .on(true)
                .brightness(rng.u8(config.min_brightness..=config.max_brightness))
                .hue(rng.u16(..))
                .saturation(rng.u8(config.min_saturation..=config.max_saturation));

            trace!(tick, ?patch, "disco tick");
            bridge.set_light(id, patch)?;
            self.clock.sleep(config.tick());
            tick += 1;
        }

        info!(ticks = tick, "disco complete");
        Ok(EffectOutcome::Completed)
    }
}
