use std::collections::BTreeMap;

use crate::models::{LightId, LightState};

/// Fixed set of lights known to the bridge, ordered by identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lights {
    lights: BTreeMap<LightId, LightState>,
}

impl Lights {
    pub fn get(&self, id: LightId) -> Option<&LightState> {
        self.lights.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: LightId) -> Option<&mut LightState> {
        self.lights.get_mut(&id)
    }

    pub fn contains(&self, id: LightId) -> bool {
        self.lights.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LightId, &LightState)> + '_ {
        self.lights.iter().map(|(&id, light)| (id, light))
    }

    pub fn ids(&self) -> impl Iterator<Item = LightId> + '_ {
        self.lights.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

impl Default for Lights {
    fn default() -> Self {
        let mut lights = BTreeMap::new();
        lights.insert(LightId(1), LightState::new("Living room"));
        lights.insert(LightId(2), LightState::new("LED strip"));

        Self { lights }
    }
}
