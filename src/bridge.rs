//! Bridge controller: owns the lights and gates their mutation

use std::io;

use thiserror::Error;

use crate::{
    methods::{Method, MethodError},
    models::{LightId, LightPatch, LightState},
    registry::Lights,
};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("not connected to the bridge, connect first")]
    NotConnected,
    #[error("unknown light: {0}")]
    UnknownLight(LightId),
    #[error("pairing failed: {0}")]
    Pairing(#[source] io::Error),
    #[error(transparent)]
    Method(#[from] MethodError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Operator confirmation required to pair with the bridge
pub trait PairingGesture {
    /// Block until the operator confirms the pairing with the bridge at `address`
    fn confirm(&mut self, address: &str) -> io::Result<()>;
}

impl<F: FnMut(&str) -> io::Result<()>> PairingGesture for F {
    fn confirm(&mut self, address: &str) -> io::Result<()> {
        self(address)
    }
}

pub struct Bridge<M> {
    address: String,
    state: ConnectionState,
    lights: Lights,
    method: M,
}

impl<M: Method> Bridge<M> {
    pub fn new(address: impl Into<String>, method: M) -> Self {
        Self {
            address: address.into(),
            state: ConnectionState::Disconnected,
            lights: Lights::default(),
            method,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    pub fn light(&self, id: LightId) -> Result<&LightState, BridgeError> {
        self.lights.get(id).ok_or(BridgeError::UnknownLight(id))
    }

    pub fn method(&self) -> &M {
        &self.method
    }

    /// Pair with the bridge
    ///
    /// Once connected, further calls return immediately without consulting the gesture.
    #[instrument(skip(gesture))]
    pub fn connect(&mut self, mut gesture: impl PairingGesture) -> Result<(), BridgeError> {
        if self.is_connected() {
            debug!("already connected");
            return Ok(());
        }

        gesture
            .confirm(&self.address)
            .map_err(BridgeError::Pairing)?;

        self.state = ConnectionState::Connected;
        info!(address = %self.address, "connected");

        let line = format!("✓ Connected to virtual bridge at {}", self.address);
        self.notice(&line)
    }

    /// Apply a partial update to a light and display the new status of all lights
    #[instrument(skip(self))]
    pub fn set_light(&mut self, id: LightId, patch: LightPatch) -> Result<(), BridgeError> {
        if !self.is_connected() {
            return Err(BridgeError::NotConnected);
        }

        let light = self
            .lights
            .get_mut(id)
            .ok_or(BridgeError::UnknownLight(id))?;

        light.apply(&patch);
        debug!(light = ?light, "applied patch");

        self.display_all()
    }

    pub fn display_all(&mut self) -> Result<(), BridgeError> {
        Ok(self.method.write(&self.lights)?)
    }

    pub fn notice(&mut self, line: &str) -> Result<(), BridgeError> {
        Ok(self.method.notice(line)?)
    }
}

impl<M> std::fmt::Debug for Bridge<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("address", &self.address)
            .field("state", &self.state)
            .finish()
    }
}
