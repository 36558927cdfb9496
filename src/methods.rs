//! Output methods the bridge renders its status through

use thiserror::Error;

use crate::registry::Lights;

mod writer;
pub use writer::*;

#[derive(Debug, Error)]
pub enum MethodError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Method {
    /// Display the status of every light
    fn write(&mut self, lights: &Lights) -> Result<(), MethodError>;

    /// Display a single informational line
    fn notice(&mut self, line: &str) -> Result<(), MethodError>;
}
