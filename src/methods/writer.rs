use std::io::{self, Write};

use super::{Method, MethodError};
use crate::{registry::Lights, status};

/// Method that writes the status as text lines
pub struct Writer<W> {
    inner: W,
    /// Use ANSI escapes for colors
    ansi: bool,
}

pub type Stdout = Writer<io::Stdout>;

impl Stdout {
    pub fn stdout(ansi: bool) -> Self {
        Self::new(io::stdout(), ansi)
    }
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W, ansi: bool) -> Self {
        Self { inner, ansi }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Method for Writer<W> {
    fn write(&mut self, lights: &Lights) -> Result<(), MethodError> {
        for line in status::status_lines(lights, self.ansi) {
            writeln!(self.inner, "{}", line)?;
        }

        // Blank line between successive frames
        writeln!(self.inner)?;
        self.inner.flush()?;
        Ok(())
    }

    fn notice(&mut self, line: &str) -> Result<(), MethodError> {
        writeln!(self.inner, "{}", line)?;
        self.inner.flush()?;
        Ok(())
    }
}
