use std::fmt;

use async_trait::async_trait;

use crate::error::LinkError;

/// Byte-level link between the mock controller and the LCD unit.
#[async_trait]
pub trait Transport: Send + fmt::Debug {
    /// Writes one payload to the link.
    async fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Reads up to `len` bytes.
    ///
    /// Returns `Ok(None)` when the read timed out before any byte arrived. A
    /// short read returns the bytes received so far.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::StreamClosed`] once the link can never deliver
    /// more data.
    async fn read(&mut self, len: usize) -> Result<Option<Vec<u8>>, LinkError>;

    /// Human-readable link description used in logs and output.
    fn describe(&self) -> String;
}
