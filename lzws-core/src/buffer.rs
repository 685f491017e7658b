//! Fixed-capacity destination buffer with a write cursor.
//!
//! The buffer is split into a produced region `[0, cursor)` holding bytes
//! ready to be drained and a free region `[cursor, capacity)` that the engine
//! writes into. Engines never see the cursor: they get [`free_mut`] as a
//! plain slice and report how many bytes they wrote, which the owner then
//! passes to [`advance`].
//!
//! [`free_mut`]: DestinationBuffer::free_mut
//! [`advance`]: DestinationBuffer::advance

use crate::error::{LzwsError, Result};

/// A fixed-capacity output buffer owned by a streaming session.
#[derive(Debug, Clone)]
pub struct DestinationBuffer {
    /// Backing storage; its length is the capacity and never changes.
    data: Box<[u8]>,
    /// End of the produced region.
    cursor: usize,
}

impl DestinationBuffer {
    /// Allocate a buffer of `capacity` bytes.
    ///
    /// The memory is reserved fallibly so that oversized requests surface as
    /// [`LzwsError::Allocation`] instead of aborting the process.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LzwsError::configuration(
                "destination buffer capacity must be greater than 0",
            ));
        }

        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|e| LzwsError::from_reserve(capacity, e))?;
        data.resize(capacity, 0);

        Ok(Self {
            data: data.into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of produced bytes waiting to be drained.
    pub fn len(&self) -> usize {
        self.cursor
    }

    /// Whether the produced region is empty.
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Number of bytes left in the free region.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Whether the free region is exhausted.
    pub fn is_full(&self) -> bool {
        self.cursor == self.data.len()
    }

    /// The produced region.
    pub fn produced(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    /// The free region, for the engine to write into.
    pub fn free_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.cursor..]
    }

    /// Mark `written` bytes of the free region as produced.
    ///
    /// An engine reporting more output than the free region could hold is an
    /// [`LzwsError::EngineFault`]; the cursor is left unchanged.
    pub fn advance(&mut self, written: usize) -> Result<()> {
        if written > self.remaining() {
            return Err(LzwsError::engine_fault(format!(
                "advance({}) past end of free region ({} bytes)",
                written,
                self.remaining()
            )));
        }
        self.cursor += written;
        Ok(())
    }

    /// Copy out the produced region and reset the buffer to fully free.
    pub fn take(&mut self) -> Vec<u8> {
        let produced = self.data[..self.cursor].to_vec();
        self.cursor = 0;
        produced
    }
}
