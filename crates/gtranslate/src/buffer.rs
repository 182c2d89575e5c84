//! Growable response buffer fed by the transport's body sink.

use crate::transport::BodySink;
use crate::types::{TranslateError, TranslateResult};

/// Initial capacity allocated on a session's first execution.
pub const DEFAULT_CAPACITY: usize = 8192;

/// Append-only byte buffer with amortized doubling growth.
///
/// Once allocated, `capacity >= len + 1` holds and the byte at `len` is a
/// NUL terminator. `len` is the authoritative size; the terminator is never
/// used to find the end of the data.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    bytes: Vec<u8>,
    len: usize,
    capacity: usize,
}

impl ResponseBuffer {
    /// Create an empty, unallocated buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with `capacity` bytes allocated up front.
    pub fn with_capacity(capacity: usize) -> TranslateResult<Self> {
        let mut buf = Self::new();
        buf.reserve(capacity)?;
        Ok(buf)
    }

    /// Ensure at least `min_capacity` bytes are allocated.
    ///
    /// On failure the buffer is left exactly as it was.
    pub fn reserve(&mut self, min_capacity: usize) -> TranslateResult<()> {
        let min_capacity = min_capacity.max(self.len + 1);
        if min_capacity <= self.capacity {
            return Ok(());
        }

        let additional = min_capacity - self.bytes.len();
        self.bytes.try_reserve_exact(additional).map_err(|e| {
            TranslateError::Allocation(format!(
                "cannot grow response buffer to {min_capacity} bytes: {e}"
            ))
        })?;
        self.bytes.resize(min_capacity, 0);
        self.capacity = min_capacity;
        Ok(())
    }

    /// Append `data`, growing to `capacity * 2 + 1` as many times as needed.
    pub fn append(&mut self, data: &[u8]) -> TranslateResult<()> {
        let required = self
            .len
            .checked_add(data.len())
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| TranslateError::Allocation("response size overflow".to_string()))?;

        if required > self.capacity {
            let mut new_capacity = self.capacity;
            while new_capacity < required {
                new_capacity = new_capacity.saturating_mul(2).saturating_add(1);
            }
            self.reserve(new_capacity)?;
        }

        let end = self.len + data.len();
        self.bytes[self.len..end].copy_from_slice(data);
        self.bytes[end] = 0;
        self.len = end;
        Ok(())
    }

    /// Forget the contents but keep the allocation for the next request.
    pub fn reset(&mut self) {
        self.len = 0;
        if let Some(first) = self.bytes.first_mut() {
            *first = 0;
        }
    }

    /// The valid bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_allocated(&self) -> bool {
        self.capacity > 0
    }
}

impl BodySink for ResponseBuffer {
    fn write(&mut self, chunk: &[u8]) -> TranslateResult<()> {
        self.append(chunk)
    }
}
