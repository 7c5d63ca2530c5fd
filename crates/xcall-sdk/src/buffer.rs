//! Little-endian marshaling buffers
//!
//! Array and string payloads are laid out as contiguous little-endian
//! buffers. [`BufferWriter`] builds them with fallible allocation and
//! [`BufferReader`] decodes them with bounds-checked reads.

use crate::error::{BoundaryError, BoundaryResult};

/// Writer for marshaling buffers
#[derive(Debug, Default)]
pub struct BufferWriter {
    buffer: Vec<u8>,
}

impl BufferWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a writer whose buffer holds exactly `capacity` bytes.
    ///
    /// Fails with [`BoundaryError::Allocation`] instead of aborting when the
    /// allocator refuses.
    pub fn with_capacity(capacity: usize) -> BoundaryResult<Self> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|e| BoundaryError::allocation(capacity, e))?;
        Ok(Self { buffer })
    }

    /// Bytes written so far
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Current offset (bytes written)
    pub fn offset(&self) -> usize {
        self.buffer.len()
    }

    /// Emit a single byte
    pub fn emit_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Emit a boolean as one byte (0 or 1)
    pub fn emit_bool(&mut self, value: bool) {
        self.buffer.push(value as u8);
    }

    /// Emit a 16-bit unsigned integer (little-endian)
    pub fn emit_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a 32-bit unsigned integer (little-endian)
    pub fn emit_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a 64-bit unsigned integer (little-endian)
    pub fn emit_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit an 8-bit signed integer
    pub fn emit_i8(&mut self, value: i8) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a 16-bit signed integer (little-endian)
    pub fn emit_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a 32-bit signed integer (little-endian)
    pub fn emit_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a 64-bit signed integer (little-endian)
    pub fn emit_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a 32-bit float, bit-exact
    pub fn emit_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a 64-bit float, bit-exact
    pub fn emit_f64(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a string as a u32 length prefix followed by its UTF-8 bytes
    pub fn emit_string(&mut self, value: &str) -> BoundaryResult<()> {
        let len = u32::try_from(value.len()).map_err(|_| {
            BoundaryError::allocation(value.len(), "string exceeds the u32 length prefix")
        })?;
        self.emit_u32(len);
        self.buffer.extend_from_slice(value.as_bytes());
        Ok(())
    }
}

/// Reader for marshaling buffers
pub struct BufferReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BufferReader<'a> {
    /// Create a reader at the start of `buffer`
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Current position in the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Whether any bytes are left
    pub fn has_more(&self) -> bool {
        self.position < self.buffer.len()
    }

    fn take<const N: usize>(&mut self) -> BoundaryResult<[u8; N]> {
        let bytes = self
            .buffer
            .get(self.position..self.position + N)
            .ok_or(BoundaryError::Truncated(self.position))?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.position += N;
        Ok(out)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> BoundaryResult<u8> {
        self.take::<1>().map(|b| b[0])
    }

    /// Read a boolean; any byte other than 0 or 1 is malformed
    pub fn read_bool(&mut self) -> BoundaryResult<bool> {
        let offset = self.position;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BoundaryError::Malformed(format!(
                "invalid bool byte {} at offset {}",
                other, offset
            ))),
        }
    }

    /// Read a 16-bit unsigned integer (little-endian)
    pub fn read_u16(&mut self) -> BoundaryResult<u16> {
        self.take().map(u16::from_le_bytes)
    }

    /// Read a 32-bit unsigned integer (little-endian)
    pub fn read_u32(&mut self) -> BoundaryResult<u32> {
        self.take().map(u32::from_le_bytes)
    }

    /// Read a 64-bit unsigned integer (little-endian)
    pub fn read_u64(&mut self) -> BoundaryResult<u64> {
        self.take().map(u64::from_le_bytes)
    }

    /// Read an 8-bit signed integer
    pub fn read_i8(&mut self) -> BoundaryResult<i8> {
        self.take().map(i8::from_le_bytes)
    }

    /// Read a 16-bit signed integer (little-endian)
    pub fn read_i16(&mut self) -> BoundaryResult<i16> {
        self.take().map(i16::from_le_bytes)
    }

    /// Read a 32-bit signed integer (little-endian)
    pub fn read_i32(&mut self) -> BoundaryResult<i32> {
        self.take().map(i32::from_le_bytes)
    }

    /// Read a 64-bit signed integer (little-endian)
    pub fn read_i64(&mut self) -> BoundaryResult<i64> {
        self.take().map(i64::from_le_bytes)
    }

    /// Read a 32-bit float
    pub fn read_f32(&mut self) -> BoundaryResult<f32> {
        self.take().map(f32::from_le_bytes)
    }

    /// Read a 64-bit float
    pub fn read_f64(&mut self) -> BoundaryResult<f64> {
        self.take().map(f64::from_le_bytes)
    }

    /// Read `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> BoundaryResult<&'a [u8]> {
        let bytes = self
            .buffer
            .get(self.position..self.position.saturating_add(len))
            .ok_or(BoundaryError::Truncated(self.position))?;
        self.position += len;
        Ok(bytes)
    }

    /// Read a u32-length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> BoundaryResult<String> {
        let len = self.read_u32()? as usize;
        let start = self.position;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| BoundaryError::InvalidUtf8(start + e.valid_up_to()))
    }
}
