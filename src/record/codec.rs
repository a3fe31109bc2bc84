use byteorder::{ByteOrder, LittleEndian};

use super::RecordError;

/// Sequential little-endian encoder for one record.
///
/// Fixed fields are written in layout order; variable-length fields write a
/// `(count, heap offset)` slot and push their values onto the heap, which is
/// appended after the fixed part by [`RecordWriter::finish`].
pub(crate) struct RecordWriter {
    fixed: Vec<u8>,
    heap: Vec<u8>,
    fixed_size: usize,
}

impl RecordWriter {
    pub(crate) fn new(fixed_size: usize) -> Self {
        Self {
            fixed: Vec::with_capacity(fixed_size),
            heap: Vec::new(),
            fixed_size,
        }
    }

    pub(crate) fn put_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.fixed.extend_from_slice(&buf);
    }

    pub(crate) fn put_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.fixed.extend_from_slice(&buf);
    }

    pub(crate) fn put_u64(&mut self, value: u64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, value);
        self.fixed.extend_from_slice(&buf);
    }

    pub(crate) fn put_i32(&mut self, value: i32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_i32(&mut buf, value);
        self.fixed.extend_from_slice(&buf);
    }

    pub(crate) fn put_f32(&mut self, value: f32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_f32(&mut buf, value);
        self.fixed.extend_from_slice(&buf);
    }

    pub(crate) fn put_u16_array(&mut self, values: &[u16]) {
        values.iter().for_each(|v| self.put_u16(*v));
    }

    pub(crate) fn put_u32_array(&mut self, values: &[u32]) {
        values.iter().for_each(|v| self.put_u32(*v));
    }

    pub(crate) fn put_u64_array(&mut self, values: &[u64]) {
        values.iter().for_each(|v| self.put_u64(*v));
    }

    pub(crate) fn put_i32_array(&mut self, values: &[i32]) {
        values.iter().for_each(|v| self.put_i32(*v));
    }

    pub(crate) fn put_f32_array(&mut self, values: &[f32]) {
        values.iter().for_each(|v| self.put_f32(*v));
    }

    /// Variable-length float sequence
    pub(crate) fn put_var_f32(&mut self, values: &[f32]) {
        let offset = self.heap.len();
        self.heap.resize(offset + values.len() * 4, 0);
        LittleEndian::write_f32_into(values, &mut self.heap[offset..]);
        self.put_u64(values.len() as u64);
        self.put_u64(offset as u64);
    }

    /// Variable-length UTF-8 string
    pub(crate) fn put_var_str(&mut self, value: &str) {
        let offset = self.heap.len();
        self.heap.extend_from_slice(value.as_bytes());
        self.put_u64(value.len() as u64);
        self.put_u64(offset as u64);
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        debug_assert_eq!(self.fixed.len(), self.fixed_size, "layout size drift");
        self.fixed.append(&mut self.heap);
        self.fixed
    }
}

/// Sequential little-endian decoder, the inverse of [`RecordWriter`]
pub(crate) struct RecordReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    fixed_size: usize,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(bytes: &'a [u8], fixed_size: usize) -> Result<Self, RecordError> {
        if bytes.len() < fixed_size {
            return Err(RecordError::Truncated {
                needed: fixed_size,
                available: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            pos: 0,
            fixed_size,
        })
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], RecordError> {
        let end = self.pos + n;
        if end > self.fixed_size {
            return Err(RecordError::Truncated {
                needed: end,
                available: self.fixed_size,
            });
        }
        let bytes = self.bytes;
        let slice = &bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn get_u16(&mut self) -> Result<u16, RecordError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub(crate) fn get_u32(&mut self) -> Result<u32, RecordError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub(crate) fn get_u64(&mut self) -> Result<u64, RecordError> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub(crate) fn get_i32(&mut self) -> Result<i32, RecordError> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub(crate) fn get_f32(&mut self) -> Result<f32, RecordError> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub(crate) fn get_u16_array<const N: usize>(&mut self) -> Result<[u16; N], RecordError> {
        let mut out = [0u16; N];
        LittleEndian::read_u16_into(self.take(N * 2)?, &mut out);
        Ok(out)
    }

    pub(crate) fn get_u32_array<const N: usize>(&mut self) -> Result<[u32; N], RecordError> {
        let mut out = [0u32; N];
        LittleEndian::read_u32_into(self.take(N * 4)?, &mut out);
        Ok(out)
    }

    pub(crate) fn get_u64_array<const N: usize>(&mut self) -> Result<[u64; N], RecordError> {
        let mut out = [0u64; N];
        LittleEndian::read_u64_into(self.take(N * 8)?, &mut out);
        Ok(out)
    }

    pub(crate) fn get_i32_array<const N: usize>(&mut self) -> Result<[i32; N], RecordError> {
        let mut out = [0i32; N];
        LittleEndian::read_i32_into(self.take(N * 4)?, &mut out);
        Ok(out)
    }

    pub(crate) fn get_f32_array<const N: usize>(&mut self) -> Result<[f32; N], RecordError> {
        let mut out = [0f32; N];
        LittleEndian::read_f32_into(self.take(N * 4)?, &mut out);
        Ok(out)
    }

    fn heap_slice(&mut self, field: &'static str, width: usize) -> Result<&'a [u8], RecordError> {
        let count = self.get_u64()?;
        let offset = self.get_u64()?;
        let bytes = self.bytes;
        let heap = &bytes[self.fixed_size..];
        let start = usize::try_from(offset).ok();
        let len = usize::try_from(count).ok().and_then(|c| c.checked_mul(width));
        match (start, len) {
            (Some(start), Some(len)) if start.checked_add(len).is_some_and(|end| end <= heap.len()) => {
                Ok(&heap[start..start + len])
            }
            _ => Err(RecordError::HeapOutOfBounds {
                field,
                offset,
                count,
                heap_len: heap.len(),
            }),
        }
    }

    pub(crate) fn get_var_f32(&mut self, field: &'static str) -> Result<Vec<f32>, RecordError> {
        let raw = self.heap_slice(field, 4)?;
        let mut out = vec![0f32; raw.len() / 4];
        LittleEndian::read_f32_into(raw, &mut out);
        Ok(out)
    }

    pub(crate) fn get_var_str(&mut self, field: &'static str) -> Result<String, RecordError> {
        let raw = self.heap_slice(field, 1)?;
        String::from_utf8(raw.to_vec()).map_err(|_| RecordError::InvalidUtf8(field))
    }
}
