use std::io::Cursor;

use bytes::{Buf as _, BufMut as _, BytesMut};

use crate::cursor::IncrementCursor;
use crate::integer_compression::helpers;
use crate::{Integer, PforError, PforResult, Skippable};

/// Variable-byte codec: each integer is stored in 1-5 bytes, 7 payload bits
/// per byte, high bit set on continuation bytes.
///
/// The byte stream is padded with `0xFF` to the next word boundary; pad bytes
/// decode as an unterminated value and are discarded. Has no block-alignment
/// requirement, which makes it the tail codec of choice for
/// [`Composition`](crate::Composition).
#[derive(Debug)]
pub struct VariableByte;

impl VariableByte {
    /// Creates a new instance
    pub fn new() -> VariableByte {
        VariableByte
    }

    /// Appends the variable-byte encoding of `val` to `buf`.
    fn put_encoded(buf: &mut BytesMut, val: u32) {
        if val < (1 << 7) {
            buf.put_u8((val & 0x7F) as u8);
        } else if val < (1 << 14) {
            buf.put_u8(((val & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((val >> 7) as u8);
        } else if val < (1 << 21) {
            buf.put_u8(((val & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((((val >> 7) & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((val >> 14) as u8);
        } else if val < (1 << 28) {
            buf.put_u8(((val & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((((val >> 7) & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((((val >> 14) & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((val >> 21) as u8);
        } else {
            buf.put_u8(((val & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((((val >> 7) & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((((val >> 14) & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((((val >> 21) & 0x7F) | (1 << 7)) as u8);
            buf.put_u8((val >> 28) as u8);
        }
    }

    /// Decodes up to `limit` values from `byte_length` bytes of the word
    /// stream starting at `start_word`. Returns `(values, bytes_consumed)`.
    fn decode_bytes(
        input: &[u32],
        start_word: usize,
        byte_length: usize,
        output: &mut [u32],
        out_start: usize,
        limit: usize,
    ) -> PforResult<(usize, usize)> {
        // Little-endian byte view over the word stream
        let byte_at = |i: usize| -> u8 { (input[start_word + i / 4] >> ((i % 4) * 8)) as u8 };

        let mut out_pos = out_start;
        let mut v: u32 = 0;
        let mut shift: u32 = 0;
        let mut byte_pos = 0;
        while byte_pos < byte_length && out_pos - out_start < limit {
            if shift > 28 {
                return Err(PforError::MalformedInput(
                    "variable-byte run exceeds 5 bytes",
                ));
            }
            let c = byte_at(byte_pos);
            byte_pos += 1;
            v |= u32::from(c & 0x7F) << shift;
            if c < 128 {
                helpers::ensure_capacity(out_pos + 1, output.len())?;
                output[out_pos] = v;
                out_pos += 1;
                v = 0;
                shift = 0;
            } else {
                shift += 7;
            }
        }
        Ok((out_pos - out_start, byte_pos))
    }
}

impl Default for VariableByte {
    fn default() -> Self {
        VariableByte::new()
    }
}

impl Skippable for VariableByte {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        if input_length == 0 {
            // Return early if there is no data to compress
            return Ok(());
        }
        let mut buf = BytesMut::with_capacity(input_length as usize * 5);
        for k in input_offset.position()..(input_offset.position() + u64::from(input_length)) {
            VariableByte::put_encoded(&mut buf, input[k as usize]);
        }
        while buf.len() % 4 != 0 {
            buf.put_u8(0xFF);
        }
        let words = buf.len() / 4;
        let out_pos = output_offset.position() as usize;
        helpers::ensure_capacity(out_pos + words, output.len())?;
        for it in output.iter_mut().skip(out_pos).take(words) {
            *it = buf.get_u32_le();
        }
        output_offset.add(words as u32);
        input_offset.add(input_length);

        Ok(())
    }

    fn headless_uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        num: u32,
    ) -> PforResult<()> {
        let start_word = input_offset.position() as usize;
        let byte_length = input_length as usize * 4;
        helpers::check_input(start_word + input_length as usize, input.len(), "truncated")?;
        let (values, bytes) = VariableByte::decode_bytes(
            input,
            start_word,
            byte_length,
            output,
            output_offset.position() as usize,
            num as usize,
        )?;
        if values < num as usize {
            return Err(PforError::MalformedInput(
                "variable-byte stream ended before expected count",
            ));
        }
        input_offset.add(bytes.div_ceil(4) as u32);
        output_offset.add(num);
        Ok(())
    }
}

impl Integer for VariableByte {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        self.headless_compress(input, input_length, input_offset, output, output_offset)
    }

    fn uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        if input_length == 0 {
            return Ok(());
        }
        let start_word = input_offset.position() as usize;
        helpers::check_input(start_word + input_length as usize, input.len(), "truncated")?;
        let (values, _) = VariableByte::decode_bytes(
            input,
            start_word,
            input_length as usize * 4,
            output,
            output_offset.position() as usize,
            usize::MAX,
        )?;
        output_offset.add(values as u32);
        input_offset.add(input_length);
        Ok(())
    }
}
