use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::helpers;
use crate::{Integer, PforResult, Skippable};

/// Pass-through codec: output words are the input integers, unchanged.
///
/// Useful as a baseline and for data that is already incompressible.
#[derive(Debug)]
pub struct JustCopy;

impl JustCopy {
    /// Creates a new instance
    pub fn new() -> JustCopy {
        JustCopy
    }

    fn copy(
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        let n = input_length as usize;
        let in_pos = input_offset.position() as usize;
        let out_pos = output_offset.position() as usize;
        helpers::ensure_capacity(out_pos + n, output.len())?;
        output[out_pos..out_pos + n].copy_from_slice(&input[in_pos..in_pos + n]);
        input_offset.add(input_length);
        output_offset.add(input_length);
        Ok(())
    }
}

impl Default for JustCopy {
    fn default() -> Self {
        JustCopy::new()
    }
}

impl Integer for JustCopy {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        JustCopy::copy(input, input_length, input_offset, output, output_offset)
    }

    fn uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        JustCopy::copy(input, input_length, input_offset, output, output_offset)
    }
}

impl Skippable for JustCopy {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        JustCopy::copy(input, input_length, input_offset, output, output_offset)
    }

    fn headless_uncompress(
        &mut self,
        input: &[u32],
        _input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        num: u32,
    ) -> PforResult<()> {
        JustCopy::copy(input, num, input_offset, output, output_offset)
    }
}
