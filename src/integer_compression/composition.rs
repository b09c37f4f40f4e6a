use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::helpers;
use crate::{Integer, PforError, PforResult, VariableByte};

/// Pairs a block-structured codec with a variable-byte tail codec.
///
/// The first codec consumes the largest block-aligned prefix it accepts;
/// whatever remains goes through [`VariableByte`], which has no alignment
/// requirement. The pairing therefore round-trips every input length while
/// keeping the block codec's ratio on the bulk of the data.
///
/// When the whole input is shorter than one block the prefix codec consumes
/// nothing; an explicit empty frame (a single zero word) is written in its
/// place so the decoder always finds a frame to read.
#[derive(Debug)]
pub struct Composition<F> {
    first: F,
    second: VariableByte,
}

impl<F> Composition<F> {
    /// Creates a composition of `first` for block-aligned data and `second`
    /// for the tail.
    pub fn new(first: F, second: VariableByte) -> Composition<F> {
        Composition { first, second }
    }
}

impl<F: Integer> Integer for Composition<F> {
    fn compress(
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
        let init_in = input_offset.position();
        self.first
            .compress(input, input_length, input_offset, output, output_offset)?;
        let consumed = (input_offset.position() - init_in) as u32;
        if consumed == 0 {
            let out_pos = output_offset.position() as usize;
            helpers::ensure_capacity(out_pos + 1, output.len())?;
            output[out_pos] = 0;
            output_offset.increment();
        }
        self.second.compress(
            input,
            input_length - consumed,
            input_offset,
            output,
            output_offset,
        )
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
        let init_in = input_offset.position();
        self.first
            .uncompress(input, input_length, input_offset, output, output_offset)?;
        let consumed = input_offset.position() - init_in;
        let remaining = u64::from(input_length)
            .checked_sub(consumed)
            .ok_or(PforError::MalformedInput("prefix codec overran the stream"))?
            as u32;
        self.second
            .uncompress(input, remaining, input_offset, output, output_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integer_compression::bitpacking::Packing;
    use crate::{FastPFor, BLOCK_SIZE_128, DEFAULT_PAGE_SIZE};

    fn roundtrip(data: &[u32]) {
        let mut codec = Composition::new(
            FastPFor::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_128, Packing::Scalar),
            VariableByte::new(),
        );
        let mut compressed = vec![0u32; data.len() * 2 + 1024];
        let mut outpos = Cursor::new(0);
        codec
            .compress(
                data,
                data.len() as u32,
                &mut Cursor::new(0),
                &mut compressed,
                &mut outpos,
            )
            .unwrap();
        let compressed_len = outpos.position() as u32;

        let mut decoded = vec![0u32; data.len()];
        let mut outpos = Cursor::new(0);
        codec
            .uncompress(
                &compressed,
                compressed_len,
                &mut Cursor::new(0),
                &mut decoded,
                &mut outpos,
            )
            .unwrap();
        assert_eq!(outpos.position() as usize, data.len());
        assert_eq!(decoded, data);
    }

    #[test]
    fn roundtrip_tail_only() {
        // Shorter than one block: everything goes through the tail codec
        roundtrip(&[1, 2, 3]);
    }

    #[test]
    fn roundtrip_block_plus_tail() {
        let data: Vec<u32> = (0..129u32).collect();
        roundtrip(&data);
    }

    #[test]
    fn roundtrip_exact_blocks() {
        let data: Vec<u32> = (0..256u32).map(|i| i * 7).collect();
        roundtrip(&data);
    }

    #[test]
    fn roundtrip_empty() {
        roundtrip(&[]);
    }

    #[test]
    fn tail_only_writes_empty_frame() {
        let data = [9u32, 8, 7];
        let mut codec = Composition::new(
            FastPFor::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_128, Packing::Scalar),
            VariableByte::new(),
        );
        let mut compressed = vec![0u32; 64];
        let mut outpos = Cursor::new(0);
        codec
            .compress(
                &data,
                3,
                &mut Cursor::new(0),
                &mut compressed,
                &mut outpos,
            )
            .unwrap();
        assert_eq!(compressed[0], 0, "empty prefix frame expected");
        assert_eq!(outpos.position(), 2);
    }
}
