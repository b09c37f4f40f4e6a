use std::io::Cursor;

use crate::cursor::IncrementCursor;
use crate::integer_compression::bitpacking::{self, Packing};
use crate::integer_compression::helpers;
use crate::{Integer, PforError, PforResult, Skippable};

/// Integers per meta-block: one descriptor word covers this many values.
const META_BLOCK_SIZE: u32 = 128;

/// Plain binary packing codec (BP32).
///
/// Works in meta-blocks of 128 integers. With [`Packing::Scalar`] each
/// meta-block stores one descriptor word carrying the bit widths of its four
/// 32-value groups, followed by the groups packed at their own widths. With
/// [`Packing::Interleaved`] the descriptor carries a single width and the
/// whole meta-block is packed across 4 lanes at that width.
///
/// No exception machinery: a single wide outlier widens its whole group, so
/// this codec shines on smooth data and serves as the baseline the patched
/// schemes improve on. Only 128-aligned prefixes are consumed; wrap in a
/// [`Composition`](crate::Composition) for arbitrary lengths.
#[derive(Debug)]
pub struct BinaryPacking {
    packing: Packing,
}

impl BinaryPacking {
    /// Creates a codec using the given payload layout.
    pub fn new(packing: Packing) -> BinaryPacking {
        BinaryPacking { packing }
    }

    fn width_of(input: &[u32], pos: usize, len: usize) -> u8 {
        let combined = input[pos..pos + len].iter().fold(0u32, |acc, &v| acc | v);
        (32 - combined.leading_zeros()) as u8
    }
}

impl Skippable for BinaryPacking {
    fn headless_compress(
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
        if input_length % META_BLOCK_SIZE != 0 {
            return Err(PforError::InvalidLength(input_length as usize));
        }
        let mut tmp_input_offset = input_offset.position() as u32;
        let final_input_offset = tmp_input_offset + input_length;
        let mut tmp_output_offset = output_offset.position() as u32;

        while tmp_input_offset < final_input_offset {
            match self.packing {
                Packing::Scalar => {
                    let widths: [u8; 4] = std::array::from_fn(|i| {
                        BinaryPacking::width_of(input, tmp_input_offset as usize + 32 * i, 32)
                    });
                    let payload: u32 = widths.iter().map(|&b| u32::from(b)).sum();
                    helpers::ensure_capacity(
                        (tmp_output_offset + 1 + payload) as usize,
                        output.len(),
                    )?;
                    output[tmp_output_offset as usize] = u32::from_be_bytes(widths);
                    tmp_output_offset += 1;
                    for (i, &b) in widths.iter().enumerate() {
                        bitpacking::fast_pack(
                            input,
                            tmp_input_offset as usize + 32 * i,
                            output,
                            tmp_output_offset as usize,
                            b,
                        );
                        tmp_output_offset += u32::from(b);
                    }
                }
                Packing::Interleaved => {
                    let b = BinaryPacking::width_of(input, tmp_input_offset as usize, 128);
                    helpers::ensure_capacity(
                        (tmp_output_offset + 1 + 4 * u32::from(b)) as usize,
                        output.len(),
                    )?;
                    output[tmp_output_offset as usize] = u32::from(b);
                    tmp_output_offset += 1;
                    bitpacking::fast_pack4(
                        input,
                        tmp_input_offset as usize,
                        output,
                        tmp_output_offset as usize,
                        b,
                    );
                    tmp_output_offset += 4 * u32::from(b);
                }
            }
            tmp_input_offset += META_BLOCK_SIZE;
        }
        input_offset.set_position(u64::from(final_input_offset));
        output_offset.set_position(u64::from(tmp_output_offset));
        Ok(())
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
        let mut tmp_output_offset = output_offset.position() as u32;
        let final_output_offset =
            tmp_output_offset + helpers::greatest_multiple(num, META_BLOCK_SIZE);
        helpers::ensure_capacity(final_output_offset as usize, output.len())?;
        let mut tmp_input_offset = input_offset.position() as u32;

        while tmp_output_offset < final_output_offset {
            helpers::check_input(
                tmp_input_offset as usize + 1,
                input.len(),
                "block descriptor truncated",
            )?;
            let descriptor = input[tmp_input_offset as usize];
            tmp_input_offset += 1;
            match self.packing {
                Packing::Scalar => {
                    let widths = descriptor.to_be_bytes();
                    if widths.iter().any(|&b| b > 32) {
                        return Err(PforError::MalformedInput("group bit width out of range"));
                    }
                    let payload: u32 = widths.iter().map(|&b| u32::from(b)).sum();
                    helpers::check_input(
                        (tmp_input_offset + payload) as usize,
                        input.len(),
                        "block payload truncated",
                    )?;
                    for (i, &b) in widths.iter().enumerate() {
                        bitpacking::fast_unpack(
                            input,
                            tmp_input_offset as usize,
                            output,
                            tmp_output_offset as usize + 32 * i,
                            b,
                        );
                        tmp_input_offset += u32::from(b);
                    }
                }
                Packing::Interleaved => {
                    if descriptor > 32 {
                        return Err(PforError::MalformedInput("block bit width out of range"));
                    }
                    let b = descriptor as u8;
                    helpers::check_input(
                        (tmp_input_offset + 4 * descriptor) as usize,
                        input.len(),
                        "block payload truncated",
                    )?;
                    bitpacking::fast_unpack4(
                        input,
                        tmp_input_offset as usize,
                        output,
                        tmp_output_offset as usize,
                        b,
                    );
                    tmp_input_offset += 4 * descriptor;
                }
            }
            tmp_output_offset += META_BLOCK_SIZE;
        }
        input_offset.set_position(u64::from(tmp_input_offset));
        output_offset.set_position(u64::from(tmp_output_offset));
        Ok(())
    }
}

impl Integer for BinaryPacking {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        let inlength = helpers::greatest_multiple(input_length, META_BLOCK_SIZE);
        if inlength == 0 {
            return Ok(());
        }
        let out_pos = output_offset.position() as usize;
        helpers::ensure_capacity(out_pos + 1, output.len())?;
        output[out_pos] = inlength;
        output_offset.increment();
        self.headless_compress(input, inlength, input_offset, output, output_offset)
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
        let in_pos = input_offset.position() as usize;
        helpers::check_input(in_pos + 1, input.len(), "length header truncated")?;
        let outlength = input[in_pos];
        input_offset.increment();
        helpers::ensure_capacity(
            output_offset.position() as usize + outlength as usize,
            output.len(),
        )?;
        self.headless_uncompress(
            input,
            input_length - 1,
            input_offset,
            output,
            output_offset,
            outlength,
        )
    }
}
