use std::io::Cursor;

use crate::{
    BinaryPacking, CodecToSlice, Composition, FastPFor, Integer, JustCopy, PforError, PforResult,
    VariableByte,
};

/// Type-erased wrapper for compression codecs.
///
/// Allows the registry to hand out different codec types through a unified
/// interface. Every variant implements the same symmetric encode/decode
/// contract over caller-owned buffers.
#[derive(Debug)]
pub enum Codec {
    /// [`FastPFor`] wrapped with a variable-byte tail
    FastPFor(Box<Composition<FastPFor>>),
    /// [`BinaryPacking`] wrapped with a variable-byte tail
    BinaryPacking(Composition<BinaryPacking>),
    /// [`VariableByte`] compression codec
    VariableByte(VariableByte),
    /// Pass-through codec (no compression)
    JustCopy(JustCopy),
}

impl Codec {
    /// Worst-case compressed size in words for `n` input integers.
    ///
    /// Size encode buffers with this; the block codecs round up to block and
    /// page boundaries, so the bound is a generous over-estimate rather than
    /// a tight one.
    pub fn max_compressed_words(&self, n: usize) -> usize {
        match self {
            Codec::FastPFor(_) => 2 * n + 1024,
            Codec::BinaryPacking(_) => n + n / 128 + 256,
            Codec::VariableByte(_) => 5 * n / 4 + 2,
            Codec::JustCopy(_) => n,
        }
    }
}

impl Integer for Codec {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        match self {
            Codec::FastPFor(c) => c.compress(input, input_length, input_offset, output, output_offset),
            Codec::BinaryPacking(c) => {
                c.compress(input, input_length, input_offset, output, output_offset)
            }
            Codec::VariableByte(vb) => {
                vb.compress(input, input_length, input_offset, output, output_offset)
            }
            Codec::JustCopy(jc) => {
                jc.compress(input, input_length, input_offset, output, output_offset)
            }
        }
    }

    fn uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        match self {
            Codec::FastPFor(c) => {
                c.uncompress(input, input_length, input_offset, output, output_offset)
            }
            Codec::BinaryPacking(c) => {
                c.uncompress(input, input_length, input_offset, output, output_offset)
            }
            Codec::VariableByte(vb) => {
                vb.uncompress(input, input_length, input_offset, output, output_offset)
            }
            Codec::JustCopy(jc) => {
                jc.uncompress(input, input_length, input_offset, output, output_offset)
            }
        }
    }
}

impl CodecToSlice<u32> for Codec {
    type Error = PforError;

    fn compress_to_slice<'out>(
        &mut self,
        input: &[u32],
        output: &'out mut [u32],
    ) -> Result<&'out [u32], Self::Error> {
        let mut output_offset = Cursor::new(0);
        let input_length = input
            .len()
            .try_into()
            .map_err(|_| PforError::InvalidLength(input.len()))?;

        self.compress(
            input,
            input_length,
            &mut Cursor::new(0),
            output,
            &mut output_offset,
        )?;

        let written = output_offset.position() as usize;
        Ok(&output[..written])
    }

    fn decompress_to_slice<'out>(
        &mut self,
        input: &[u32],
        output: &'out mut [u32],
    ) -> Result<&'out [u32], Self::Error> {
        let mut output_offset = Cursor::new(0);
        let input_length: u32 = input
            .len()
            .try_into()
            .map_err(|_| PforError::InvalidLength(input.len()))?;

        self.uncompress(
            input,
            input_length,
            &mut Cursor::new(0),
            output,
            &mut output_offset,
        )?;

        let written = output_offset.position() as usize;
        Ok(&output[..written])
    }
}

impl From<Composition<FastPFor>> for Codec {
    fn from(composition: Composition<FastPFor>) -> Self {
        Codec::FastPFor(Box::new(composition))
    }
}

impl From<Composition<BinaryPacking>> for Codec {
    fn from(composition: Composition<BinaryPacking>) -> Self {
        Codec::BinaryPacking(composition)
    }
}

impl From<VariableByte> for Codec {
    fn from(vb: VariableByte) -> Self {
        Codec::VariableByte(vb)
    }
}

impl From<JustCopy> for Codec {
    fn from(jc: JustCopy) -> Self {
        Codec::JustCopy(jc)
    }
}
