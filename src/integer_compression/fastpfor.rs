use std::io::Cursor;
use std::num::NonZeroU32;

use bytes::{Buf as _, BufMut as _, BytesMut};
use log::trace;

use crate::cursor::IncrementCursor;
use crate::integer_compression::bitpacking::{self, Packing};
use crate::integer_compression::helpers;
use crate::{Integer, PforError, PforResult, Skippable};

/// Block size constant for 256 integers per block
pub const BLOCK_SIZE_256: NonZeroU32 = NonZeroU32::new(256).unwrap();

/// Block size constant for 128 integers per block
pub const BLOCK_SIZE_128: NonZeroU32 = NonZeroU32::new(128).unwrap();

/// Overhead cost (in bits) for storing each exception's position in the block
const OVERHEAD_OF_EACH_EXCEPT: u32 = 8;

/// Default page size in number of integers
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(65536).unwrap();

/// Patched Frame-of-Reference integer compression codec.
///
/// The algorithm works by
/// - dividing data into blocks of 128 or 256 integers,
/// - choosing the bit width that minimizes total storage for each block, and
/// - handling exceptions (values requiring more bits) separately: their high
///   bits are collected into per-width side lists, bit-packed, and patched
///   back in during decode.
///
/// With [`Packing::Interleaved`] the block payload is laid out across 4
/// lanes, which makes the decode loop stride-parallel; the per-block
/// decisions and therefore the compression ratio are identical to the
/// scalar layout.
///
/// Only block-aligned prefixes are consumed; wrap the codec in a
/// [`Composition`](crate::Composition) to handle arbitrary lengths.
#[derive(Debug)]
pub struct FastPFor {
    /// Exception values indexed by bit width difference
    data_to_be_packed: [Vec<u32>; 33],
    /// Metadata buffer for encoding/decoding
    bytes_container: BytesMut,
    /// Maximum integers per page
    page_size: u32,
    /// Position trackers for exception arrays
    data_pointers: [usize; 33],
    /// Frequency count for each bit width:
    /// `freqs[i]` = count of values needing exactly i bits
    freqs: [u32; 33],
    /// Bit width chosen for the current block
    best_bits: u32,
    /// Number of exceptions that don't fit in the chosen bit width
    exception_count: u32,
    /// Maximum bit width required for any value in the block
    max_bits: u32,
    /// Integers per block (128 or 256)
    block_size: u32,
    /// Payload word layout
    packing: Packing,
}

impl Skippable for FastPFor {
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        if input_length % self.block_size != 0 {
            return Err(PforError::InvalidLength(input_length as usize));
        }
        let final_inpos = input_offset.position() as u32 + input_length;
        while (input_offset.position() as u32) < final_inpos {
            let this_size =
                std::cmp::min(self.page_size, final_inpos - input_offset.position() as u32);
            self.encode_page(input, this_size, input_offset, output, output_offset)?;
        }
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
        let total = helpers::greatest_multiple(num, self.block_size);
        let final_out = output_offset.position() as u32 + total;
        helpers::ensure_capacity(final_out as usize, output.len())?;
        while (output_offset.position() as u32) < final_out {
            let this_size =
                std::cmp::min(self.page_size, final_out - output_offset.position() as u32);
            self.decode_page(input, input_offset, output, output_offset, this_size)?;
        }
        Ok(())
    }
}

impl Integer for FastPFor {
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        let inlength = helpers::greatest_multiple(input_length, self.block_size);
        if inlength == 0 {
            // Return early if there is no block-aligned data to compress
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
            // Return early if there is no data to uncompress
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

impl Default for FastPFor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_256, Packing::Scalar)
    }
}

impl FastPFor {
    /// Creates a codec with the given page size, block size, and payload layout.
    ///
    /// Pre-allocates buffers for metadata and exception storage. An
    /// interleaved layout requires the block size to be a multiple of 128.
    pub fn new(page_size: NonZeroU32, block_size: NonZeroU32, packing: Packing) -> FastPFor {
        let page_size = page_size.get();
        let block_size = block_size.get();
        debug_assert!(
            packing == Packing::Scalar || block_size % 128 == 0,
            "interleaved layout needs 128-aligned blocks"
        );
        debug_assert!(
            page_size % block_size == 0,
            "page size must be a multiple of the block size"
        );
        FastPFor {
            page_size,
            block_size,
            packing,
            bytes_container: BytesMut::with_capacity(
                (3 * page_size / block_size + page_size) as usize,
            ),
            data_to_be_packed: std::array::from_fn(|_| vec![0; page_size as usize / 32 * 4]),
            data_pointers: [0; 33],
            freqs: [0; 33],
            best_bits: 0,
            exception_count: 0,
            max_bits: 0,
        }
    }

    /// Encodes one page.
    ///
    /// For each block:
    /// - Determines the cheapest bit width, bitpacks regular values,
    /// - Collects exception high bits with their positions.
    ///
    /// Then writes, after the packed payload: a metadata byte stream
    /// (width, exception count, and positions per block) and the per-width
    /// exception side lists. The page starts with one word locating the
    /// metadata.
    ///
    /// # Arguments
    /// * `this_size` - Must be a multiple of `block_size`
    /// * `input_offset` - Advanced by `this_size`
    /// * `output_offset` - Advanced by the compressed size
    fn encode_page(
        &mut self,
        input: &[u32],
        this_size: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()> {
        let header_pos = output_offset.position() as usize;
        helpers::ensure_capacity(header_pos + 1, output.len())?;
        output_offset.increment();
        let mut tmp_output_offset = output_offset.position() as u32;

        self.data_pointers.fill(0);
        self.bytes_container.clear();

        let mut tmp_input_offset = input_offset.position() as u32;
        let final_input_offset = tmp_input_offset + this_size - self.block_size;
        while tmp_input_offset <= final_input_offset {
            self.choose_best_bits(input, tmp_input_offset);
            let best_b = self.best_bits;
            self.bytes_container.put_u8(best_b as u8);
            self.bytes_container.put_u8(self.exception_count as u8);
            if self.exception_count > 0 {
                self.bytes_container.put_u8(self.max_bits as u8);
                let index = (self.max_bits - best_b) as usize;
                if self.data_pointers[index] + self.exception_count as usize
                    >= self.data_to_be_packed[index].len()
                {
                    let mut new_size =
                        2 * (self.data_pointers[index] + self.exception_count as usize) as u32;
                    new_size = helpers::greatest_multiple(new_size + 31, 32);
                    self.data_to_be_packed[index].resize(new_size as usize, 0);
                }
                for k in 0..self.block_size {
                    if (input[(k + tmp_input_offset) as usize] >> best_b) != 0 {
                        self.bytes_container.put_u8(k as u8);
                        self.data_to_be_packed[index][self.data_pointers[index]] =
                            input[(k + tmp_input_offset) as usize] >> best_b;
                        self.data_pointers[index] += 1;
                    }
                }
            }
            let payload_words = best_b * self.block_size / 32;
            helpers::ensure_capacity((tmp_output_offset + payload_words) as usize, output.len())?;
            match self.packing {
                Packing::Scalar => {
                    for k in (0..self.block_size).step_by(32) {
                        bitpacking::fast_pack(
                            input,
                            (tmp_input_offset + k) as usize,
                            output,
                            tmp_output_offset as usize,
                            best_b as u8,
                        );
                        tmp_output_offset += best_b;
                    }
                }
                Packing::Interleaved => {
                    for k in (0..self.block_size).step_by(128) {
                        bitpacking::fast_pack4(
                            input,
                            (tmp_input_offset + k) as usize,
                            output,
                            tmp_output_offset as usize,
                            best_b as u8,
                        );
                        tmp_output_offset += 4 * best_b;
                    }
                }
            }
            tmp_input_offset += self.block_size;
        }
        input_offset.set_position(u64::from(tmp_input_offset));
        output[header_pos] = tmp_output_offset - header_pos as u32;

        let byte_size = self.bytes_container.len();
        while (self.bytes_container.len() & 3) != 0 {
            self.bytes_container.put_u8(0);
        }
        let how_many_ints = self.bytes_container.len() / 4;
        helpers::ensure_capacity(
            tmp_output_offset as usize + 1 + how_many_ints + 1,
            output.len(),
        )?;
        output[tmp_output_offset as usize] = byte_size as u32;
        tmp_output_offset += 1;

        for it in output
            .iter_mut()
            .skip(tmp_output_offset as usize)
            .take(how_many_ints)
        {
            *it = self.bytes_container.get_u32_le();
        }
        tmp_output_offset += how_many_ints as u32;

        let mut bitmap = 0;
        for k in 2..=32 {
            if self.data_pointers[k] != 0 {
                bitmap |= 1 << (k - 1);
            }
        }
        output[tmp_output_offset as usize] = bitmap;
        tmp_output_offset += 1;

        for k in 2..=32 {
            let size = self.data_pointers[k];
            if size != 0 {
                let groups = size.div_ceil(32);
                helpers::ensure_capacity(
                    tmp_output_offset as usize + 1 + groups * k,
                    output.len(),
                )?;
                output[tmp_output_offset as usize] = size as u32;
                tmp_output_offset += 1;
                // Zero the padded tail so identical input always produces
                // identical words, whatever earlier calls left behind
                self.data_to_be_packed[k][size..groups * 32].fill(0);
                let mut j = 0;
                while j < size {
                    bitpacking::fast_pack(
                        &self.data_to_be_packed[k],
                        j,
                        output,
                        tmp_output_offset as usize,
                        k as u8,
                    );
                    tmp_output_offset += k as u32;
                    j += 32;
                }

                // Overflow adjustment
                let overflow = j as u32 - size as u32;
                tmp_output_offset -= (overflow * k as u32) / 32;
            }
        }
        trace!(
            "encoded page: {this_size} ints -> {} words",
            tmp_output_offset as usize - header_pos
        );
        output_offset.set_position(u64::from(tmp_output_offset));
        Ok(())
    }

    /// Computes the bit width minimizing total storage cost for the block at
    /// `pos`, balancing regular value bits against exception overhead.
    ///
    /// Results land in `best_bits`, `exception_count`, and `max_bits`.
    fn choose_best_bits(&mut self, input: &[u32], pos: u32) {
        self.freqs.fill(0);
        let k_end = std::cmp::min(pos + self.block_size, input.len() as u32);
        for k in pos..k_end {
            self.freqs[helpers::bits(input[k as usize])] += 1;
        }

        self.best_bits = 32;
        while self.freqs[self.best_bits as usize] == 0 {
            self.best_bits -= 1;
        }
        self.max_bits = self.best_bits;

        let mut best_cost = self.best_bits * self.block_size;
        let mut cexcept: u32 = 0;
        self.exception_count = cexcept;

        for b in (0..self.best_bits).rev() {
            cexcept += self.freqs[b as usize + 1];
            if cexcept == self.block_size {
                break;
            }
            let mut this_cost = cexcept * OVERHEAD_OF_EACH_EXCEPT
                + cexcept * (self.max_bits - b)
                + b * self.block_size
                + 8;
            if self.max_bits - b == 1 {
                this_cost -= cexcept;
            }
            if this_cost < best_cost {
                best_cost = this_cost;
                self.best_bits = b;
                self.exception_count = cexcept;
            }
        }
    }

    /// Decodes one compressed page.
    ///
    /// Reads the page header to locate the metadata and exception section,
    /// loads the per-width exception lists, then unpacks each block and
    /// patches exceptions back in by position.
    ///
    /// # Arguments
    /// * `this_size` - Expected decompressed integer count, block-aligned
    /// * `input_offset` - Advanced by the words consumed
    /// * `output_offset` - Advanced by `this_size`
    fn decode_page(
        &mut self,
        input: &[u32],
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        this_size: u32,
    ) -> PforResult<()> {
        let init_pos = input_offset.position() as u32;
        helpers::check_input(init_pos as usize + 1, input.len(), "page header truncated")?;
        let where_meta = input[init_pos as usize];
        input_offset.increment();
        let mut inexcept = init_pos
            .checked_add(where_meta)
            .ok_or(PforError::MalformedInput("metadata offset overflows"))?;
        helpers::check_input(inexcept as usize + 1, input.len(), "metadata offset out of range")?;
        let byte_size = input[inexcept as usize];
        inexcept += 1;
        self.bytes_container.clear();
        let length = byte_size.div_ceil(4);
        helpers::check_input(
            inexcept as usize + length as usize,
            input.len(),
            "block metadata truncated",
        )?;
        for i in inexcept..inexcept + length {
            self.bytes_container.put_u32_le(input[i as usize]);
        }
        inexcept += length;

        helpers::check_input(
            inexcept as usize + 1,
            input.len(),
            "exception bitmap truncated",
        )?;
        let bitmap = input[inexcept as usize];
        inexcept += 1;

        for k in 2..=32u32 {
            if (bitmap & (1 << (k - 1))) != 0 {
                helpers::check_input(
                    inexcept as usize + 1,
                    input.len(),
                    "exception count truncated",
                )?;
                let size = input[inexcept as usize];
                inexcept += 1;
                let stored_words = (u64::from(size) * u64::from(k)).div_ceil(32) as usize;
                helpers::check_input(
                    inexcept as usize + stored_words,
                    input.len(),
                    "exception payload truncated",
                )?;
                let rounded_up = helpers::greatest_multiple(size + 31, 32);
                if self.data_to_be_packed[k as usize].len() < rounded_up as usize {
                    self.data_to_be_packed[k as usize] = vec![0; rounded_up as usize];
                }
                if inexcept + rounded_up / 32 * k <= input.len() as u32 {
                    let mut j = 0;
                    while j < size {
                        bitpacking::fast_unpack(
                            input,
                            inexcept as usize,
                            &mut self.data_to_be_packed[k as usize],
                            j as usize,
                            k as u8,
                        );
                        inexcept += k;
                        j += 32;
                    }
                    let overflow = j - size;
                    inexcept -= (overflow * k) / 32;
                } else {
                    // The stream ends inside the padded extent of the last
                    // group; unpack from a zero-extended copy instead
                    let mut j = 0;
                    let mut buf = vec![0; rounded_up as usize / 32 * k as usize];
                    let init_inexcept = inexcept;
                    let available = input.len() - init_inexcept as usize;
                    buf[..available].copy_from_slice(&input[init_inexcept as usize..]);
                    while j < size {
                        bitpacking::fast_unpack(
                            &buf,
                            (inexcept - init_inexcept) as usize,
                            &mut self.data_to_be_packed[k as usize],
                            j as usize,
                            k as u8,
                        );
                        inexcept += k;
                        j += 32;
                    }
                    let overflow = j - size;
                    inexcept -= (overflow * k) / 32;
                }
            }
        }

        self.data_pointers.fill(0);
        let mut tmp_output_offset = output_offset.position() as u32;
        let mut tmp_input_offset = input_offset.position() as u32;

        let run_end = this_size / self.block_size;
        for _ in 0..run_end {
            if self.bytes_container.remaining() < 2 {
                return Err(PforError::MalformedInput("block metadata exhausted"));
            }
            let b = u32::from(self.bytes_container.get_u8());
            if b > 32 {
                return Err(PforError::MalformedInput("block bit width out of range"));
            }
            let cexcept = self.bytes_container.get_u8();
            let payload_words = b * self.block_size / 32;
            helpers::check_input(
                tmp_input_offset as usize + payload_words as usize,
                input.len(),
                "block payload truncated",
            )?;
            match self.packing {
                Packing::Scalar => {
                    for k in (0..self.block_size).step_by(32) {
                        bitpacking::fast_unpack(
                            input,
                            tmp_input_offset as usize,
                            output,
                            (tmp_output_offset + k) as usize,
                            b as u8,
                        );
                        tmp_input_offset += b;
                    }
                }
                Packing::Interleaved => {
                    for k in (0..self.block_size).step_by(128) {
                        bitpacking::fast_unpack4(
                            input,
                            tmp_input_offset as usize,
                            output,
                            (tmp_output_offset + k) as usize,
                            b as u8,
                        );
                        tmp_input_offset += 4 * b;
                    }
                }
            }
            if cexcept > 0 {
                if self.bytes_container.remaining() < 1 + usize::from(cexcept) {
                    return Err(PforError::MalformedInput("exception metadata exhausted"));
                }
                let max_bits = u32::from(self.bytes_container.get_u8());
                if max_bits <= b || max_bits > 32 {
                    return Err(PforError::MalformedInput("exception width inconsistent"));
                }
                let index = (max_bits - b) as usize;
                if index == 1 {
                    for _ in 0..cexcept {
                        let pos = u32::from(self.bytes_container.get_u8());
                        if pos >= self.block_size {
                            return Err(PforError::MalformedInput(
                                "exception position beyond block",
                            ));
                        }
                        output[(pos + tmp_output_offset) as usize] |= 1 << b;
                    }
                } else {
                    for _ in 0..cexcept {
                        let pos = u32::from(self.bytes_container.get_u8());
                        if pos >= self.block_size {
                            return Err(PforError::MalformedInput(
                                "exception position beyond block",
                            ));
                        }
                        if self.data_pointers[index] >= self.data_to_be_packed[index].len() {
                            return Err(PforError::MalformedInput("exception list exhausted"));
                        }
                        let except_value = self.data_to_be_packed[index][self.data_pointers[index]];
                        output[(pos + tmp_output_offset) as usize] |= except_value << b;
                        self.data_pointers[index] += 1;
                    }
                }
            }
            tmp_output_offset += self.block_size;
        }
        trace!("decoded page: {this_size} ints");
        output_offset.set_position(u64::from(tmp_output_offset));
        input_offset.set_position(u64::from(inexcept));
        Ok(())
    }
}
