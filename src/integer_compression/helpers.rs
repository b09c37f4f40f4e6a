use crate::{PforError, PforResult};

/// Finds the greatest multiple of `factor` that is less than or equal to `value`.
pub fn greatest_multiple(value: u32, factor: u32) -> u32 {
    value - value % factor
}

/// Returns the number of bits needed to represent `i`.
/// Returns 0 for input 0.
pub fn bits(i: u32) -> usize {
    32 - i.leading_zeros() as usize
}

/// Checks that an output slice of `capacity` words has room up to `end`.
pub fn ensure_capacity(end: usize, capacity: usize) -> PforResult<()> {
    if end > capacity {
        return Err(PforError::InsufficientOutputCapacity {
            needed: end,
            capacity,
        });
    }
    Ok(())
}

/// Checks that a compressed input of `len` words extends at least to `end`.
pub fn check_input(end: usize, len: usize, what: &'static str) -> PforResult<()> {
    if end > len {
        return Err(PforError::MalformedInput(what));
    }
    Ok(())
}
