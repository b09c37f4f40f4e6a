use std::io::Cursor;

/// Extension trait for `Cursor<u32>` providing position increment operations.
///
/// Codecs thread a read cursor and a write cursor through every call; a
/// cursor position is the number of `u32` words consumed or produced so far.
pub trait IncrementCursor {
    /// Increments the cursor position by 1.
    fn increment(&mut self);
    /// Adds `n` to the cursor position.
    fn add(&mut self, n: u32);
}

impl IncrementCursor for Cursor<u32> {
    fn increment(&mut self) {
        self.set_position(self.position() + 1);
    }
    fn add(&mut self, n: u32) {
        self.set_position(self.position() + u64::from(n));
    }
}
