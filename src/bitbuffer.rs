//! Row-oriented bit buffer for demodulated data
//!
//! Demodulators append decoded bits one at a time; a transmission may span
//! several packets, stored as separate rows. The buffer is accumulated,
//! handed to a message handler at each end-of-message boundary, then
//! cleared for the next message.

use bitvec::prelude::*;
use std::fmt;
use tracing::debug;

/// Maximum rows in one buffer (multi-packet transmissions)
const MAX_ROWS: usize = 50;

/// Maximum bits per row
const MAX_ROW_BITS: usize = 1024;

/// Growable bit container organized into rows
///
/// There is always at least one row; bits are appended to the last row.
/// Appends beyond the row/bit caps are dropped, so timing noise cannot
/// grow memory without bound.
#[derive(Debug, Clone)]
pub struct BitBuffer {
    rows: Vec<BitVec<u8, Msb0>>,
}

impl BitBuffer {
    /// Create an empty buffer with a single empty row
    pub fn new() -> Self {
        Self {
            rows: vec![BitVec::new()],
        }
    }

    /// Append a single bit to the current row
    pub fn add_bit(&mut self, bit: bool) {
        let row = self.rows.last_mut().unwrap();
        if row.len() >= MAX_ROW_BITS {
            debug!("bitbuffer: row full ({} bits), dropping bit", MAX_ROW_BITS);
            return;
        }
        row.push(bit);
    }

    /// Start a new row (packet boundary within the same message)
    ///
    /// A no-op while the current row is still empty, so repeated boundary
    /// markers (or a leading sync pulse) never stack empty rows.
    pub fn add_row(&mut self) {
        if self.rows.last().unwrap().is_empty() {
            return;
        }
        if self.rows.len() >= MAX_ROWS {
            debug!("bitbuffer: row limit ({}) reached, dropping row", MAX_ROWS);
            return;
        }
        self.rows.push(BitVec::new());
    }

    /// Discard all rows and reset to a single empty row
    pub fn clear(&mut self) {
        self.rows.clear();
        self.rows.push(BitVec::new());
    }

    /// Number of rows (at least 1)
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Bit count of the given row, 0 if the row does not exist
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map(|r| r.len()).unwrap_or(0)
    }

    /// Bits of the given row
    pub fn row(&self, row: usize) -> Option<&BitSlice<u8, Msb0>> {
        self.rows.get(row).map(|r| r.as_bitslice())
    }

    /// True if nothing has been accumulated (one empty row)
    pub fn is_empty(&self) -> bool {
        self.rows.len() == 1 && self.rows[0].is_empty()
    }

    /// Render one row as hex (trailing bits of a partial byte are zero)
    pub fn row_hex(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|r| hex::encode(r.as_raw_slice()))
            .unwrap_or_default()
    }
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bitbuffer: {} row(s)", self.rows.len())?;
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f, "[{:02}] {{{:2}}} {}", i, row.len(), hex::encode(row.as_raw_slice()))?;
        }
        Ok(())
    }
}
