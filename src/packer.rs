use crate::error::PackError;
use crate::types::{Bin, Plan};

pub const DEFAULT_MAX_PIECES: usize = 10_000;

/// First-Fit-Decreasing packer for one stock length.
pub struct Packer {
    capacity: u32,
    max_pieces: usize,
}

impl Packer {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            max_pieces: DEFAULT_MAX_PIECES,
        }
    }

    pub fn with_max_pieces(mut self, max_pieces: usize) -> Self {
        self.max_pieces = max_pieces;
        self
    }

    pub fn pack(&self, pieces: &[u32]) -> Result<Plan, PackError> {
        self.validate(pieces)?;

        let sorted = sort_decreasing(pieces);
        let mut bins: Vec<Bin> = Vec::new();

        for piece in sorted {
            match bins.iter_mut().find(|b| b.fits(piece)) {
                Some(bin) => bin.push(piece),
                None => bins.push(Bin::new(self.capacity, piece)),
            }
        }

        tracing::debug!(
            pieces = pieces.len(),
            bins = bins.len(),
            lower_bound = lower_bound(pieces, self.capacity),
            capacity = self.capacity,
            "packed"
        );

        Ok(Plan {
            capacity: self.capacity,
            bins,
        })
    }

    fn validate(&self, pieces: &[u32]) -> Result<(), PackError> {
        if self.capacity == 0 {
            return Err(PackError::InvalidCapacity(self.capacity.to_string()));
        }
        if pieces.len() > self.max_pieces {
            return Err(PackError::InputTooLarge {
                count: pieces.len(),
                max: self.max_pieces,
            });
        }
        if let Some(&length) = pieces.iter().find(|&&p| p == 0 || p > self.capacity) {
            return Err(PackError::InvalidPieceLength {
                length,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// Packs `pieces` into stock units of length `capacity` with the default limits.
pub fn pack(pieces: &[u32], capacity: u32) -> Result<Plan, PackError> {
    Packer::new(capacity).pack(pieces)
}

/// Minimum number of stock units any packing needs.
pub fn lower_bound(pieces: &[u32], capacity: u32) -> usize {
    if capacity == 0 {
        return 0;
    }
    let total: u64 = pieces.iter().map(|&p| p as u64).sum();
    total.div_ceil(capacity as u64) as usize
}

// Stable, so equal lengths keep input order.
fn sort_decreasing(pieces: &[u32]) -> Vec<u32> {
    let mut sorted = pieces.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));
    sorted
}
