use crate::alphabet::{Letter, NUM_LETTERS};
use crate::scrambler::{RotorCount, MAX_ROTORS};

/// Mixed-radix counter over rotor offsets, rightmost disk fastest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Odometer {
    offsets: [Letter; MAX_ROTORS],
    count: usize,
}

impl Odometer {
    pub fn new(count: RotorCount) -> Self {
        Odometer {
            offsets: [0; MAX_ROTORS],
            count: count.get(),
        }
    }

    pub fn offsets(&self) -> &[Letter] {
        &self.offsets[..self.count]
    }

    pub fn reset(&mut self) {
        self.offsets = [0; MAX_ROTORS];
    }

    /// Advances by one. Returns the leftmost disk whose offset changed, or
    /// `None` once the carry runs out of the leftmost disk and the counter is
    /// back at zero.
    pub fn step(&mut self) -> Option<usize> {
        for k in (0..self.count).rev() {
            self.offsets[k] += 1;
            if (self.offsets[k] as usize) < NUM_LETTERS {
                return Some(k);
            }
            self.offsets[k] = 0;
        }
        None
    }
}
