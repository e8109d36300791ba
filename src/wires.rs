//! The test register and diagonal board.
//!
//! Wire `(x, y)` carries the hypothesis "x is steckered to y". There is one
//! group of 26 wires per letter. Every menu edge touching letter `x` links
//! group `x` to the group of the edge's other letter through that edge's
//! scrambler.

use crate::alphabet::{Letter, NUM_LETTERS};
use crate::error::{BombeError, Result};
use crate::menu::Menu;
use crate::scrambler::Scrambler;
use std::collections::VecDeque;

/// Scrambler edges a single letter may take part in.
pub const MAX_LINKS: usize = 8;

#[derive(Clone, Copy, Debug, Default)]
struct Link {
    edge: u16,
    other: Letter,
}

/// Energised wires of one letter plus its scrambler links, one cache line.
#[derive(Clone, Copy, Debug, Default)]
#[repr(align(64))]
struct WireGroup {
    live: u32,
    num_links: u8,
    links: [Link; MAX_LINKS],
}

#[derive(Clone, Debug)]
pub struct WireNetwork {
    groups: [WireGroup; NUM_LETTERS],
    queue: VecDeque<(Letter, Letter)>,
    max_queue: usize,
    spread: usize,
}

impl WireNetwork {
    /// Wires up the links of every menu edge. Fails when a letter takes part
    /// in more than `MAX_LINKS` edges.
    pub fn new(menu: &Menu) -> Result<Self> {
        let mut groups = [WireGroup::default(); NUM_LETTERS];

        for (index, edge) in menu.edges().iter().enumerate() {
            let edge_index = u16::try_from(index).map_err(|_| {
                BombeError::InvariantViolation(format!("menu has {} edges", menu.edges().len()))
            })?;
            let (a, b) = edge.nodes;
            connect(&mut groups[a as usize], a, edge_index, b)?;
            if a != b {
                connect(&mut groups[b as usize], b, edge_index, a)?;
            }
        }

        Ok(WireNetwork {
            groups,
            queue: VecDeque::with_capacity(NUM_LETTERS * NUM_LETTERS),
            max_queue: 0,
            spread: 0,
        })
    }

    pub fn reset(&mut self) {
        for group in self.groups.iter_mut() {
            group.live = 0;
        }
        self.queue.clear();
    }

    /// Energises a wire and queues it for propagation, unless it already is.
    pub fn energize(&mut self, group: Letter, wire: Letter) {
        let bit = 1u32 << wire;
        let live = &mut self.groups[group as usize].live;
        if *live & bit == 0 {
            *live |= bit;
            self.queue.push_back((group, wire));
        }
    }

    /// Spreads voltage until nothing changes. `scramblers` is indexed by menu
    /// edge.
    pub fn propagate(&mut self, scramblers: &[Scrambler]) {
        self.spread = 0;
        self.max_queue = self.max_queue.max(self.queue.len());
        while let Some((group, wire)) = self.queue.pop_front() {
            self.spread += 1;
            // diagonal board
            self.energize(wire, group);

            let links = self.groups[group as usize];
            for link in &links.links[..links.num_links as usize] {
                let through = scramblers[link.edge as usize].map()[wire as usize];
                self.energize(link.other, through);
            }
            self.max_queue = self.max_queue.max(self.queue.len());
        }
    }

    pub fn is_live(&self, group: Letter, wire: Letter) -> bool {
        self.groups[group as usize].live & (1 << wire) != 0
    }

    pub fn count(&self, group: Letter) -> u32 {
        self.groups[group as usize].live.count_ones()
    }

    /// Longest the propagation queue has been since construction or the last
    /// `clear_max_queue`.
    pub fn max_queue(&self) -> usize {
        self.max_queue
    }

    pub fn clear_max_queue(&mut self) {
        self.max_queue = 0;
    }

    /// Wires taken off the queue by the last `propagate`.
    pub fn spread(&self) -> usize {
        self.spread
    }
}

fn connect(group: &mut WireGroup, letter: Letter, edge: u16, other: Letter) -> Result<()> {
    let slot = group.num_links as usize;
    if slot >= MAX_LINKS {
        return Err(BombeError::InvariantViolation(format!(
            "letter {} takes part in more than {} menu edges",
            (b'A' + letter) as char,
            MAX_LINKS
        )));
    }
    group.links[slot] = Link { edge, other };
    group.num_links += 1;
    Ok(())
}
