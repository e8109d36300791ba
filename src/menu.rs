//! Bombe menus: the letter graph derived from a crib.
//!
//! A menu file has one row per edge, `rotor_count` offset letters followed by
//! the two letters the edge connects, then one or more register rows of the
//! form `=X:Y`.

use crate::alphabet::{char_of, letter_of, letters_of, Letter, NUM_LETTERS};
use crate::error::{BombeError, Result};
use crate::scrambler::{RotorCount, MAX_ROTORS};
use smallvec::SmallVec;
use std::fmt;

pub type Offsets = SmallVec<[Letter; MAX_ROTORS]>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEdge {
    /// Disk positions of this edge's scrambler relative to edge zero,
    /// leftmost disk first.
    pub offsets: Offsets,
    pub nodes: (Letter, Letter),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Menu {
    rotor_count: RotorCount,
    edges: Vec<MenuEdge>,
    registers: Vec<(Letter, Letter)>,
}

impl Menu {
    pub fn new(
        rotor_count: RotorCount,
        edges: Vec<MenuEdge>,
        registers: Vec<(Letter, Letter)>,
    ) -> Result<Self> {
        if edges.is_empty() {
            return Err(BombeError::InvalidMenu("menu has no edges".into()));
        }
        if registers.is_empty() {
            return Err(BombeError::InvalidMenu("menu does not have any register".into()));
        }

        let in_range = |l: Letter| (l as usize) < NUM_LETTERS;
        for (k, edge) in edges.iter().enumerate() {
            if edge.offsets.len() != rotor_count.get() {
                return Err(BombeError::InvalidMenu(format!(
                    "edge {} has {} offsets for {} rotors",
                    k,
                    edge.offsets.len(),
                    rotor_count.get()
                )));
            }
            let (a, b) = edge.nodes;
            if !edge.offsets.iter().all(|&l| in_range(l)) || !in_range(a) || !in_range(b) {
                return Err(BombeError::InvalidInput(format!("edge {} is out of the alphabet", k)));
            }
        }
        if !registers.iter().all(|&(a, b)| in_range(a) && in_range(b)) {
            return Err(BombeError::InvalidInput("register out of the alphabet".into()));
        }

        Ok(Menu {
            rotor_count,
            edges,
            registers,
        })
    }

    /// Reads menu rows. The width of the first row fixes the rotor count;
    /// parsing stops at the first row that is neither an edge nor a register.
    pub fn load<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let first = match lines.first() {
            Some(line) => line.as_ref().trim_end(),
            None => return Err(BombeError::InvalidMenu("empty bombe menu".into())),
        };
        let rotor_count = first
            .chars()
            .count()
            .checked_sub(2)
            .and_then(|n| RotorCount::try_from(n).ok())
            .ok_or_else(|| {
                BombeError::InvalidMenu(format!("cannot tell the rotor count from {:?}", first))
            })?;
        let width = rotor_count.get() + 2;

        let mut edges = Vec::new();
        let mut registers = Vec::new();
        for line in lines {
            let chars: Vec<char> = line.as_ref().trim_end().chars().collect();
            if chars.first() == Some(&'=') {
                if chars.len() != 4 {
                    break;
                }
                registers.push((letter_of(chars[1])?, letter_of(chars[3])?));
            } else if registers.is_empty() && chars.len() == width {
                let letters = chars.iter().map(|&c| letter_of(c)).collect::<Result<Vec<_>>>()?;
                let (offsets, nodes) = letters.split_at(rotor_count.get());
                edges.push(MenuEdge {
                    offsets: offsets.iter().copied().collect(),
                    nodes: (nodes[0], nodes[1]),
                });
            } else {
                break;
            }
        }

        Menu::new(rotor_count, edges, registers)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Menu::load(&text.lines().collect::<Vec<_>>())
    }

    /// Builds a menu from a crib, assuming only the rightmost disk turns
    /// across it. The register sits on the most connected letter, hypothesised
    /// to be unsteckered.
    pub fn from_crib(rotor_count: RotorCount, plain: &str, cipher: &str) -> Result<Self> {
        let strip = |text: &str| {
            letters_of(&text.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        };
        let plain = strip(plain)?;
        let cipher = strip(cipher)?;

        if plain.len() != cipher.len() {
            return Err(BombeError::InvalidInput(format!(
                "crib has {} plain and {} cipher letters",
                plain.len(),
                cipher.len()
            )));
        }
        if plain.len() > NUM_LETTERS {
            return Err(BombeError::InvalidMenu(format!(
                "crib of {} letters would turn the middle rotor",
                plain.len()
            )));
        }

        let mut degrees = [0usize; NUM_LETTERS];
        let mut edges = Vec::with_capacity(plain.len());
        for (k, (&p, &c)) in plain.iter().zip(&cipher).enumerate() {
            if p == c {
                return Err(BombeError::InvalidInput(format!(
                    "crib letter {} at {} enciphers to itself",
                    char_of(p)?,
                    k
                )));
            }
            let mut offsets: Offsets = std::iter::repeat(0).take(rotor_count.get()).collect();
            offsets[rotor_count.get() - 1] = k as Letter;
            edges.push(MenuEdge {
                offsets,
                nodes: (p, c),
            });
            degrees[p as usize] += 1;
            degrees[c as usize] += 1;
        }

        // ties go to the lowest letter
        let hub = (0..NUM_LETTERS)
            .rev()
            .max_by_key(|&l| degrees[l])
            .map_or(0, |l| l as Letter);

        Menu::new(rotor_count, edges, vec![(hub, hub)])
    }

    pub fn with_registers(self, registers: Vec<(Letter, Letter)>) -> Result<Self> {
        Menu::new(self.rotor_count, self.edges, registers)
    }

    pub fn rotor_count(&self) -> RotorCount {
        self.rotor_count
    }

    pub fn edges(&self) -> &[MenuEdge] {
        &self.edges
    }

    pub fn registers(&self) -> &[(Letter, Letter)] {
        &self.registers
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = |l: Letter| char_of(l).map_err(|_| fmt::Error);
        for edge in &self.edges {
            for &offset in &edge.offsets {
                write!(f, "{}", letter(offset)?)?;
            }
            writeln!(f, "{}{}", letter(edge.nodes.0)?, letter(edge.nodes.1)?)?;
        }
        for &(a, b) in &self.registers {
            writeln!(f, "={}:{}", letter(a)?, letter(b)?)?;
        }
        Ok(())
    }
}
