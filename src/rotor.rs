use crate::alphabet::{
    check_letter, extend_map, letters_of, DoubleMap, Letter, NULL_MAP, NUM_LETTERS,
};
use crate::error::{BombeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Disk (Walze) models. `Beta` and `Gamma` are the thin disks which only sit
/// in the leftmost slot of the four-disk machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum RotorModel {
    I = 1,
    II = 2,
    III = 3,
    IV = 4,
    V = 5,
    VI = 6,
    VII = 7,
    VIII = 8,
    Beta = 101,
    Gamma = 102,
}

impl RotorModel {
    pub fn from_number(thin: bool, number: u32) -> Result<Self> {
        Self::try_from(if thin { number.saturating_add(100) } else { number })
    }

    pub fn is_thin(self) -> bool {
        matches!(self, RotorModel::Beta | RotorModel::Gamma)
    }

    /// Wiring and turnover letters.
    fn wiring(self) -> (&'static str, &'static str) {
        match self {
            RotorModel::I => ("EKMFLGDQVZNTOWYHXUSPAIBRCJ", "Q"),
            RotorModel::II => ("AJDKSIRUXBLHWTMCQGZNPYFVOE", "E"),
            RotorModel::III => ("BDFHJLCPRTXVZNYEIWGAKMUSQO", "V"),
            RotorModel::IV => ("ESOVPZJAYQUIRHXLNFTGKDCMWB", "J"),
            RotorModel::V => ("VZBRGITYUPSDNHLXAWMJQOFECK", "Z"),
            RotorModel::VI => ("JPGVOUMFYQBENHZRDKASXLICTW", "ZM"),
            RotorModel::VII => ("NZJHGRCXMYSWBOUFAIVLPEKQDT", "ZM"),
            RotorModel::VIII => ("FKQHTLXOCBJSPDZRAMEWNIUYGV", "ZM"),
            RotorModel::Beta => ("LEYJVCNIXWPBQMDRTAKZGFUHOS", ""),
            RotorModel::Gamma => ("FSOKANUERHMBTIYCWLQPZXVGJD", ""),
        }
    }
}

impl TryFrom<u32> for RotorModel {
    type Error = BombeError;

    fn try_from(number: u32) -> Result<Self> {
        match number {
            1 => Ok(RotorModel::I),
            2 => Ok(RotorModel::II),
            3 => Ok(RotorModel::III),
            4 => Ok(RotorModel::IV),
            5 => Ok(RotorModel::V),
            6 => Ok(RotorModel::VI),
            7 => Ok(RotorModel::VII),
            8 => Ok(RotorModel::VIII),
            101 => Ok(RotorModel::Beta),
            102 => Ok(RotorModel::Gamma),
            _ => Err(BombeError::InvalidModel {
                kind: "rotor",
                number,
            }),
        }
    }
}

impl From<RotorModel> for u32 {
    fn from(model: RotorModel) -> u32 {
        model as u32
    }
}

impl fmt::Display for RotorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u32)
    }
}

/// One disk in a scrambler.
///
/// `table` is not the disk's own wiring: it is the whole path from the disk's
/// entry contacts, through this disk, the disks to its left and the reflector,
/// and back out. It therefore has to be recomputed whenever the table of the
/// disk to the left changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotor {
    model: RotorModel,
    table: DoubleMap,
    // Shift from entry contact to exit contact, indexed by contact + position.
    inward: DoubleMap,
    outward: DoubleMap,
    turnovers: u32,
    position: Letter,
    ring: Letter,
}

impl Rotor {
    pub fn new(model: RotorModel) -> Result<Self> {
        let (wiring, turnover_letters) = model.wiring();

        let mut turnovers = 0u32;
        for letter in letters_of(turnover_letters)? {
            if turnovers & (1 << letter) != 0 {
                return Err(BombeError::InvariantViolation(format!(
                    "duplicated turnover on rotor {}",
                    model
                )));
            }
            turnovers |= 1 << letter;
        }

        let mut inward = [0; 2 * NUM_LETTERS];
        let mut outward = [0; 2 * NUM_LETTERS];
        for (l1, l2) in letters_of(wiring)?.into_iter().enumerate() {
            let (l1, l2) = (l1 as usize, l2 as usize);
            inward[l1] = NULL_MAP[l2 + NUM_LETTERS - l1];
            outward[l2] = NULL_MAP[l1 + NUM_LETTERS - l2];
        }
        extend_map(&mut inward);
        extend_map(&mut outward);

        Ok(Rotor {
            model,
            table: *NULL_MAP,
            inward,
            outward,
            turnovers,
            position: 0,
            ring: 0,
        })
    }

    pub fn model(&self) -> RotorModel {
        self.model
    }

    pub fn position(&self) -> Letter {
        self.position
    }

    /// Sets the position and recomputes the exposed table against `left`, the
    /// table exposed by the disk to the left (or the reflector).
    pub fn set_position(&mut self, position: Letter, left: &DoubleMap) -> Result<()> {
        self.place(check_letter(position)?);
        self.recompute(left);
        Ok(())
    }

    pub(crate) fn place(&mut self, position: Letter) {
        debug_assert!((position as usize) < NUM_LETTERS);
        self.position = position;
    }

    pub(crate) fn recompute(&mut self, left: &DoubleMap) {
        let position = self.position as usize;
        for contact in 0..NUM_LETTERS {
            let out = left[contact + self.inward[contact + position] as usize] as usize;
            self.table[contact] = NULL_MAP[out + self.outward[out + position] as usize];
        }
        extend_map(&mut self.table);
    }

    pub fn ring(&self) -> Letter {
        self.ring
    }

    /// Sets the ring offset. The table does not depend on it; callers
    /// re-apply the position.
    pub fn set_ring(&mut self, ring: Letter) -> Result<()> {
        self.ring = check_letter(ring)?;
        Ok(())
    }

    /// True when the letter in the window sits on a turnover notch.
    pub fn is_turnover(&self) -> bool {
        let window = NULL_MAP[self.position as usize + self.ring as usize];
        self.turnovers & (1 << window) != 0
    }

    pub fn table(&self) -> &DoubleMap {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{assert_reciprocal, letter_of};
    use crate::reflector::{Reflector, ReflectorModel};

    const ALL: [RotorModel; 10] = [
        RotorModel::I,
        RotorModel::II,
        RotorModel::III,
        RotorModel::IV,
        RotorModel::V,
        RotorModel::VI,
        RotorModel::VII,
        RotorModel::VIII,
        RotorModel::Beta,
        RotorModel::Gamma,
    ];

    #[test]
    fn tables_are_reciprocal_at_every_position() {
        let reflector = Reflector::new(ReflectorModel::RegularB).unwrap();
        for model in ALL.iter() {
            let mut rotor = Rotor::new(*model).unwrap();
            for position in 0..NUM_LETTERS as Letter {
                rotor.set_position(position, reflector.table()).unwrap();
                assert!(assert_reciprocal(rotor.table()).is_ok(), "{} at {}", model, position);
            }
        }
    }

    #[test]
    fn position_zero_follows_wiring() {
        // Identity on the left exposes the bare wiring followed by its inverse.
        let mut rotor = Rotor::new(RotorModel::I).unwrap();
        rotor.set_position(0, &NULL_MAP).unwrap();
        for letter in 0..NUM_LETTERS {
            assert_eq!(rotor.table()[letter] as usize, letter);
        }

        // Shift-by-13 on the left: A -> E (wiring) -> R -> X (inverse wiring).
        let mut shift = [0; 2 * NUM_LETTERS];
        for (k, slot) in shift.iter_mut().enumerate() {
            *slot = ((k + 13) % NUM_LETTERS) as Letter;
        }
        rotor.set_position(0, &shift).unwrap();
        assert_eq!(rotor.table()[0], letter_of('X').unwrap());
    }

    #[test]
    fn turnover_follows_window_letter() {
        let mut rotor = Rotor::new(RotorModel::I).unwrap();
        rotor.place(letter_of('Q').unwrap());
        assert!(rotor.is_turnover());

        rotor.set_ring(1).unwrap();
        assert!(!rotor.is_turnover());
        rotor.place(letter_of('P').unwrap());
        assert!(rotor.is_turnover());

        let mut rotor = Rotor::new(RotorModel::VI).unwrap();
        rotor.place(letter_of('M').unwrap());
        assert!(rotor.is_turnover());
        rotor.place(letter_of('Z').unwrap());
        assert!(rotor.is_turnover());

        let rotor = Rotor::new(RotorModel::Beta).unwrap();
        assert!(!rotor.is_turnover());
    }

    #[test]
    fn out_of_alphabet_settings_are_rejected() {
        let mut rotor = Rotor::new(RotorModel::III).unwrap();
        rotor.set_position(7, &NULL_MAP).unwrap();
        let table = *rotor.table();

        assert!(matches!(
            rotor.set_position(30, &NULL_MAP),
            Err(BombeError::InvalidInput(_))
        ));
        assert!(matches!(rotor.set_ring(26), Err(BombeError::InvalidInput(_))));
        assert_eq!(rotor.position(), 7);
        assert_eq!(rotor.ring(), 0);
        assert_eq!(rotor.table(), &table);
    }

    #[test]
    fn model_numbers() {
        assert_eq!(RotorModel::from_number(true, 1), Ok(RotorModel::Beta));
        assert_eq!(RotorModel::from_number(false, 8), Ok(RotorModel::VIII));
        assert!(matches!(
            RotorModel::from_number(false, 9),
            Err(BombeError::InvalidModel { kind: "rotor", .. })
        ));
    }
}
