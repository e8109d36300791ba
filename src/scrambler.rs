use crate::alphabet::{check_letter, DoubleMap, Letter, NUM_LETTERS};
use crate::error::{BombeError, Result};
use crate::reflector::{Reflector, ReflectorModel};
use crate::rotor::{Rotor, RotorModel};
use smallvec::SmallVec;

pub const MAX_ROTORS: usize = 4;

/// Number of disks in a scrambler. Storage everywhere is sized for
/// `MAX_ROTORS`; this carries how much of it is in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotorCount {
    Three,
    Four,
}

impl RotorCount {
    pub fn get(self) -> usize {
        match self {
            RotorCount::Three => 3,
            RotorCount::Four => 4,
        }
    }

    /// Size of the rotor-offset space, 26^count.
    pub fn positions(self) -> u64 {
        (NUM_LETTERS as u64).pow(self.get() as u32)
    }
}

impl TryFrom<usize> for RotorCount {
    type Error = BombeError;

    fn try_from(count: usize) -> Result<Self> {
        match count {
            3 => Ok(RotorCount::Three),
            4 => Ok(RotorCount::Four),
            _ => Err(BombeError::InvalidConfiguration(format!(
                "wrong number of rotors: {}",
                count
            ))),
        }
    }
}

/// Checks that a wheel order could be set up on a real machine: regular
/// reflector with three disks, thin reflector and a thin leftmost disk with
/// four.
pub fn validate_wheel_order(
    reflector: ReflectorModel,
    rotors: &[RotorModel],
) -> Result<RotorCount> {
    let count = RotorCount::try_from(rotors.len())?;
    let thin_slots = match count {
        RotorCount::Three => 0,
        RotorCount::Four => 1,
    };

    if reflector.is_thin() != (count == RotorCount::Four) {
        return Err(BombeError::InvalidConfiguration(format!(
            "reflector {} does not fit a {}-rotor machine",
            reflector,
            count.get()
        )));
    }
    for (k, rotor) in rotors.iter().enumerate() {
        if rotor.is_thin() != (k < thin_slots) {
            return Err(BombeError::InvalidConfiguration(format!(
                "rotor {} cannot sit in slot {}",
                rotor, k
            )));
        }
    }

    Ok(count)
}

/// A reflector and a chain of disks, the leftmost disk next to the reflector.
///
/// The effective substitution is the table exposed by the rightmost disk.
#[derive(Clone, Debug)]
pub struct Scrambler {
    reflector: Reflector,
    rotors: SmallVec<[Rotor; MAX_ROTORS]>,
}

impl Scrambler {
    pub fn new(reflector_model: ReflectorModel, rotor_models: &[RotorModel]) -> Result<Self> {
        RotorCount::try_from(rotor_models.len())?;

        let rotors = rotor_models
            .iter()
            .map(|&model| Rotor::new(model))
            .collect::<Result<SmallVec<[Rotor; MAX_ROTORS]>>>()?;
        let mut scrambler = Scrambler {
            reflector: Reflector::new(reflector_model)?,
            rotors,
        };
        scrambler.recompute_from(0);

        Ok(scrambler)
    }

    pub fn num_rotors(&self) -> usize {
        self.rotors.len()
    }

    pub fn reflector(&self) -> &Reflector {
        &self.reflector
    }

    pub fn rotor(&self, index: usize) -> &Rotor {
        &self.rotors[index]
    }

    pub fn set_rotor_position(&mut self, index: usize, position: Letter) -> Result<()> {
        self.check_index(index)?;
        self.place_rotor(index, check_letter(position)?);
        Ok(())
    }

    pub fn set_rotor_ring(&mut self, index: usize, ring: Letter) -> Result<()> {
        self.check_index(index)?;
        self.rotors[index].set_ring(ring)?;
        self.recompute_from(index);
        Ok(())
    }

    /// Unchecked `set_rotor_position` for positions already known to be
    /// letters.
    pub(crate) fn place_rotor(&mut self, index: usize, position: Letter) {
        self.rotors[index].place(position);
        self.recompute_from(index);
    }

    /// Sets the positions of disks `first..` at once and recomputes each
    /// affected disk a single time. Positions must be letters.
    pub(crate) fn set_rotor_positions(&mut self, first: usize, positions: &[Letter]) {
        for (rotor, &position) in self.rotors[first..].iter_mut().zip(positions) {
            rotor.place(position);
        }
        self.recompute_from(first);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.rotors.len() {
            Ok(())
        } else {
            Err(BombeError::InvalidInput(format!(
                "rotor {} of a {}-rotor scrambler",
                index,
                self.rotors.len()
            )))
        }
    }

    /// Current substitution, valid for indices up to 52.
    pub fn map(&self) -> &DoubleMap {
        match self.rotors.last() {
            Some(rotor) => rotor.table(),
            None => self.reflector.table(),
        }
    }

    // Disk k only depends on the reflector and disks 0..k.
    fn recompute_from(&mut self, first: usize) {
        for k in first..self.rotors.len() {
            let (left, rest) = self.rotors.split_at_mut(k);
            let left_table = match left.last() {
                Some(rotor) => rotor.table(),
                None => self.reflector.table(),
            };
            rest[0].recompute(left_table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::assert_reciprocal;
    use proptest::prelude::*;

    fn m3() -> Scrambler {
        Scrambler::new(
            ReflectorModel::RegularB,
            &[RotorModel::II, RotorModel::IV, RotorModel::V],
        )
        .unwrap()
    }

    fn is_bijection(map: &DoubleMap) -> bool {
        let mut seen = [false; NUM_LETTERS];
        for &l in map.iter().take(NUM_LETTERS) {
            seen[l as usize] = true;
        }
        seen.iter().all(|&s| s)
    }

    #[test]
    fn rotor_count_is_checked() {
        assert!(matches!(
            Scrambler::new(ReflectorModel::RegularB, &[RotorModel::I, RotorModel::II]),
            Err(BombeError::InvalidConfiguration(_))
        ));
        assert_eq!(RotorCount::Four.positions(), 456_976);
    }

    #[test]
    fn wheel_order_pairing() {
        use RotorModel::*;
        assert_eq!(
            validate_wheel_order(ReflectorModel::RegularB, &[I, II, III]),
            Ok(RotorCount::Three)
        );
        assert_eq!(
            validate_wheel_order(ReflectorModel::ThinC, &[Gamma, I, II, III]),
            Ok(RotorCount::Four)
        );
        assert!(validate_wheel_order(ReflectorModel::ThinB, &[I, II, III]).is_err());
        assert!(validate_wheel_order(ReflectorModel::RegularB, &[Beta, I, II, III]).is_err());
        assert!(validate_wheel_order(ReflectorModel::ThinB, &[I, Beta, II, III]).is_err());
        assert!(validate_wheel_order(ReflectorModel::RegularB, &[I, II, Gamma]).is_err());
    }

    // Letter-by-letter path through the disks, one contact shift at a time.
    fn reference_map(rotors: &[(&str, usize)], reflector: &str, input: usize) -> usize {
        let forward = |wiring: &str, offset: usize, l: usize| {
            let out = (wiring.as_bytes()[(l + offset) % 26] - b'A') as usize;
            (out + 26 - offset) % 26
        };
        let backward = |wiring: &str, offset: usize, l: usize| {
            let target = (b'A' + ((l + offset) % 26) as u8) as char;
            let out = wiring.find(target).unwrap();
            (out + 26 - offset) % 26
        };

        let mut l = input;
        for &(wiring, offset) in rotors.iter().rev() {
            l = forward(wiring, offset, l);
        }
        l = (reflector.as_bytes()[l] - b'A') as usize;
        for &(wiring, offset) in rotors.iter() {
            l = backward(wiring, offset, l);
        }
        l
    }

    #[test]
    fn composed_table_matches_reference_path() {
        let ii = "AJDKSIRUXBLHWTMCQGZNPYFVOE";
        let iv = "ESOVPZJAYQUIRHXLNFTGKDCMWB";
        let v = "VZBRGITYUPSDNHLXAWMJQOFECK";
        let ukw_b = "YRUHQSLDPXNGOKMIEBFZCWVJAT";

        let mut scrambler = m3();
        for &(p0, p1, p2) in &[(0, 0, 0), (0, 17, 16), (25, 3, 11), (7, 25, 25)] {
            scrambler.set_rotor_positions(0, &[p0, p1, p2]);
            let rotors = [(ii, p0 as usize), (iv, p1 as usize), (v, p2 as usize)];
            for input in 0..NUM_LETTERS {
                assert_eq!(
                    scrambler.map()[input] as usize,
                    reference_map(&rotors, ukw_b, input),
                    "input {} at {:?}",
                    input,
                    (p0, p1, p2)
                );
            }
        }
    }

    #[test]
    fn batch_update_matches_single_updates() {
        let mut one = m3();
        let mut other = m3();
        one.set_rotor_position(0, 3).unwrap();
        one.set_rotor_position(1, 17).unwrap();
        one.set_rotor_position(2, 25).unwrap();
        other.set_rotor_positions(0, &[3, 17, 25]);
        assert_eq!(one.map(), other.map());
    }

    #[test]
    fn ring_keeps_table() {
        let mut scrambler = m3();
        scrambler.set_rotor_position(1, 5).unwrap();
        let before = *scrambler.map();
        scrambler.set_rotor_ring(1, 9).unwrap();
        assert_eq!(scrambler.rotor(1).ring(), 9);
        assert_eq!(&before, scrambler.map());
    }

    #[test]
    fn public_setters_reject_bad_settings() {
        let mut scrambler = m3();
        scrambler.set_rotor_position(2, 4).unwrap();
        let before = *scrambler.map();

        assert!(matches!(
            scrambler.set_rotor_position(0, 30),
            Err(BombeError::InvalidInput(_))
        ));
        assert!(matches!(
            scrambler.set_rotor_ring(1, 26),
            Err(BombeError::InvalidInput(_))
        ));
        assert!(matches!(
            scrambler.set_rotor_position(3, 0),
            Err(BombeError::InvalidInput(_))
        ));
        assert_eq!(scrambler.map(), &before);
        assert_eq!(scrambler.rotor(2).position(), 4);
    }

    proptest! {
        #[test]
        fn map_is_a_reciprocal_bijection(
            positions in proptest::collection::vec(0u8..26, 4),
            thin in 101u32..103,
        ) {
            let mut scrambler = Scrambler::new(
                ReflectorModel::from_number(true, thin - 100).unwrap(),
                &[RotorModel::Beta, RotorModel::VI, RotorModel::VII, RotorModel::VIII],
            ).unwrap();
            scrambler.set_rotor_positions(0, &positions);
            prop_assert!(is_bijection(scrambler.map()));
            prop_assert!(assert_reciprocal(scrambler.map()).is_ok());
        }

        #[test]
        fn setting_a_position_twice_is_idempotent(index in 0usize..3, position in 0u8..26) {
            let mut once = m3();
            once.set_rotor_position(index, position).unwrap();
            let mut twice = once.clone();
            twice.set_rotor_position(index, position).unwrap();
            prop_assert_eq!(once.map(), twice.map());
        }
    }
}
