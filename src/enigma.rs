//! The cipher machine itself: stepping, ring settings and plug-board.
//!
//! The bombe never needs this, but it is what produces the cribs and golden
//! vectors the bombe is checked against.

use crate::alphabet::{chars_of, letters_of, Letter, SingleMap, NULL_MAP, NUM_LETTERS};
use crate::error::{BombeError, Result};
use crate::reflector::ReflectorModel;
use crate::rotor::RotorModel;
use crate::scrambler::{validate_wheel_order, Scrambler};

#[derive(Clone, Debug)]
pub struct Enigma {
    scrambler: Scrambler,
    steckers: SingleMap,
}

impl Enigma {
    pub fn new(reflector_model: ReflectorModel, rotor_models: &[RotorModel]) -> Result<Self> {
        validate_wheel_order(reflector_model, rotor_models)?;

        let mut steckers = [0; NUM_LETTERS];
        steckers.copy_from_slice(&NULL_MAP[..NUM_LETTERS]);

        Ok(Enigma {
            scrambler: Scrambler::new(reflector_model, rotor_models)?,
            steckers,
        })
    }

    pub fn num_rotors(&self) -> usize {
        self.scrambler.num_rotors()
    }

    /// Applies ring settings (Ringstellung) and the start position
    /// (Grundstellung), both given leftmost disk first.
    pub fn configure_rotors(&mut self, ring: &str, start: &str) -> Result<()> {
        let num_rotors = self.num_rotors();
        let rings = letters_of(ring)?;
        let starts = letters_of(start)?;
        if rings.len() != num_rotors || starts.len() != num_rotors {
            return Err(BombeError::InvalidConfiguration(format!(
                "ring {:?} / start {:?} do not match {} rotors",
                ring, start, num_rotors
            )));
        }

        for (k, (&ring, &start)) in rings.iter().zip(&starts).enumerate() {
            self.scrambler.set_rotor_ring(k, ring)?;
            let position = NULL_MAP[start as usize + NUM_LETTERS - ring as usize];
            self.scrambler.set_rotor_position(k, position)?;
        }

        Ok(())
    }

    /// Sets the plug-board from letter pairs such as `AV:BS:CG` or `AV BS CG`.
    pub fn configure_steckers(&mut self, setting: &str) -> Result<()> {
        let letters = letters_of(
            &setting
                .chars()
                .filter(|&c| c != ':' && c != ' ')
                .collect::<String>(),
        )?;
        if letters.len() % 2 != 0 {
            return Err(BombeError::InvalidConfiguration(format!(
                "stecker setting {:?} has an unpaired letter",
                setting
            )));
        }

        let mut steckers = [0; NUM_LETTERS];
        steckers.copy_from_slice(&NULL_MAP[..NUM_LETTERS]);
        for pair in letters.chunks(2) {
            let (l1, l2) = (pair[0] as usize, pair[1] as usize);
            if l1 == l2 {
                return Err(BombeError::InvalidConfiguration(format!(
                    "stecker {} paired with itself",
                    chars_of(&pair[..1])?
                )));
            }
            if steckers[l1] as usize != l1 || steckers[l2] as usize != l2 {
                return Err(BombeError::InvalidConfiguration(format!(
                    "duplicated stecker {}",
                    chars_of(pair)?
                )));
            }
            steckers[l1] = l2 as Letter;
            steckers[l2] = l1 as Letter;
        }
        self.steckers = steckers;

        Ok(())
    }

    pub fn steckers(&self) -> &SingleMap {
        &self.steckers
    }

    /// Letters currently shown in the windows, leftmost disk first.
    pub fn window(&self) -> Vec<Letter> {
        (0..self.num_rotors())
            .map(|k| {
                let rotor = self.scrambler.rotor(k);
                NULL_MAP[rotor.position() as usize + rotor.ring() as usize]
            })
            .collect()
    }

    pub fn scrambler(&self) -> &Scrambler {
        &self.scrambler
    }

    /// Steps the disks and enciphers each letter in turn.
    pub fn process(&mut self, input: &[Letter]) -> Vec<Letter> {
        input
            .iter()
            .map(|&letter| {
                self.step();
                let through = self.scrambler.map()[self.steckers[letter as usize] as usize];
                self.steckers[through as usize]
            })
            .collect()
    }

    /// Enciphers text, skipping spaces.
    pub fn encrypt(&mut self, text: &str) -> Result<String> {
        let input = letters_of(&text.chars().filter(|&c| c != ' ').collect::<String>())?;
        chars_of(&self.process(&input))
    }

    // The fourth (thin) disk never moves. The middle disk steps on its own
    // notch as well, which is the double step.
    fn step(&mut self) {
        let num_rotors = self.num_rotors();
        let (slow, middle, fast) = (num_rotors - 3, num_rotors - 2, num_rotors - 1);
        let advance = |scrambler: &Scrambler, k: usize| {
            NULL_MAP[scrambler.rotor(k).position() as usize + 1]
        };

        if self.scrambler.rotor(middle).is_turnover() {
            let next_slow = advance(&self.scrambler, slow);
            let next_middle = advance(&self.scrambler, middle);
            self.scrambler.place_rotor(slow, next_slow);
            self.scrambler.place_rotor(middle, next_middle);
        } else if self.scrambler.rotor(fast).is_turnover() {
            let next_middle = advance(&self.scrambler, middle);
            self.scrambler.place_rotor(middle, next_middle);
        }

        let next_fast = advance(&self.scrambler, fast);
        self.scrambler.place_rotor(fast, next_fast);
    }
}
