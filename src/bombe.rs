//! The search engine.
//!
//! One scrambler stands on every menu edge. For each rotor offset the test
//! register is energised, voltage is spread through scramblers and the
//! diagonal board, and the register letter's group is read off. Exactly one or
//! all but one live wire is a stop.

use crate::alphabet::{chars_of, Letter, NULL_MAP, NUM_LETTERS};
use crate::error::{BombeError, Result};
use crate::menu::Menu;
use crate::odometer::Odometer;
use crate::reflector::ReflectorModel;
use crate::rotor::RotorModel;
use crate::scrambler::{validate_wheel_order, Scrambler, MAX_ROTORS};
use crate::wires::WireNetwork;
use log::{debug, trace};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// A rotor offset that survived the consistency test.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Stop {
    pub reflector: ReflectorModel,
    pub rotors: Vec<RotorModel>,
    /// Disk positions of the first menu edge's scrambler.
    #[serde(serialize_with = "as_letters")]
    pub positions: Vec<Letter>,
    /// Register letter and its hypothesised stecker partner.
    #[serde(serialize_with = "as_letters")]
    pub stecker: [Letter; 2],
}

fn as_letters<S, L>(letters: &L, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    L: AsRef<[Letter]>,
{
    let text = chars_of(letters.as_ref()).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = |l: &[Letter]| chars_of(l).map_err(|_| fmt::Error);
        write!(f, "{}", self.reflector)?;
        for rotor in &self.rotors {
            write!(f, " {}", rotor)?;
        }
        let stecker = letters(&self.stecker)?;
        write!(
            f,
            "    {} {}:{}",
            letters(&self.positions)?,
            &stecker[..1],
            &stecker[1..]
        )
    }
}

pub struct Bombe<'m> {
    menu: &'m Menu,
    reflector_model: ReflectorModel,
    rotor_models: SmallVec<[RotorModel; MAX_ROTORS]>,
    scramblers: Vec<Scrambler>,
    wires: WireNetwork,
    odometer: Odometer,
    stops: Vec<Stop>,
    tests: u64,
    max_spread: usize,
    total_spread: u64,
}

impl<'m> Bombe<'m> {
    pub fn new(
        menu: &'m Menu,
        reflector_model: ReflectorModel,
        rotor_models: &[RotorModel],
    ) -> Result<Self> {
        let count = validate_wheel_order(reflector_model, rotor_models)?;
        if count != menu.rotor_count() {
            return Err(BombeError::InvalidConfiguration(format!(
                "{} rotors given for a {}-rotor menu",
                count.get(),
                menu.rotor_count().get()
            )));
        }

        let mut scramblers = Vec::with_capacity(menu.edges().len());
        for edge in menu.edges() {
            let mut scrambler = Scrambler::new(reflector_model, rotor_models)?;
            scrambler.set_rotor_positions(0, &edge.offsets);
            scramblers.push(scrambler);
        }

        Ok(Bombe {
            menu,
            reflector_model,
            rotor_models: rotor_models.iter().copied().collect(),
            scramblers,
            wires: WireNetwork::new(menu)?,
            odometer: Odometer::new(count),
            stops: Vec::new(),
            tests: 0,
            max_spread: 0,
            total_spread: 0,
        })
    }

    /// Tests every rotor offset and returns the stops found.
    pub fn run(&mut self) -> &[Stop] {
        self.stops.clear();
        self.tests = 0;
        self.max_spread = 0;
        self.total_spread = 0;
        self.wires.clear_max_queue();
        self.odometer.reset();
        self.place_scramblers(0);

        loop {
            self.test();
            match self.odometer.step() {
                Some(first) => self.place_scramblers(first),
                None => break,
            }
        }

        debug!(
            "wheel order {}: {} tests, {} stops, longest queue {}, at most {} wires per test",
            self.wheel_order(),
            self.tests,
            self.stops.len(),
            self.wires.max_queue(),
            self.max_spread
        );
        &self.stops
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<Stop> {
        self.stops
    }

    /// Number of rotor offsets tested by the last run.
    pub fn tests(&self) -> u64 {
        self.tests
    }

    /// Longest the propagation queue grew during the last run.
    pub fn max_queue(&self) -> usize {
        self.wires.max_queue()
    }

    /// Most wires one test of the last run had to propagate.
    pub fn max_spread(&self) -> usize {
        self.max_spread
    }

    /// Wires propagated over all tests of the last run.
    pub fn total_spread(&self) -> u64 {
        self.total_spread
    }

    fn wheel_order(&self) -> String {
        let rotors: Vec<String> = self.rotor_models.iter().map(|r| r.to_string()).collect();
        format!("{} {}", self.reflector_model, rotors.join(" "))
    }

    // Disks left of `first` kept their offset, so their tables still hold.
    fn place_scramblers(&mut self, first: usize) {
        let offsets = self.odometer.offsets();
        let mut positions = [0; MAX_ROTORS];
        for (edge, scrambler) in self.menu.edges().iter().zip(self.scramblers.iter_mut()) {
            for k in first..offsets.len() {
                positions[k] = NULL_MAP[edge.offsets[k] as usize + offsets[k] as usize];
            }
            scrambler.set_rotor_positions(first, &positions[first..offsets.len()]);
        }
    }

    fn test(&mut self) {
        self.tests += 1;

        self.wires.reset();
        for &(a, b) in self.menu.registers() {
            self.wires.energize(a, b);
            // diagonal board
            self.wires.energize(b, a);
        }
        self.wires.propagate(&self.scramblers);
        let spread = self.wires.spread();
        self.max_spread = self.max_spread.max(spread);
        self.total_spread += spread as u64;

        let register = self.menu.registers()[0].0;
        let live = self.wires.count(register) as usize;
        if live == 1 || live == NUM_LETTERS - 1 {
            self.add_stop(register, live == 1);
        }
    }

    fn add_stop(&mut self, register: Letter, single: bool) {
        let first = &self.scramblers[0];
        let positions = (0..first.num_rotors()).map(|k| first.rotor(k).position()).collect();
        let partner = (0..NUM_LETTERS as Letter)
            .find(|&wire| self.wires.is_live(register, wire) == single)
            .unwrap_or(register);

        let stop = Stop {
            reflector: self.reflector_model,
            rotors: self.rotor_models.to_vec(),
            positions,
            stecker: [register, partner],
        };
        trace!("stop {}", stop);
        self.stops.push(stop);
    }
}
