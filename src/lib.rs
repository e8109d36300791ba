//! Turing-Welchman bombe.
//!
//! A crib (known plaintext against ciphertext) is compiled into a menu: a graph
//! whose nodes are letters and whose edges are Enigma scramblers at fixed
//! offsets from one another. The bombe drives all scramblers through every
//! rotor offset and, at each, spreads voltage from a test register through the
//! scramblers and the diagonal board. Offsets that leave exactly one or all
//! but one wire of the register letter live are stops.
//!
//! Leaves first:
//!
//! - [`alphabet`]: letters and permutation tables
//! - [`reflector`], [`rotor`], [`scrambler`]: the machine's wired parts
//! - [`enigma`]: the cipher machine, used to produce cribs
//! - [`menu`], [`config`]: menus from files or cribs
//! - [`wires`], [`odometer`], [`bombe`]: the search engine
//! - [`wheels`]: every wheel order across worker threads

pub mod alphabet;
pub mod bombe;
pub mod config;
pub mod enigma;
pub mod error;
pub mod menu;
pub mod odometer;
pub mod reflector;
pub mod rotor;
pub mod scrambler;
pub mod wheels;
pub mod wires;

pub use bombe::{Bombe, Stop};
pub use enigma::Enigma;
pub use error::{BombeError, Result};
pub use menu::{Menu, MenuEdge};
pub use reflector::ReflectorModel;
pub use rotor::RotorModel;
pub use scrambler::{RotorCount, Scrambler};
pub use wheels::{all_wheel_orders, run_parallel, run_sequential, SearchReport, WheelOrder};
