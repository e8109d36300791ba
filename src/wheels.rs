//! Runs the bombe over every wheel order, spread across worker threads.

use crate::bombe::{Bombe, Stop};
use crate::error::{BombeError, Result};
use crate::menu::Menu;
use crate::reflector::ReflectorModel;
use crate::rotor::RotorModel;
use crate::scrambler::{RotorCount, MAX_ROTORS};
use crossbeam_channel::unbounded;
use log::info;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

static REGULAR_REFLECTORS: [ReflectorModel; 2] =
    [ReflectorModel::RegularB, ReflectorModel::RegularC];
static THIN_REFLECTORS: [ReflectorModel; 2] = [ReflectorModel::ThinB, ReflectorModel::ThinC];
static NO_THIN_ROTOR: [Option<RotorModel>; 1] = [None];
static THIN_ROTORS: [Option<RotorModel>; 2] = [Some(RotorModel::Beta), Some(RotorModel::Gamma)];
static ARMY_ROTORS: [RotorModel; 5] = [
    RotorModel::I,
    RotorModel::II,
    RotorModel::III,
    RotorModel::IV,
    RotorModel::V,
];
static NAVY_ROTORS: [RotorModel; 8] = [
    RotorModel::I,
    RotorModel::II,
    RotorModel::III,
    RotorModel::IV,
    RotorModel::V,
    RotorModel::VI,
    RotorModel::VII,
    RotorModel::VIII,
];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WheelOrder {
    pub reflector: ReflectorModel,
    pub rotors: SmallVec<[RotorModel; MAX_ROTORS]>,
}

impl fmt::Display for WheelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reflector)?;
        for rotor in &self.rotors {
            write!(f, " {}", rotor)?;
        }
        Ok(())
    }
}

/// Every wheel order a machine with `count` disks could be set up with:
/// three distinct disks from the pool in every order, behind every reflector,
/// plus every thin disk in front of them on the four-disk machine.
pub fn all_wheel_orders(count: RotorCount) -> Vec<WheelOrder> {
    let (reflectors, thin, pool): (&[ReflectorModel], &[Option<RotorModel>], &[RotorModel]) =
        match count {
            RotorCount::Three => (&REGULAR_REFLECTORS[..], &NO_THIN_ROTOR[..], &ARMY_ROTORS[..]),
            RotorCount::Four => (&THIN_REFLECTORS[..], &THIN_ROTORS[..], &NAVY_ROTORS[..]),
        };

    let mut works = Vec::new();
    for &reflector in reflectors {
        for &thin_rotor in thin {
            for a in 0..pool.len() {
                for b in 0..pool.len() {
                    if a == b {
                        continue;
                    }
                    for c in 0..pool.len() {
                        if a == c || b == c {
                            continue;
                        }

                        let mut rotors: SmallVec<[RotorModel; MAX_ROTORS]> =
                            thin_rotor.into_iter().collect();
                        rotors.extend_from_slice(&[pool[a], pool[b], pool[c]]);
                        works.push(WheelOrder { reflector, rotors });
                    }
                }
            }
        }
    }
    works
}

/// Splits `total` items over `threads` as evenly as possible, the remainder
/// going one each to the first threads.
pub fn allocate_loads(total: usize, threads: usize) -> Vec<usize> {
    if threads == 0 {
        return Vec::new();
    }
    let div = total / threads;
    let rem = total % threads;
    (0..threads).map(|k| div + usize::from(k < rem)).collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchReport {
    pub stops: Vec<Stop>,
    pub tests: u64,
    pub wheel_orders: usize,
    /// Longest propagation queue of any run.
    pub max_queue: usize,
    /// Most wires propagated by a single test.
    pub max_spread: usize,
    /// Wires propagated over all tests.
    pub total_spread: u64,
}

impl SearchReport {
    /// Wires propagated per test, on average.
    pub fn average_spread(&self) -> f64 {
        if self.tests == 0 {
            0.0
        } else {
            self.total_spread as f64 / self.tests as f64
        }
    }

    fn add_run(&mut self, bombe: Bombe<'_>) {
        self.tests += bombe.tests();
        self.wheel_orders += 1;
        self.max_queue = self.max_queue.max(bombe.max_queue());
        self.max_spread = self.max_spread.max(bombe.max_spread());
        self.total_spread += bombe.total_spread();
        self.stops.extend(bombe.into_stops());
    }

    fn merge(&mut self, other: SearchReport) {
        self.stops.extend(other.stops);
        self.tests += other.tests;
        self.wheel_orders += other.wheel_orders;
        self.max_queue = self.max_queue.max(other.max_queue);
        self.max_spread = self.max_spread.max(other.max_spread);
        self.total_spread += other.total_spread;
    }
}

/// Runs one engine per wheel order, one after the other.
pub fn run_sequential(menu: &Menu, works: &[WheelOrder]) -> Result<SearchReport> {
    let mut report = SearchReport::default();
    for work in works {
        let mut bombe = Bombe::new(menu, work.reflector, &work.rotors)?;
        bombe.run();
        report.add_run(bombe);
    }
    Ok(report)
}

/// Partitions `works` over `threads` workers, each with its own engines, and
/// concatenates their stops in thread order.
pub fn run_parallel(
    menu: Arc<Menu>,
    works: Vec<WheelOrder>,
    threads: usize,
) -> Result<SearchReport> {
    if threads == 0 {
        return Err(BombeError::InvalidConfiguration("at least one thread is needed".into()));
    }

    let loads = allocate_loads(works.len(), threads);
    info!("Work allocation:");
    for (k, load) in loads.iter().enumerate() {
        info!("Thread #{}: {} wheel orders", k + 1, load);
    }
    info!("Total: {} wheel orders", works.len());

    let tic = Instant::now();
    let (tx, rx) = unbounded();
    let mut remaining = works.into_iter();
    let mut handles = Vec::with_capacity(threads);
    for (index, &load) in loads.iter().enumerate() {
        let chunk: Vec<WheelOrder> = remaining.by_ref().take(load).collect();
        let menu = menu.clone();
        let tx = tx.clone();
        handles.push(thread::spawn(move || {
            // the receiver outlives every worker
            let _ = tx.send((index, run_sequential(&menu, &chunk)));
        }));
    }
    drop(tx);

    let mut results: Vec<Option<Result<SearchReport>>> = (0..threads).map(|_| None).collect();
    for (index, result) in rx.iter() {
        results[index] = Some(result);
    }
    for handle in handles {
        if handle.join().is_err() {
            return Err(BombeError::InvariantViolation("bombe worker panicked".into()));
        }
    }

    let mut report = SearchReport::default();
    for result in results {
        match result {
            Some(result) => report.merge(result?),
            None => return Err(BombeError::InvariantViolation("bombe worker vanished".into())),
        }
    }

    info!(
        "Total {} stops, all bombe runs take {:.3} sec",
        report.stops.len(),
        tic.elapsed().as_secs_f64()
    );
    info!(
        "{} tests over {} wheel orders, longest queue {}",
        report.tests, report.wheel_orders, report.max_queue
    );
    info!(
        "Maximum {} and average {:.2} wires propagated per test",
        report.max_spread,
        report.average_spread()
    );
    Ok(report)
}
