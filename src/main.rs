use anyhow::{Context, Result};
use bombe::config::RawCrib;
use bombe::{
    all_wheel_orders, run_parallel, Bombe, Enigma, Menu, ReflectorModel, RotorCount, RotorModel,
    Stop,
};
use clap::{CommandFactory, Parser, Subcommand};
use log::info;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Turing-Welchman bombe: searches Enigma rotor settings consistent with a crib.
///
/// Model numbers: reflectors A=0 B=1 C=2, disks I..VIII = 1..8. On a
/// four-disk machine the reflector and the leftmost disk are thin, and
/// 1/2 select B/C and Beta/Gamma.
#[derive(Parser)]
#[command(name = "bombe", version)]
struct Cli {
    /// Print stops as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bombe on a menu with one wheel order.
    Run {
        menu: PathBuf,
        reflector: u32,
        #[arg(num_args = 3..=4, required = true)]
        rotors: Vec<u32>,
    },
    /// Run the bombe on a menu with every wheel order.
    All {
        menu: PathBuf,
        /// Worker threads, defaults to the number of CPUs.
        #[arg(long, short)]
        threads: Option<usize>,
    },
    /// Turn a JSON crib file into a menu.
    Crib { file: PathBuf },
    /// Encipher standard input.
    Enigma {
        reflector: u32,
        #[arg(num_args = 3..=4, required = true)]
        rotors: Vec<u32>,
        /// Plug-board pairs, e.g. "AV:BS:CG".
        #[arg(long, default_value = "")]
        steckers: String,
        /// Ring settings, one letter per disk.
        #[arg(long)]
        ring: String,
        /// Start position, one letter per disk.
        #[arg(long)]
        start: String,
    },
}

fn parse_wheel_order(reflector: u32, rotors: &[u32]) -> Result<(ReflectorModel, Vec<RotorModel>)> {
    let four = RotorCount::try_from(rotors.len())? == RotorCount::Four;
    let reflector = ReflectorModel::from_number(four, reflector)?;
    let rotors = rotors
        .iter()
        .enumerate()
        .map(|(k, &number)| RotorModel::from_number(four && k == 0, number))
        .collect::<bombe::Result<Vec<_>>>()?;
    Ok((reflector, rotors))
}

fn load_menu(path: &Path) -> Result<Menu> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot open the menu file {}", path.display()))?;
    Ok(Menu::parse(&text)?)
}

fn print_stops(stops: &[Stop], json: bool) -> Result<()> {
    for stop in stops {
        if json {
            println!("{}", serde_json::to_string(stop)?);
        } else {
            println!("{}", stop);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            menu,
            reflector,
            rotors,
        } => {
            let menu = load_menu(&menu)?;
            let (reflector, rotors) = parse_wheel_order(reflector, &rotors)?;
            let mut bombe = Bombe::new(&menu, reflector, &rotors)?;

            let tic = Instant::now();
            bombe.run();
            info!("Bombe run takes {:.3} sec", tic.elapsed().as_secs_f64());
            info!(
                "Maximum {} and average {:.2} wires propagated per test",
                bombe.max_spread(),
                bombe.total_spread() as f64 / bombe.tests() as f64
            );
            print_stops(bombe.stops(), cli.json)
        }
        Command::All { menu, threads } => {
            let menu = Arc::new(load_menu(&menu)?);
            let threads = match threads {
                Some(threads) => threads,
                None => thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            };
            let works = all_wheel_orders(menu.rotor_count());

            let report = run_parallel(menu, works, threads)?;
            print_stops(&report.stops, cli.json)
        }
        Command::Crib { file } => {
            let raw = RawCrib::open(&file)?;
            let menu = Menu::try_from(raw)
                .with_context(|| format!("cannot build a menu from {}", file.display()))?;
            print!("{}", menu);
            Ok(())
        }
        Command::Enigma {
            reflector,
            rotors,
            steckers,
            ring,
            start,
        } => {
            let (reflector, rotors) = parse_wheel_order(reflector, &rotors)?;
            let mut enigma = Enigma::new(reflector, &rotors)?;
            enigma.configure_steckers(&steckers)?;
            enigma.configure_rotors(&ring, &start)?;

            let mut output = String::new();
            for line in io::stdin().lock().lines() {
                output.push_str(&enigma.encrypt(&line?)?);
            }
            println!("{}", output);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            eprintln!("{}", Cli::command().render_usage());
            ExitCode::FAILURE
        }
    }
}
