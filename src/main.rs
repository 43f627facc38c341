use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use wifi_locate::{
    config::Config,
    error::WifiLocateError,
    locate, report,
    report::AnnotatedAddress,
    scan::{self, AccessPoint},
    store,
};

/// Seconds between continuous-mode scans when neither the flag nor the
/// config file gives an interval.
const DEFAULT_INTERVAL_SECS: u64 = 15;

/// Granularity at which the continuous-mode sleep polls the interrupt flag.
const SLEEP_SLICE_MS: u64 = 200;

#[derive(Parser)]
#[command(name = "wifi-locate")]
#[command(about = "Estimate the host's location from nearby WiFi access points")]
#[command(version)]
struct Cli {
    /// Print the address as JSON instead of the human-readable report
    #[arg(short, long)]
    json: bool,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,

    /// Scan once and save to FILE (timestamped name if omitted), without resolving
    #[arg(short, long, value_name = "FILE", num_args = 0..=1, conflicts_with_all = ["load", "continuous"])]
    save: Option<Option<String>>,

    /// Resolve previously saved scan files instead of scanning
    #[arg(short, long, value_name = "FILE", num_args = 1..)]
    load: Vec<String>,

    /// Scan and save every SEC seconds (default 15) until interrupted
    #[arg(short, long, value_name = "SEC", num_args = 0..=1, conflicts_with = "load")]
    continuous: Option<Option<u64>>,

    /// Wireless interface to scan with (default: let the scan utility choose)
    #[arg(short, long, value_name = "IFACE")]
    interface: Option<String>,
}

/// The four mutually exclusive ways to run. Built from the parsed flags so
/// the rest of the driver cannot see two modes at once; clap already rejects
/// conflicting flag combinations before any side effect.
#[derive(Debug, PartialEq)]
enum Mode {
    Resolve,
    Save { filename: Option<String> },
    Load { files: Vec<String> },
    Continuous { interval: Option<u64> },
}

impl Cli {
    fn mode(&self) -> Mode {
        if let Some(filename) = &self.save {
            Mode::Save {
                filename: filename.clone(),
            }
        } else if !self.load.is_empty() {
            Mode::Load {
                files: self.load.clone(),
            }
        } else if let Some(interval) = self.continuous {
            Mode::Continuous { interval }
        } else {
            Mode::Resolve
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.mode() {
        Mode::Resolve => cmd_resolve(&cli, &config),
        Mode::Save { filename } => cmd_save(&cli, &config, filename.as_deref()),
        Mode::Load { files } => cmd_load(&cli, &config, &files),
        Mode::Continuous { interval } => cmd_continuous(&cli, &config, interval),
    }
}

fn cmd_resolve(cli: &Cli, config: &Config) -> Result<()> {
    let access_points = scan_or_exit(cli, config)?;

    if !cli.quiet {
        eprintln!(
            "Resolving location from {} access points...",
            access_points.len()
        );
    }
    let fix = locate::resolve_at(endpoint(config), &access_points)?;

    if cli.json {
        println!("{}", report::address_json(&fix.address)?);
    } else {
        println!("{}", report::human_report(&fix, access_points.len(), None));
    }

    Ok(())
}

fn cmd_save(cli: &Cli, config: &Config, filename: Option<&str>) -> Result<()> {
    let access_points = scan_or_exit(cli, config)?;
    let used = store::save(&access_points, filename)?;

    println!("Saved {} access points to {}", access_points.len(), used);

    Ok(())
}

fn cmd_load(cli: &Cli, config: &Config, files: &[String]) -> Result<()> {
    let endpoint = endpoint(config);

    if cli.json {
        // Accumulate every file's address and print one array at the end
        let mut entries = Vec::new();
        for file in files {
            let access_points = store::load(file)?;
            let fix = locate::resolve_at(endpoint, &access_points)?;
            entries.push(AnnotatedAddress {
                file: file.clone(),
                address: fix.address,
            });
        }
        println!("{}", report::annotated_address_json(&entries)?);
    } else {
        for (i, file) in files.iter().enumerate() {
            let access_points = store::load(file)?;
            if !cli.quiet {
                eprintln!(
                    "Resolving {} access points from {}...",
                    access_points.len(),
                    file
                );
            }
            let fix = locate::resolve_at(endpoint, &access_points)?;
            if i > 0 {
                println!();
            }
            println!(
                "{}",
                report::human_report(&fix, access_points.len(), Some(file))
            );
        }
    }

    Ok(())
}

fn cmd_continuous(cli: &Cli, config: &Config, interval: Option<u64>) -> Result<()> {
    let secs = interval
        .or(config.interval)
        .unwrap_or(DEFAULT_INTERVAL_SECS);
    let interval = Duration::from_secs(secs);

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })
    .context("Failed to set interrupt handler")?;

    if !cli.quiet {
        eprintln!("Saving a scan every {secs}s, interrupt to stop");
    }

    while running.load(Ordering::SeqCst) {
        let access_points = scan_or_exit(cli, config)?;
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let filename = store::save(&access_points, None)?;
        if !cli.quiet {
            eprintln!("Saved {} access points to {}", access_points.len(), filename);
        }
        sleep_unless_interrupted(interval, &running);
    }

    Ok(())
}

/// Runs a scan, turning the empty-scan condition into the early exit it is:
/// a message and status 0, with no lookup or save attempted. Anything else
/// propagates as a fatal error.
fn scan_or_exit(cli: &Cli, config: &Config) -> Result<Vec<AccessPoint>> {
    let interface = cli.interface.as_deref().or(config.interface.as_deref());

    if !cli.quiet {
        eprintln!("Scanning for nearby access points...");
    }

    match scan::scan_access_points(interface) {
        Ok(access_points) => Ok(access_points),
        Err(WifiLocateError::NoAccessPoints) => {
            eprintln!("No access points in range. The wireless radio may be switched off.");
            process::exit(0);
        }
        Err(e) => Err(e.into()),
    }
}

fn endpoint(config: &Config) -> &str {
    config.endpoint.as_deref().unwrap_or(locate::ENDPOINT)
}

/// Sleeps for `total`, polling the interrupt flag in short slices so a
/// signal delivered mid-sleep ends the wait promptly.
fn sleep_unless_interrupted(total: Duration, running: &AtomicBool) {
    let slice = Duration::from_millis(SLEEP_SLICE_MS);
    let deadline = Instant::now() + total;

    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep((deadline - now).min(slice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn default_invocation_resolves() {
        assert_eq!(parse(&["wifi-locate"]).mode(), Mode::Resolve);
        assert_eq!(parse(&["wifi-locate", "-j", "-q"]).mode(), Mode::Resolve);
    }

    #[test]
    fn save_mode_with_and_without_filename() {
        assert_eq!(
            parse(&["wifi-locate", "--save"]).mode(),
            Mode::Save { filename: None }
        );
        assert_eq!(
            parse(&["wifi-locate", "--save=here.location"]).mode(),
            Mode::Save {
                filename: Some("here.location".to_string())
            }
        );
    }

    #[test]
    fn load_mode_takes_multiple_files() {
        assert_eq!(
            parse(&["wifi-locate", "--load", "a.location", "b.location"]).mode(),
            Mode::Load {
                files: vec!["a.location".to_string(), "b.location".to_string()]
            }
        );
    }

    #[test]
    fn continuous_mode_with_and_without_interval() {
        assert_eq!(
            parse(&["wifi-locate", "--continuous"]).mode(),
            Mode::Continuous { interval: None }
        );
        assert_eq!(
            parse(&["wifi-locate", "--continuous=60"]).mode(),
            Mode::Continuous { interval: Some(60) }
        );
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["wifi-locate", "--save=f", "--load", "x"]).is_err());
        assert!(Cli::try_parse_from(["wifi-locate", "--save=f", "--continuous"]).is_err());
        assert!(Cli::try_parse_from(["wifi-locate", "--continuous=5", "--load", "x"]).is_err());
    }

    #[test]
    fn interrupted_sleep_returns_promptly() {
        let running = AtomicBool::new(false);
        let start = Instant::now();
        sleep_unless_interrupted(Duration::from_secs(10), &running);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn full_sleep_runs_to_the_deadline() {
        let running = AtomicBool::new(true);
        let start = Instant::now();
        sleep_unless_interrupted(Duration::from_millis(50), &running);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
