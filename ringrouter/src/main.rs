use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use ringrouter_lib::{
    load_from_path, load_routes_into, Config, ForwardingStats, OpenMode, RingMode, RingProvider,
    SoftwareRingProvider, Trie, Worker,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Default ring-pair capacity for the in-process software provider this
/// binary drives. A real kernel-bypass ring size is driver-defined
/// (spec.md §3); this binary never talks to real hardware, so a fixed
/// default stands in for it.
const DEMO_RING_CAPACITY: u32 = 512;

#[derive(Parser, Debug)]
#[command(author, version, about = "ringrouter: kernel-bypass IPv4 packet forwarder")]
struct Cli {
    /// Path to the forwarder's configuration TOML file.
    #[arg(short, long, value_name = "FILE", default_value = "demos/config.toml")]
    config: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_from_path(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            // Logging hasn't been initialized yet. The config itself
            // supplies the level, so a config load failure is reported
            // on stderr directly rather than through `tracing`.
            eprintln!("failed to load configuration from {}: {err}", cli.config.display());
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    info!(
        nics = config.nics.len(),
        ring_indices = config.ring_indices,
        default_interface = config.default_interface,
        "configuration loaded"
    );

    let mut routes = Trie::new();
    if let Some(routes_file) = &config.routes_file {
        match load_routes_into(&mut routes, routes_file) {
            Ok(count) => info!(routes = count, path = %routes_file.display(), "seeded route table"),
            Err(err) => {
                error!(%err, path = %routes_file.display(), "failed to seed route table");
                std::process::exit(1);
            }
        }
    }
    let routes = Arc::new(routes);
    info!(nodes = routes.node_count(), "route table frozen");

    if let Err(err) = run_workers(&config, routes) {
        error!(%err, "forwarder exited with error");
        std::process::exit(1);
    }
}

fn run_workers(config: &Config, routes: Arc<Trie>) -> std::io::Result<()> {
    let provider = SoftwareRingProvider::new(DEMO_RING_CAPACITY, DEMO_RING_CAPACITY);

    // `nics_by_worker[w][n]` is the list of ring-index handles worker `w`
    // owns on nic `n`. Under `OneRingPerWorker` that's `ring_indices`
    // workers, each owning exactly one ring per nic; under
    // `AllRingsSingleWorker` it collapses to a single worker owning every
    // ring index on every nic (spec.md §4.2/§6).
    let worker_count = match config.ring_mode {
        RingMode::OneRingPerWorker => config.ring_indices,
        RingMode::AllRingsSingleWorker => 1,
    };
    let open_mode = match config.ring_mode {
        RingMode::OneRingPerWorker => OpenMode::OneRing,
        RingMode::AllRingsSingleWorker => OpenMode::AllRings,
    };

    let mut nics_by_worker: Vec<Vec<Vec<_>>> =
        (0..worker_count).map(|_| Vec::with_capacity(config.nics.len())).collect();
    for nic in &config.nics {
        let mut rings_per_worker: Vec<Vec<_>> = (0..worker_count).map(|_| Vec::new()).collect();
        for ring_index in 0..config.ring_indices {
            let handle = provider
                .open(nic, ring_index, open_mode)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            let worker_idx = match config.ring_mode {
                RingMode::OneRingPerWorker => ring_index as usize,
                RingMode::AllRingsSingleWorker => 0,
            };
            rings_per_worker[worker_idx].push(handle);
        }
        for (worker_idx, rings) in rings_per_worker.into_iter().enumerate() {
            nics_by_worker[worker_idx].push(rings);
        }
    }

    let mut handles = Vec::with_capacity(worker_count as usize);
    for (worker_id, nics) in nics_by_worker.into_iter().enumerate() {
        let worker_routes = Arc::clone(&routes);
        let default_interface = config.default_interface;
        let stats = Arc::new(ForwardingStats::new());
        let worker_id = worker_id as u16;

        handles.push(thread::spawn(move || {
            let mut worker = Worker::new(worker_id, nics, worker_routes, default_interface, stats);
            worker.run()
        }));
    }

    for handle in handles {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err),
            Err(_) => return Err(std::io::Error::other("worker thread panicked")),
        }
    }
    Ok(())
}

fn init_tracing(logging: &ringrouter_lib::LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(logging.show_target)
        .init();
}
