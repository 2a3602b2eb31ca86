use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;

use server::config::WorldConfig;
use server::map_registry::MapRegistry;
use server::tick;

fn setup_signal_handling(
    quit_flag: Arc<AtomicBool>,
) -> (std::thread::JoinHandle<()>, signal_hook::iterator::Handle) {
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGQUIT, SIGHUP]).unwrap();
    let handle = signals.handle();

    let signal_thread = std::thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGINT | SIGTERM | SIGQUIT => {
                    if !quit_flag.load(Ordering::SeqCst) {
                        log::info!("Got signal to terminate. Shutdown initiated...");
                    } else {
                        log::info!("Alright, alright, I'm already terminating!");
                    }
                    quit_flag.store(true, Ordering::SeqCst);
                }
                _ => {
                    log::warn!("Received unsupported signal: {sig}");
                }
            }
        }
    });

    (signal_thread, handle)
}

fn main() -> Result<(), String> {
    core::initialize_logger(log::LevelFilter::Info, Some("server.log")).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {e}. Exiting.");
        process::exit(1);
    });

    log::info!("Starting world server");
    log::info!("Process PID: {}", process::id());

    let quit_flag = Arc::new(AtomicBool::new(false));
    let (signal_thread, handle) = setup_signal_handling(quit_flag.clone());

    WorldConfig::initialize(WorldConfig::default()).unwrap_or_else(|e| {
        log::error!("Failed to initialize config: {e}. Exiting.");
        process::exit(1);
    });
    MapRegistry::initialize(WorldConfig::get().use_map_tiles);

    log::info!("Entering main world loop...");
    let tick_interval = std::time::Duration::from_millis(100);
    while !quit_flag.load(Ordering::SeqCst) {
        tick::tick_all_maps(MapRegistry::get());
        std::thread::sleep(tick_interval);
    }

    log::info!("Shutdown signal received, exiting main loop...");
    // TODO: drain active sessions and persist dirty characters before exit.

    handle.close();
    signal_thread.join().unwrap_or_else(|e| {
        log::error!("Failed to join signal handling thread: {e:?}");
    });

    log::info!("Server shutdown complete.");
    Ok(())
}
