//! SD video animation CLI - Play a frame group from a host directory.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use sd_video_anim::{
    playback::{FsStorage, HeadlessDisplay, PlaybackManager, PlaybackStats, TickTimers},
    schema::PlayerConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [ticks]", args[0]);
        eprintln!();
        eprintln!("Play an animation group from a directory standing in for the SD card.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to player configuration file");
        eprintln!("  ticks        Number of timer periods to run (default: 100)");
        eprintln!();
        eprintln!("Example configuration is printed with --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let ticks: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = PlayerConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    let registry = config.registry();
    println!("SD Video Animation");
    println!("==================");
    println!(
        "Frame: {}x{} ({:?}, {} bytes)",
        config.width,
        config.height,
        config.pixel_format(),
        config.frame_size()
    );
    println!("Storage root: {}", config.storage_root.display());
    for (i, group) in registry.iter().enumerate() {
        println!("  Group {}: {} ({} frames)", i, group.pattern, group.frame_count);
    }
    println!("Interval: {} ms", config.interval_ms);
    println!("Ticks: {}", ticks);
    println!();

    let mut manager = PlaybackManager::new(
        HeadlessDisplay::new(),
        TickTimers::new(),
        FsStorage::new(&config.storage_root),
        registry,
        config.pixel_format(),
        config.geometry(),
    );

    if let Err(e) = manager.start_group(config.group, config.interval()) {
        eprintln!("Error starting group {}: {}", config.group, e);
        std::process::exit(1);
    }

    if let Some(active) = manager.active()
        && !active.first_frame_presented()
    {
        println!("First frame missing, starting blank");
    }

    let start = Instant::now();
    for _ in 0..ticks {
        let fired = manager.timers_mut().advance(config.interval());
        for handle in fired {
            if let Some(outcome) = manager.on_timer(handle)
                && !outcome.is_presented()
            {
                println!("  Frame {} skipped", outcome.frame());
            }
        }
    }
    let elapsed = start.elapsed();

    let stats = manager
        .active()
        .map(|active| active.stats())
        .unwrap_or_default();
    let frame_index = manager.active().map_or(0, |active| active.frame_index());
    manager.stop();

    println!();
    print_summary(&stats, frame_index);
    println!(
        "Time: {:.2}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        stats.ticks as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );
}

fn print_summary(stats: &PlaybackStats, frame_index: u32) {
    println!("Playback: {}", stats);
    println!("Next frame index: {}", frame_index);
}

fn print_example_config() {
    let config = PlayerConfig::default();

    println!("Example configuration (config.json):");
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_default()
    );
}
