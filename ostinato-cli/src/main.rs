//! ostinato — drive the sequencer engines against real MIDI ports.
//!
//! The runner owns everything the engine library deliberately does not: the
//! MIDI ports, the clock, logging, and configuration. One thread, one loop:
//! poll incoming notes into the arpeggiator, advance the tick clock, feed
//! every fired tick to the engines.

use std::fs::File;
use std::time::{Duration, Instant};

use ostinato_core::clock::TickClock;
use ostinato_core::midi::{MidiInputManager, MidirOut, NoteMessage};
use ostinato_core::{Arpeggiator, Config, PitchEuclid};

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("ostinato")
        .join("ostinato.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path)
        .unwrap_or_else(|_| File::create("/tmp/ostinato.log").expect("Cannot create log file"));

    WriteLogger::init(log_level, simplelog::Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("ostinato starting (log level: {:?})", log_level);
}

fn arg_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn list_ports() {
    println!("MIDI output ports:");
    for port in MidirOut::list_ports() {
        println!("  {}: {}", port.index, port.name);
    }
    let mut input = MidiInputManager::new();
    input.refresh_ports();
    println!("MIDI input ports:");
    for port in input.list_ports() {
        println!("  {}: {}", port.index, port.name);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    if args.iter().any(|a| a == "--list-ports") {
        list_ports();
        return;
    }

    let defaults = Config::load().defaults();
    let bpm = arg_value::<f32>(&args, "--bpm").unwrap_or(defaults.bpm as f32);
    let out_port = arg_value::<usize>(&args, "--out-port").unwrap_or(0);
    let in_port = arg_value::<usize>(&args, "--in-port");
    let seed = arg_value::<u64>(&args, "--seed");

    let mut out = match MidirOut::connect(out_port) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("Cannot open MIDI output port {}: {}", out_port, e);
            eprintln!("Use --list-ports to see what is available.");
            std::process::exit(1);
        }
    };
    log::info!("sending to '{}' at {} BPM", out.port_name(), bpm);

    let mut input = MidiInputManager::new();
    if let Some(port) = in_port {
        input.refresh_ports();
        match input.connect(port) {
            Ok(()) => log::info!(
                "listening on '{}'",
                input.connected_port_name().unwrap_or("?")
            ),
            Err(e) => log::warn!("no MIDI input: {}", e),
        }
    }

    let mut arp = Arpeggiator::new(defaults.channel);
    arp.set_style(defaults.arp_style);
    arp.set_octaves(defaults.arp_octaves);
    arp.speed = defaults.arp_speed;
    arp.times = defaults.arp_times;
    arp.retrig = defaults.arp_retrig;

    let mut euclid = PitchEuclid::new((defaults.channel + 1) % 16);
    euclid.set_scale(defaults.euclid_scale);
    euclid.set_hits(defaults.euclid_hits);
    euclid.set_rotation(defaults.euclid_rotation);
    euclid.base_pitch = defaults.euclid_base_pitch;
    euclid.note_length = defaults.euclid_note_length;
    euclid.set_pitch_length(defaults.euclid_pitch_length as usize);

    if let Some(seed) = seed {
        arp.seed_rng(seed);
        euclid.seed_rng(seed.wrapping_add(1));
    }

    let mut clock = TickClock::new();
    let mut last = Instant::now();

    loop {
        for msg in input.poll_events() {
            match msg {
                NoteMessage::On {
                    pitch, velocity, ..
                } => arp.note_on(pitch, velocity),
                NoteMessage::Off { pitch, .. } => arp.note_off(pitch),
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last);
        last = now;

        for tick in clock.advance(elapsed, bpm) {
            if TickClock::is_beat(tick) {
                arp.on_beat();
            }
            arp.on_tick(&mut out);
            euclid.on_tick(tick, &mut out);
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}
