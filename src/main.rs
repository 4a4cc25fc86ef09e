//! Naval sim headless driver
//!
//! Runs a scripted match without a window and prints the final frame as
//! JSON. Usage: `naval-sim [tuning.json|-] [frames] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use naval_sim::Tuning;
    use naval_sim::consts::SIM_DT;
    use naval_sim::sim::{FrameClock, FrameInput, FrameView, Intent, MatchEvent, MatchPhase, World, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = match args.first().map(String::as_str) {
        None | Some("-") => Tuning::default(),
        Some(path) => Tuning::load(Path::new(path)),
    };
    let frames: u64 = parse_arg(&args, 1, 3600);
    let seed: u64 = parse_arg(&args, 2, 0x5EA_5EED);

    log::info!("Naval sim starting: {} frames, seed {}", frames, seed);

    let mut world = World::new(tuning, seed);
    let mut clock = FrameClock::new();
    let mut host_frame = 0u64;

    'run: while world.time_ticks < frames {
        host_frame += 1;
        for _ in 0..clock.advance(SIM_DT) {
            let input = FrameInput {
                player: scripted_intent(world.time_ticks),
            };
            tick(&mut world, &input);

            for event in world.drain_events() {
                match event {
                    MatchEvent::VesselHit { target, attacker, health, .. } => {
                        log::debug!(
                            "Vessel {} hit by vessel {} ({:.0} hp left)",
                            target.index(),
                            attacker.index(),
                            health
                        );
                    }
                    other => log::debug!("{:?}", other),
                }
            }

            if world.phase == MatchPhase::Sunk {
                log::info!("Player sunk at tick {}", world.time_ticks);
                break 'run;
            }
        }
    }

    log::info!(
        "Finished after {} ticks ({} host frames): player health {:.0}, {} shots in flight, {} wave tiles",
        world.time_ticks,
        host_frame,
        world.player().health,
        world.projectiles.len(),
        world.waves.len()
    );

    match serde_json::to_string_pretty(&FrameView::capture(&world)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize frame: {}", e);
            std::process::exit(1);
        }
    }

    /// Full ahead with a slow weave, both broadsides firing
    fn scripted_intent(time_ticks: u64) -> Intent {
        let phase = time_ticks % 480;
        Intent {
            accelerate: true,
            turn_left: (120..240).contains(&phase),
            turn_right: (360..480).contains(&phase),
            fire_left: true,
            fire_right: true,
            ..Default::default()
        }
    }

    fn parse_arg(args: &[String], index: usize, default: u64) -> u64 {
        match args.get(index) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid argument {:?}; using {}", raw, default);
                default
            }),
            None => default,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm host drives `naval_sim::sim::tick` directly
}
