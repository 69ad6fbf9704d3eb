//! Wave Diffraction headless driver
//!
//! Loads a scene (or generates a seeded random one), runs it at a fixed
//! timestep until it finishes or the tick budget runs out, and prints the
//! final frame as JSON on stdout.
//!
//! Usage:
//!   wave-diffraction <scene.json> [--ticks N]
//!   wave-diffraction --random <seed> [--sources N] [--barriers N] [--ticks N]
//!   wave-diffraction --random <seed> --save <scene.json>

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::env;
    use std::path::PathBuf;

    use wave_diffraction::consts::SIM_DT;
    use wave_diffraction::sim::{TickInput, tick};
    use wave_diffraction::{Scene, SceneError, SimConfig};

    const DEFAULT_TICKS: u64 = 60 * 60;

    #[derive(Debug)]
    enum SceneSource {
        File(PathBuf),
        Random {
            seed: u64,
            sources: usize,
            barriers: usize,
        },
    }

    #[derive(Debug)]
    struct Options {
        scene: SceneSource,
        ticks: u64,
        save: Option<PathBuf>,
    }

    fn usage() -> String {
        "Usage: wave-diffraction <scene.json> [--ticks N]\n       \
         wave-diffraction --random <seed> [--sources N] [--barriers N] [--ticks N] [--save <scene.json>]"
            .to_string()
    }

    fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
        let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
        value
            .parse()
            .map_err(|_| format!("{flag}: invalid value '{value}'"))
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
        let mut path = None;
        let mut seed = None;
        let mut sources = 2;
        let mut barriers = 4;
        let mut ticks = DEFAULT_TICKS;
        let mut save = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--random" => seed = Some(parse_value("--random", args.next())?),
                "--sources" => sources = parse_value("--sources", args.next())?,
                "--barriers" => barriers = parse_value("--barriers", args.next())?,
                "--ticks" => ticks = parse_value("--ticks", args.next())?,
                "--save" => save = Some(PathBuf::from(parse_value::<String>("--save", args.next())?)),
                "-h" | "--help" => return Err(usage()),
                other if other.starts_with("--") => return Err(format!("unknown option {other}\n{}", usage())),
                other => path = Some(PathBuf::from(other)),
            }
        }

        let scene = match (path, seed) {
            (Some(path), None) => SceneSource::File(path),
            (None, Some(seed)) => SceneSource::Random {
                seed,
                sources,
                barriers,
            },
            (Some(_), Some(_)) => return Err("give a scene file or --random, not both".to_string()),
            (None, None) => return Err(usage()),
        };
        Ok(Options { scene, ticks, save })
    }

    fn run(options: Options) -> Result<(), SceneError> {
        let scene = match options.scene {
            SceneSource::File(path) => Scene::load(path)?,
            SceneSource::Random {
                seed,
                sources,
                barriers,
            } => Scene::random(seed, SimConfig::default(), sources, barriers),
        };
        if let Some(path) = options.save {
            return scene.save(path);
        }

        let mut sim = scene.build()?;
        let mut input = TickInput {
            start: true,
            ..Default::default()
        };
        let mut peak = 0;
        let mut diffracted = 0;

        for _ in 0..options.ticks {
            let summary = tick(&mut sim, &input, SIM_DT);
            input = TickInput::default();
            peak = peak.max(summary.live);
            diffracted += summary.diffracted;

            if sim.time_ticks() % 60 == 0 {
                log::info!(
                    "t = {:.1}s: {} live wavefront(s), {} arc(s)",
                    sim.elapsed(),
                    summary.live,
                    sim.frame().arc_count()
                );
            }
            if summary.run_ended {
                break;
            }
        }

        log::info!(
            "Stopped after {} ticks ({:?}): peak {} live, {} diffracted",
            sim.time_ticks(),
            sim.phase(),
            peak,
            diffracted
        );
        println!("{}", serde_json::to_string_pretty(&sim.frame())?);
        Ok(())
    }

    pub fn main() {
        env_logger::init();
        log::info!("Wave Diffraction (headless) starting...");

        let options = match parse_args(env::args().skip(1)) {
            Ok(options) => options,
            Err(message) => {
                eprintln!("{message}");
                std::process::exit(2);
            }
        };
        if let Err(e) = run(options) {
            log::error!("{e}");
            std::process::exit(1);
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
