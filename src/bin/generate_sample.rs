use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

/// Write synthetic cleaned datasets for Benin, Sierra Leone and Togo.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output directory.
    #[arg(short, long, default_value = "data")]
    out_dir: PathBuf,
    /// Days of one-minute observations per country.
    #[arg(short, long, default_value_t = 7)]
    days: u32,
}

/// Per-country climate knobs: (file name, peak GHI, cloudiness, mean temperature).
const SITES: [(&str, f64, f64, f64); 3] = [
    ("benin_clean.csv", 1050.0, 0.15, 28.0),
    ("sierraleone_clean.csv", 900.0, 0.35, 26.0),
    ("togo_clean.csv", 980.0, 0.22, 27.5),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Fraction of peak irradiance at a given hour, zero at night.
fn daylight(hour: f64) -> f64 {
    if (6.0..=18.0).contains(&hour) {
        (std::f64::consts::PI * (hour - 6.0) / 12.0).sin()
    } else {
        0.0
    }
}

fn write_site(
    path: &Path,
    days: u32,
    peak: f64,
    cloudiness: f64,
    temp: f64,
    rng: &mut SimpleRng,
) -> Result<usize> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Timestamp", "GHI", "DNI", "DHI", "Tamb", "RH", "WS"])?;

    let mut rows = 0;
    for day in 0..days {
        for minute in 0..24 * 60 {
            let hour = minute as f64 / 60.0;
            let sun = daylight(hour);
            let cloud = if rng.next_f64() < cloudiness {
                rng.next_f64() * 0.7
            } else {
                0.0
            };

            let ghi = (peak * sun * (1.0 - cloud) + rng.gauss(0.0, 5.0)).max(0.0);
            let dni = (ghi * (0.85 - cloud) + rng.gauss(0.0, 4.0)).max(0.0);
            let dhi = (ghi - dni * sun).max(0.0);
            let tamb = temp + 4.0 * sun + rng.gauss(0.0, 0.8);
            let rh = (85.0 - 30.0 * sun + rng.gauss(0.0, 3.0)).clamp(0.0, 100.0);
            let ws = rng.gauss(2.5, 1.0).max(0.0);

            writer.write_record([
                format!(
                    "2021-08-{:02} {:02}:{:02}",
                    day % 28 + 1,
                    minute / 60,
                    minute % 60
                ),
                format!("{ghi:.1}"),
                format!("{dni:.1}"),
                format!("{dhi:.1}"),
                format!("{tamb:.1}"),
                format!("{rh:.1}"),
                format!("{ws:.1}"),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for (file_name, peak, cloudiness, temp) in SITES {
        let path = args.out_dir.join(file_name);
        let rows = write_site(&path, args.days, peak, cloudiness, temp, &mut rng)?;
        println!("Wrote {rows} observations to {}", path.display());
    }
    Ok(())
}
