use std::path::PathBuf;

use anyhow::{Context, Result};
use las::{Builder, Point, Writer};

fn gaussian(d2: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-d2 / (2.0 * sigma.powi(2))).exp()
}

/// Terrain height at (x, y): a few smooth hills plus sensor noise.
fn terrain_height(x: f64, y: f64, hills: &[(f64, f64, f64, f64)], rng: &mut SimpleRng) -> f64 {
    let ground: f64 = hills
        .iter()
        .map(|&(cx, cy, sigma, amp)| gaussian((x - cx).powi(2) + (y - cy).powi(2), sigma, amp))
        .sum();
    ground + rng.gauss(0.0, 0.05)
}

/// Seeded xoshiro256** so repeated runs write byte-identical sample files.
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

/// Usage: `generate_sample [output.laz] [point_count]`
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "sample_data.laz".into()));
    let point_count: usize = match args.next() {
        Some(n) => n
            .parse()
            .with_context(|| format!("invalid point count '{n}'"))?,
        None => 10_000,
    };

    let mut rng = SimpleRng::new(42);

    // 100 m × 100 m tile, local origin offset like a projected CRS.
    let (origin_x, origin_y) = (512_000.0, 4_321_000.0);
    let hills = [
        (30.0, 40.0, 12.0, 8.0),
        (70.0, 65.0, 18.0, 14.0),
        (55.0, 20.0, 8.0, 5.0),
    ];

    let mut builder = Builder::from((1, 2));
    builder.point_format.is_compressed = output_path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("laz"));
    builder.transforms.x.offset = origin_x;
    builder.transforms.y.offset = origin_y;
    let header = builder.into_header().context("building LAS header")?;

    let mut writer = Writer::from_path(&output_path, header)
        .with_context(|| format!("creating {}", output_path.display()))?;

    for _ in 0..point_count {
        let x = rng.next_f64() * 100.0;
        let y = rng.next_f64() * 100.0;
        let z = 100.0 + terrain_height(x, y, &hills, &mut rng);
        writer
            .write_point(Point {
                x: origin_x + x,
                y: origin_y + y,
                z,
                ..Default::default()
            })
            .context("writing point")?;
    }
    writer.close().context("finalizing output")?;

    println!("Wrote {point_count} points to {}", output_path.display());
    Ok(())
}
