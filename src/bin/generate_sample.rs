use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};

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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.range(0, items.len() as i64 - 1) as usize]
    }
}

const HEADERS: [&str; 8] = [
    "Date",
    "Time",
    "Shift",
    "VFD_MODE_STATUS",
    "VOLTAGE_RMS",
    "VFD_RUNNING_FRQ",
    "VFD_CURRENT",
    "MOTOR_TEMP",
];
const MODES: [&str; 3] = ["AUTO", "MANUAL", "STOP"];
const NULL_SPELLINGS: [&str; 5] = ["null", "N/A", "-", "undefined", ""];

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data.csv"));

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).context("invalid start date")?;

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    // Exported logs carry a trailing comma after the last header.
    let mut header: Vec<&str> = HEADERS.to_vec();
    header.push("");
    writer.write_record(&header)?;

    let mut n_rows = 0usize;
    for day in 0..21u64 {
        let date = start
            .checked_add_days(Days::new(day))
            .context("date out of range")?
            .format("%d/%m/%y")
            .to_string();

        for hour in (0..24).step_by(2) {
            let shift = if (6..18).contains(&hour) { "Day" } else { "Night" };
            let mode = rng.pick(&MODES);
            let running = mode != "STOP";

            // Drive readings are logged in tenths.
            let voltage = rng.range(4100, 4200);
            let frequency = if running { rng.range(300, 500) } else { 0 };
            let current = if running { rng.range(80, 240) } else { 0 };
            let temp = rng.range(35, 80);

            let mut record: Vec<String> = vec![
                date.clone(),
                format!("{hour:02}:00"),
                shift.to_string(),
                mode.to_string(),
                voltage.to_string(),
                frequency.to_string(),
                current.to_string(),
                temp.to_string(),
            ];

            // Sprinkle the gaps a real export has.
            for cell in record.iter_mut().skip(2) {
                if rng.next_f64() < 0.03 {
                    *cell = rng.pick(&NULL_SPELLINGS).to_string();
                }
            }
            if rng.next_f64() < 0.05 {
                record.pop();
            }
            if rng.next_f64() < 0.01 {
                record.truncate(3);
            }

            writer.write_record(&record)?;
            n_rows += 1;
        }
    }

    writer.flush()?;
    println!("Wrote {n_rows} rows to {}", path.display());
    Ok(())
}
