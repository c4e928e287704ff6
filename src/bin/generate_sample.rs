use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_explorer::data::model::City;
use chrono::{Duration, NaiveDate, NaiveDateTime};

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Index into `weights`, chosen proportionally.
    fn weighted(&mut self, weights: &[u32]) -> usize {
        let total: u32 = weights.iter().sum();
        let mut pick = self.below(total as u64) as u32;
        for (i, &w) in weights.iter().enumerate() {
            if pick < w {
                return i;
            }
            pick -= w;
        }
        weights.len() - 1
    }
}

struct CityPlan {
    city: City,
    stations: &'static [&'static str],
    trips: usize,
}

const CITIES: [CityPlan; 3] = [
    CityPlan {
        city: City::Chicago,
        stations: &[
            "Streeter Dr & Grand Ave",
            "Lake Shore Dr & Monroe St",
            "Clinton St & Washington Blvd",
            "Canal St & Adams St",
            "Theater on the Lake",
            "Michigan Ave & Oak St",
        ],
        trips: 3000,
    },
    CityPlan {
        city: City::NewYork,
        stations: &[
            "Pershing Square North",
            "E 17 St & Broadway",
            "W 21 St & 6 Ave",
            "Broadway & E 22 St",
            "West St & Chambers St",
            "12 Ave & W 40 St",
        ],
        trips: 3000,
    },
    CityPlan {
        city: City::Washington,
        stations: &[
            "Columbus Circle / Union Station",
            "Lincoln Memorial",
            "Jefferson Dept of Energy",
            "Massachusetts Ave & Dupont Circle NW",
            "15th & P St NW",
            "Smithsonian-National Mall / Jefferson Dr & 12th St SW",
        ],
        trips: 2000,
    },
];

/// Rush hours dominate; the weights cover hours 0..24.
const HOUR_WEIGHTS: [u32; 24] = [
    1, 1, 1, 1, 1, 2, 5, 12, 16, 9, 6, 7, 8, 8, 7, 8, 12, 18, 14, 9, 6, 4, 3, 2,
];

fn random_start(origin: NaiveDateTime, rng: &mut SimpleRng) -> NaiveDateTime {
    // 181 days from January 1st covers January to June
    let day = Duration::days(rng.below(181) as i64);
    let hour = Duration::hours(rng.weighted(&HOUR_WEIGHTS) as i64);
    origin + day + hour + Duration::seconds(rng.below(3600) as i64)
}

fn write_city(dir: &Path, plan: &CityPlan, origin: NaiveDateTime, rng: &mut SimpleRng) -> Result<()> {
    let path = dir.join(plan.city.file_name());
    let demographics = plan.city.has_demographics();
    let mut writer = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![
        "",
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
        "User Type",
    ];
    if demographics {
        header.extend(["Gender", "Birth Year"]);
    }
    writer.write_record(&header)?;

    // Skewed station popularity so the modes are stable.
    let station_weights: Vec<u32> = (0..plan.stations.len() as u32).map(|i| 12 - i).collect();

    for id in 0..plan.trips {
        let start = random_start(origin, rng);
        let seconds = 120.0 + rng.next_f64() * 2400.0;
        let end = start + Duration::milliseconds((seconds * 1000.0) as i64);
        let from = plan.stations[rng.weighted(&station_weights)];
        let to = plan.stations[rng.weighted(&station_weights)];
        let user_type = match rng.below(10) {
            0..=6 => "Subscriber",
            7..=8 => "Customer",
            _ => "",
        };

        let mut row = vec![
            (id * 37 + 11).to_string(),
            start.format("%Y-%m-%d %H:%M:%S").to_string(),
            end.format("%Y-%m-%d %H:%M:%S").to_string(),
            if demographics {
                format!("{}", seconds.round())
            } else {
                format!("{seconds:.3}")
            },
            from.to_string(),
            to.to_string(),
            user_type.to_string(),
        ];
        if demographics {
            // Only subscribers carry demographics.
            if user_type == "Subscriber" {
                let gender = if rng.below(3) == 0 { "Female" } else { "Male" };
                let year = 1950 + rng.below(50);
                row.push(gender.to_string());
                row.push(format!("{year}.0"));
            } else {
                row.push(String::new());
                row.push(String::new());
            }
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;

    println!("Wrote {} trips to {}", plan.trips, path.display());
    Ok(())
}

/// Write one sample file per city into `dir`, creating it if needed.
fn write_samples(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let origin = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building sample start date")?;

    let mut rng = SimpleRng::new(42);
    for plan in &CITIES {
        write_city(dir, plan, origin, &mut rng)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let dir: PathBuf = std::env::args().nth(1).unwrap_or_else(|| ".".to_string()).into();
    write_samples(&dir)
}
