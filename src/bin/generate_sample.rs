use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (site, share of flights, base success probability)
const SITES: [(&str, f64, f64); 4] = [
    ("CCAFS LC-40", 0.47, 0.27),
    ("CCAFS SLC-40", 0.13, 0.43),
    ("KSC LC-39A", 0.23, 0.77),
    ("VAFB SLC-4E", 0.17, 0.40),
];

const BOOSTERS: [&str; 5] = ["v1.0", "v1.1", "FT", "B4", "B5"];

fn pick_site(rng: &mut SimpleRng) -> (&'static str, f64) {
    let mut roll = rng.next_f64();
    for (site, share, success) in SITES {
        if roll < share {
            return (site, success);
        }
        roll -= share;
    }
    (SITES[0].0, SITES[0].2)
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_launches: i64 = 56;

    let mut flight_numbers: Vec<i64> = Vec::new();
    let mut sites: Vec<&str> = Vec::new();
    let mut payloads: Vec<f64> = Vec::new();
    let mut classes: Vec<i64> = Vec::new();
    let mut boosters: Vec<String> = Vec::new();

    for flight in 1..=n_launches {
        let (site, base_success) = pick_site(&mut rng);
        // Payloads on a 1 kg grid, roughly 0..=9600 kg, heavier later on.
        let progress = flight as f64 / n_launches as f64;
        let payload = (rng.next_f64() * 6000.0 + progress * 3600.0).round();
        // Later flights land more often.
        let p_success = (base_success + 0.4 * progress).min(0.95);
        let class = i64::from(rng.next_f64() < p_success);
        let booster = format!("F9 {}", rng.pick(&BOOSTERS));

        flight_numbers.push(flight);
        sites.push(site);
        payloads.push(payload);
        classes.push(class);
        boosters.push(booster);
    }

    // Write CSV
    let csv_path = "sample_launches.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record(["Flight Number", "Launch Site", "class", "Payload Mass (kg)", "Booster Version"])
        .expect("Failed to write CSV header");
    for i in 0..flight_numbers.len() {
        writer
            .write_record([
                flight_numbers[i].to_string(),
                sites[i].to_string(),
                classes[i].to_string(),
                format!("{:.1}", payloads[i]),
                boosters[i].clone(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Build Arrow arrays
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(flight_numbers)),
            Arc::new(StringArray::from(sites)),
            Arc::new(Int64Array::from(classes)),
            Arc::new(Float64Array::from(payloads)),
            Arc::new(StringArray::from(
                boosters.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_launches.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_launches} launches to {csv_path} and {parquet_path}");
}
