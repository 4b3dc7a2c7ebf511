use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use datacure::data::export::save_csv;
use datacure::data::{Column, Dataset, Value};

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated record before duplication.
#[derive(Clone)]
struct Row {
    name: Option<String>,
    city: Option<String>,
    phone: Option<String>,
    age: Option<f64>,
    score: Option<f64>,
}

fn generate_rows(rng: &mut SimpleRng, n: usize) -> Vec<Row> {
    let names = ["Alice", "Bob", "Carol", "Dave", "Eve", "Frank"];
    let cities = ["New-York", "Los Angeles", "San*Diego", " Austin ", "-", "Boston+"];

    let mut rows: Vec<Row> = (0..n)
        .map(|i| Row {
            name: (!rng.chance(0.05)).then(|| format!("{}-{i}", rng.pick(&names))),
            city: (!rng.chance(0.1)).then(|| rng.pick(&cities).to_string()),
            phone: (!rng.chance(0.1)).then(|| {
                format!("+1-555-{:04}", rng.next_u64() % 10_000)
            }),
            age: (!rng.chance(0.15)).then(|| (18 + rng.next_u64() % 60) as f64),
            score: (!rng.chance(0.2)).then(|| (rng.next_f64() * 1000.0).round() / 10.0),
        })
        .collect();

    // Every tenth row appears twice.
    let duplicates: Vec<Row> = rows.iter().step_by(10).cloned().collect();
    rows.extend(duplicates);
    rows
}

fn to_dataset(rows: &[Row]) -> Result<Dataset> {
    let text = |f: fn(&Row) -> &Option<String>| -> Vec<Value> {
        rows.iter().map(|r| f(r).as_deref().into()).collect()
    };
    let number = |f: fn(&Row) -> Option<f64>| -> Vec<Value> {
        rows.iter().map(|r| f(r).into()).collect()
    };

    Dataset::new(vec![
        Column::new("name", text(|r| &r.name)),
        Column::new("city", text(|r| &r.city)),
        Column::new("phone", text(|r| &r.phone)),
        Column::new("age", number(|r| r.age)),
        Column::new("score", number(|r| r.score)),
    ])
    .context("assembling sample dataset")
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let text = |f: fn(&Row) -> &Option<String>| -> ArrayRef {
        Arc::new(StringArray::from(
            rows.iter().map(|r| f(r).as_deref()).collect::<Vec<_>>(),
        ))
    };
    let number = |f: fn(&Row) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, true),
        Field::new("city", DataType::Utf8, true),
        Field::new("phone", DataType::Utf8, true),
        Field::new("age", DataType::Float64, true),
        Field::new("score", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| &r.name),
            text(|r| &r.city),
            text(|r| &r.phone),
            number(|r| r.age),
            number(|r| r.score),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng, 200);

    let csv_path = Path::new("sample_dataset.csv");
    save_csv(&to_dataset(&rows)?, csv_path)?;

    let parquet_path = Path::new("sample_dataset.parquet");
    write_parquet(&rows, parquet_path)?;

    println!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
