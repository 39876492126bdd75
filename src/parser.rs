// 🏗️ Record loading - CSV payroll sheets and the synthetic demo batch
//
// CSV layout (header required):
//   name,salary,role
//   Name42_0,0.00,boss

use crate::entities::{Category, Record};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

// ============================================================================
// RAW ROW
// ============================================================================

/// One CSV row before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub name: String,
    pub salary: String,
    pub role: String,
}

impl RawRecord {
    pub fn into_record(self) -> crate::error::Result<Record> {
        Record::create(self.name, &self.salary, &self.role)
    }
}

// ============================================================================
// CSV LOADING
// ============================================================================

/// Load and validate every row of a payroll CSV
///
/// The first invalid row aborts the load; nothing is aggregated from a
/// partially valid file.
pub fn load_csv(csv_path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    parse_reader(file)
}

pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (index, result) in rdr.deserialize::<RawRecord>().enumerate() {
        // header is line 1
        let line = index + 2;
        let raw = result.with_context(|| format!("Failed to deserialize row on line {}", line))?;
        let record = raw
            .into_record()
            .with_context(|| format!("Invalid record on line {}", line))?;
        records.push(record);
    }

    Ok(records)
}

// ============================================================================
// SYNTHETIC BATCH
// ============================================================================

/// Demo batch: even rows are bosses, odd rows developers, salary `i.00`
pub fn synthetic_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let category = if i % 2 == 0 {
                Category::Boss
            } else {
                Category::Developer
            };
            Record::new(format!("Name_{}", i), Decimal::new(i as i64 * 100, 2), category)
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
