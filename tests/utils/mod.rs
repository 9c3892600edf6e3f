#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use migration_stats::PipelineConfig;
use tempfile::TempDir;

/// Primary record table used by most integration tests
///
/// Sudan outflow goes to Chad and South Sudan; Eritrea has no coordinates;
/// "Others" and "Various" are rollup rows.
pub const RECORDS_CSV: &str = "\
Country,Country of Origin,Population type,Date,Individuals
Chad,Sudan,Refugees,2024-01-31,600000
South Sudan,Sudan,Refugees,2024-01-31,200000
Eritrea,Somalia,Refugees,2024-01-31,50000
Uganda,South Sudan,Refugees,2024-02-29,1600000
Uganda,Others,Refugees,2024-02-29,20000
Kenya,Somalia,Asylum-Seekers,2024-02-29,8000
Various,Somalia,Refugees,2023-12-31,30000
";

/// Destination coordinates as exported with an unnamed index column
pub const DESTINATIONS_CSV: &str = "\
,country,lat,long
0,Chad,15.454166,18.732207
1,South Sudan,6.876992,31.306978
2,Uganda,1.373333,32.290275
3,Kenya,-0.023559,37.906193
4,Various,0.0,0.0
";

/// Origin coordinates as exported with an unnamed index column
pub const ORIGINS_CSV: &str = "\
,country,latitude,longitude
0,Sudan,12.862807,30.217636
1,South Sudan,6.876992,31.306978
2,Somalia,5.152149,46.199616
3,Others,0.0,0.0
";

/// Write `contents` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).expect("create fixture file");
    file.write_all(contents.as_bytes())
        .expect("write fixture file");
    path
}

/// Lay out the three standard fixture tables and a config pointing at them
pub fn fixture_config(dir: &TempDir) -> PipelineConfig {
    config_for(dir, RECORDS_CSV, DESTINATIONS_CSV, ORIGINS_CSV)
}

/// Lay out custom fixture tables and a config pointing at them
pub fn config_for(
    dir: &TempDir,
    records: &str,
    destinations: &str,
    origins: &str,
) -> PipelineConfig {
    PipelineConfig {
        records_path: write_file(dir.path(), "unhcr.csv", records),
        destinations_path: write_file(dir.path(), "Geolocation.csv", destinations),
        origins_path: write_file(dir.path(), "origin.csv", origins),
        ..Default::default()
    }
}

/// Compare two floats with a small tolerance
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
