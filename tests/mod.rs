pub mod fixtures;
pub mod integration;
pub mod unit;

use std::path::PathBuf;

pub fn get_test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

pub fn get_test_xfdf_path(filename: &str) -> PathBuf {
    get_test_data_dir().join(filename)
}
