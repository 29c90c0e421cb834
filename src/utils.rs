use crate::errors::Result;
use crate::splits::SplitResult;
use polars::prelude::*;
use std::io::Write;
use std::path::Path;

/// Structure code of a dataset id: the first four characters of its file name, lower-cased.
///
/// `"/data/1ABC_l_u.pdb"` and `"1abc"` both map to `"1abc"`.
pub fn pdb_code(id: &str) -> String {
    let name = Path::new(id)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string());
    name.chars().take(4).collect::<String>().to_lowercase()
}

/// Run `f` inside a rayon pool with `num_threads` workers (0 for all cores).
pub fn run_with_threads<T, F>(num_threads: usize, f: F) -> Result<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(pool.install(f))
}

/// Write a DataFrame to `file_path`, replacing its extension with the one of `file_type`.
pub fn write_df_to_file(
    df: &mut DataFrame,
    file_path: &Path,
    file_type: DataFrameFileType,
) -> Result<()> {
    let file_suffix = file_type.to_string();
    let mut file = std::fs::File::create(file_path.with_extension(file_suffix))?;
    match file_type {
        DataFrameFileType::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        DataFrameFileType::NDJson => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
    }
    Ok(())
}

/// Write `train.txt`, `val.txt` and `test.txt` with one id per line into `dir`.
pub fn write_split(dir: &Path, split: &SplitResult) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for (name, ids) in [
        ("train", &split.train),
        ("val", &split.val),
        ("test", &split.test),
    ] {
        let mut file = std::fs::File::create(dir.join(name).with_extension("txt"))?;
        for id in ids {
            writeln!(file, "{id}")?;
        }
    }
    Ok(())
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}
