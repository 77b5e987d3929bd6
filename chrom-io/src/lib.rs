use arrow::error::ArrowError;
use chrom_core::FeatureError;

pub mod compile;
pub mod csv;
pub mod features;
pub mod parquet;
pub mod pdb;
pub mod ply;
pub mod table;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("arrow error")]
    Arrow(#[from] ArrowError),
    #[error("parquet error")]
    Parquet(#[from] ::parquet::errors::ParquetError),
    #[error("invalid PDB record on line {line}: {message}")]
    Pdb { line: usize, message: String },
    #[error("structure contains no atoms")]
    EmptyStructure,
    #[error("feature computation failed")]
    Feature(#[from] FeatureError),
    #[error("tables differ in length: {left} and {right} rows")]
    RowMismatch { left: usize, right: usize },
}

/// Table format extensions
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatExt {
    CSV,
    Parquet,
    PLY,
}

impl AsRef<std::ffi::OsStr> for FormatExt {
    fn as_ref(&self) -> &std::ffi::OsStr {
        match self {
            FormatExt::CSV => std::ffi::OsStr::new("csv"),
            FormatExt::Parquet => std::ffi::OsStr::new("parquet"),
            FormatExt::PLY => std::ffi::OsStr::new("ply"),
        }
    }
}
