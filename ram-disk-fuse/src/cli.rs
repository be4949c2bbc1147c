use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
pub struct Cli {
    /// Output image path
    #[arg(long, short, default_value = "disk.img")]
    pub out: PathBuf,

    /// Device name to register
    #[arg(long, default_value = "ramblk")]
    pub name: String,

    /// Primary partition sizes in MiB
    #[arg(long, short, value_delimiter = ',', default_values_t = vec![10, 20])]
    pub primary: Vec<u64>,

    /// Logical partition sizes in MiB, laid out inside one extended partition
    #[arg(long, short, value_delimiter = ',', default_values_t = vec![10, 10])]
    pub logical: Vec<u64>,

    /// Abort a request at the first misaligned segment
    #[arg(long)]
    pub strict: bool,

    /// After dumping, resize to this many MiB through the control endpoint
    #[arg(long)]
    pub resize: Option<u64>,
}
