mod cli;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use ram_disk::{
    BlockDevice, DiskRegistry, PartRequest, PartitionScheme, RamDisk, SECTORS_PER_MIB,
    SECTOR_SIZE, TransferMode, control,
};
use typed_bytesize::ByteSizeIec;

pub use self::cli::Cli;

fn mib_sectors(mib: u64) -> usize {
    ByteSizeIec::mib(mib).0 as usize / SECTOR_SIZE
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut parts: Vec<PartRequest> = cli
        .primary
        .iter()
        .map(|&mib| PartRequest::Primary(mib_sectors(mib)))
        .collect();
    if !cli.logical.is_empty() {
        parts.push(PartRequest::Extended(
            cli.logical.iter().map(|&mib| mib_sectors(mib)).collect(),
        ));
    }

    let scheme = PartitionScheme::new(parts).expect("malformed partition list");
    let capacity = scheme.required_sectors();
    let mode = if cli.strict {
        TransferMode::Strict
    } else {
        TransferMode::Permissive
    };

    let registry = Arc::new(DiskRegistry::new());
    let disk = RamDisk::create(&registry, &cli.name, capacity, Some(&scheme), mode)
        .expect("device creation failed");
    println!(
        "{}: major={} capacity={} sectors",
        disk.name(),
        disk.major(),
        disk.capacity_sectors()
    );

    let mut fd = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&cli.out)?;

    let handle = disk.handle();
    let mut chunk = vec![0u8; SECTORS_PER_MIB * SECTOR_SIZE];
    let mut cursor = 0;
    while cursor < capacity {
        let sectors = (capacity - cursor).min(SECTORS_PER_MIB);
        let nbytes = sectors * SECTOR_SIZE;
        log::info!("dump sectors [{cursor}, {})", cursor + sectors);
        handle.read_block(cursor, &mut chunk[..nbytes]);
        fd.write_all(&chunk[..nbytes])?;
        cursor += sectors;
    }
    drop(handle);
    println!("image written to {}", cli.out.display());

    if let Some(mib) = cli.resize {
        control::write(&disk, format!("{mib}\n").as_bytes());
        println!("capacity now {} sectors", disk.capacity_sectors());
    }

    disk.destroy();
    Ok(())
}
