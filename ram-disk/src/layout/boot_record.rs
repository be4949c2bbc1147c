use crate::{BOOT_SIGNATURE, SECTOR_SIZE};

use super::part_entry::PartTable;

/// 磁盘签名的字节偏移，仅 MBR 写入
pub const DISK_SIGNATURE_OFFSET: usize = 440;
/// 分区表的字节偏移
pub const PART_TABLE_OFFSET: usize = 446;
/// 引导签名的字节偏移
pub const BOOT_SIGNATURE_OFFSET: usize = 510;

/// 一个组装完毕的引导扇区映像
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct BootRecord {
    data: [u8; SECTOR_SIZE],
}

impl BootRecord {
    /// 主引导记录：磁盘签名、分区表加引导签名
    pub fn mbr(table: &PartTable, disk_signature: u32) -> Self {
        let mut record = Self::ebr(table);
        record.data[DISK_SIGNATURE_OFFSET..DISK_SIGNATURE_OFFSET + 4]
            .copy_from_slice(&disk_signature.to_le_bytes());
        record
    }

    /// 扩展引导记录：只有分区表和引导签名
    pub fn ebr(table: &PartTable) -> Self {
        let mut data = [0; SECTOR_SIZE];
        data[PART_TABLE_OFFSET..PART_TABLE_OFFSET + PartTable::SIZE]
            .copy_from_slice(table.as_bytes());
        data[BOOT_SIGNATURE_OFFSET..].copy_from_slice(&BOOT_SIGNATURE.to_le_bytes());

        Self { data }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
