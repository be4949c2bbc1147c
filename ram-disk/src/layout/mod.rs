//! 磁盘数据结构层
//!
//! 扇区0是 MBR，扩展分区内每个逻辑分区前各有一个 EBR，
//! 两者共用同一种引导扇区布局：
//!
//! | 字节偏移 | 内容 |
//! |---------|------|
//! | 440 | 磁盘签名（仅 MBR）|
//! | 446 | 4项分区表 |
//! | 510 | 引导签名 `0xAA55` |

mod boot_record;
mod part_entry;

pub use self::{
    boot_record::{BOOT_SIGNATURE_OFFSET, BootRecord, DISK_SIGNATURE_OFFSET, PART_TABLE_OFFSET},
    part_entry::{BootFlag, PartEntry, PartKind, PartTable},
};

#[cfg(test)]
mod tests {
    use core::mem;

    use super::{BootRecord, PartEntry, PartTable};

    #[test]
    fn layout() {
        assert_eq!(16, mem::size_of::<PartEntry>());
        assert_eq!(64, mem::size_of::<PartTable>());
        assert_eq!(512, mem::size_of::<BootRecord>());
    }
}
