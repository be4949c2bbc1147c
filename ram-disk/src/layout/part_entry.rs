use core::{ptr, slice};

use crate::geometry::Chs;
use crate::sector::SectorId;

/// 分区类型代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PartKind {
    Empty = 0x00,
    /// 扩展分区容器，也用于 EBR 链的衔接项
    Extended = 0x05,
    /// Linux 数据分区
    LinuxData = 0x83,
}

/// 引导指示字节
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BootFlag {
    Inactive = 0x00,
    Active = 0x80,
}

/// 分区表项的磁盘格式
#[derive(Debug, Default, Clone)]
#[repr(C)]
pub struct PartEntry {
    boot: u8,
    start_chs: [u8; 3],
    kind: u8,
    end_chs: [u8; 3],
    abs_start_sec: u32,
    sec_in_part: u32,
}

impl PartEntry {
    /// 表项大小恒为16字节
    pub const SIZE: usize = 16;

    /// `start` 是 CHS 字段的绝对扇区基准；`abs_start_sec` 是写入磁盘的
    /// 起始字段，EBR 表项以所在引导记录为基准，因此两者分开给出。
    pub fn new(kind: PartKind, start: SectorId, sectors: usize, abs_start_sec: u32) -> Self {
        assert!(sectors > 0);

        Self {
            boot: BootFlag::Inactive as u8,
            start_chs: Chs::from_sector(start).encode(),
            kind: kind as u8,
            end_chs: Chs::from_sector(start + (sectors - 1)).encode(),
            abs_start_sec,
            sec_in_part: sectors as u32,
        }
    }

    #[inline]
    pub fn abs_start_sec(&self) -> u32 {
        self.abs_start_sec
    }

    #[inline]
    pub fn sec_in_part(&self) -> u32 {
        self.sec_in_part
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kind == PartKind::Empty as u8
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(ptr::from_ref(self).cast(), Self::SIZE) }
    }
}

/// 4项分区表，MBR 与 EBR 均内嵌一份
#[derive(Debug, Default, Clone)]
#[repr(transparent)]
pub struct PartTable([PartEntry; 4]);

impl PartTable {
    /// 整表大小恒为64字节
    pub const SIZE: usize = PartEntry::SIZE * 4;

    /// 表项个数
    pub const LEN: usize = 4;

    #[inline]
    pub fn entry(&self, slot: usize) -> &PartEntry {
        &self.0[slot]
    }

    #[inline]
    pub fn set_entry(&mut self, slot: usize, entry: PartEntry) {
        self.0[slot] = entry;
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(ptr::from_ref(self).cast(), Self::SIZE) }
    }
}

impl From<[PartEntry; 4]> for PartTable {
    fn from(entries: [PartEntry; 4]) -> Self {
        Self(entries)
    }
}
