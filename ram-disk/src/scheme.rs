//! 分区方案层
//!
//! 把一组分区尺寸请求编排为 MBR 加 EBR 链的磁盘布局。
//! 构建只校验结构；容量是否放得下由调用方保证。

use alloc::vec::Vec;

use crate::layout::{BootRecord, PartEntry, PartKind, PartTable};
use crate::sector::SectorId;
use crate::store::{BackingStore, StoreError};

/// 未另行指定时写入 MBR 的磁盘签名
pub const DEFAULT_DISK_SIGNATURE: u32 = 0x36E5_756D;

/// 一条分区尺寸请求，尺寸以扇区计
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartRequest {
    /// 主分区
    Primary(usize),
    /// 扩展分区，内含各逻辑分区的尺寸
    Extended(Vec<usize>),
}

/// 方案的结构校验错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeError {
    /// 顶层表项超过4项
    TooManyEntries,
    /// 不止一个扩展分区
    MultipleExtended,
    /// 扩展分区内没有逻辑分区
    EmptyExtended,
    /// 出现尺寸为零的分区
    ZeroSize,
}

/// 通过结构校验的分区方案
#[derive(Debug, Clone)]
pub struct PartitionScheme {
    parts: Vec<PartRequest>,
    disk_signature: u32,
}

impl PartitionScheme {
    pub fn new(parts: Vec<PartRequest>) -> Result<Self, SchemeError> {
        if parts.len() > PartTable::LEN {
            return Err(SchemeError::TooManyEntries);
        }
        if parts
            .iter()
            .filter(|part| matches!(part, PartRequest::Extended(_)))
            .count()
            > 1
        {
            return Err(SchemeError::MultipleExtended);
        }
        for part in &parts {
            match part {
                PartRequest::Primary(0) => return Err(SchemeError::ZeroSize),
                PartRequest::Primary(_) => {}
                PartRequest::Extended(logicals) => {
                    if logicals.is_empty() {
                        return Err(SchemeError::EmptyExtended);
                    }
                    if logicals.contains(&0) {
                        return Err(SchemeError::ZeroSize);
                    }
                }
            }
        }

        Ok(Self {
            parts,
            disk_signature: DEFAULT_DISK_SIGNATURE,
        })
    }

    /// 换掉写入 MBR 的磁盘签名
    pub fn set_disk_signature(&mut self, signature: u32) {
        self.disk_signature = signature;
    }

    /// 容纳此方案所需的最小扇区数：
    /// MBR 占一个，每个逻辑分区在数据前再占一个 EBR
    pub fn required_sectors(&self) -> usize {
        1 + self
            .parts
            .iter()
            .map(|part| match part {
                PartRequest::Primary(sectors) => *sectors,
                PartRequest::Extended(logicals) => {
                    logicals.iter().map(|logical| logical + 1).sum()
                }
            })
            .sum::<usize>()
    }

    /// 按声明顺序铺设分区，游标自扇区1起步
    pub fn build(&self) -> DiskLayout {
        let mut mbr_table = PartTable::default();
        let mut ebrs = Vec::new();
        let mut cursor = SectorId::new(1);

        for (slot, part) in self.parts.iter().enumerate() {
            match part {
                PartRequest::Primary(sectors) => {
                    mbr_table.set_entry(
                        slot,
                        PartEntry::new(
                            PartKind::LinuxData,
                            cursor,
                            *sectors,
                            usize::from(cursor) as u32,
                        ),
                    );
                    cursor = cursor + *sectors;
                }
                PartRequest::Extended(logicals) => {
                    let total = logicals.iter().map(|logical| logical + 1).sum::<usize>();
                    mbr_table.set_entry(
                        slot,
                        PartEntry::new(
                            PartKind::Extended,
                            cursor,
                            total,
                            usize::from(cursor) as u32,
                        ),
                    );

                    for (i, &logical) in logicals.iter().enumerate() {
                        // 每个 EBR 紧贴着自己的逻辑分区数据之前
                        let ebr_at = cursor;
                        let mut table = PartTable::default();
                        table.set_entry(
                            0,
                            PartEntry::new(PartKind::LinuxData, ebr_at + 1, logical, 1),
                        );
                        if let Some(&next) = logicals.get(i + 1) {
                            // 衔接项指向下一个 EBR，起始字段以当前 EBR 为基准
                            table.set_entry(
                                1,
                                PartEntry::new(
                                    PartKind::Extended,
                                    ebr_at + (logical + 1),
                                    next,
                                    (logical + 1) as u32,
                                ),
                            );
                        }

                        ebrs.push((ebr_at, BootRecord::ebr(&table)));
                        cursor = cursor + (logical + 1);
                    }
                }
            }
        }

        DiskLayout {
            mbr: BootRecord::mbr(&mbr_table, self.disk_signature),
            ebrs,
        }
    }
}

/// 构建完成的磁盘布局
#[derive(Debug, Clone)]
pub struct DiskLayout {
    mbr: BootRecord,
    ebrs: Vec<(SectorId, BootRecord)>,
}

impl DiskLayout {
    #[inline]
    pub fn mbr(&self) -> &BootRecord {
        &self.mbr
    }

    /// 各 EBR 及其绝对扇区号，按链序排列
    #[inline]
    pub fn ebrs(&self) -> &[(SectorId, BootRecord)] {
        &self.ebrs
    }

    /// 把各引导记录写到存储上的既定偏移
    pub fn stamp(&self, store: &mut BackingStore) -> Result<(), StoreError> {
        store.copy_in(0, self.mbr.as_bytes())?;
        for (sector, ebr) in &self.ebrs {
            store.copy_in(sector.byte_offset(), ebr.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn structural_validation() {
        let five = vec![PartRequest::Primary(8); 5];
        assert_eq!(Err(SchemeError::TooManyEntries), PartitionScheme::new(five).map(drop));

        let twice = vec![
            PartRequest::Extended(vec![4]),
            PartRequest::Extended(vec![4]),
        ];
        assert_eq!(Err(SchemeError::MultipleExtended), PartitionScheme::new(twice).map(drop));

        let hollow = vec![PartRequest::Extended(vec![])];
        assert_eq!(Err(SchemeError::EmptyExtended), PartitionScheme::new(hollow).map(drop));

        assert_eq!(
            Err(SchemeError::ZeroSize),
            PartitionScheme::new(vec![PartRequest::Primary(0)]).map(drop)
        );
        assert_eq!(
            Err(SchemeError::ZeroSize),
            PartitionScheme::new(vec![PartRequest::Extended(vec![4, 0])]).map(drop)
        );
    }

    #[test]
    fn capacity_accounting() {
        let sectors = |parts| PartitionScheme::new(parts).unwrap().required_sectors();

        assert_eq!(5, sectors(vec![PartRequest::Primary(4)]));
        assert_eq!(6, sectors(vec![PartRequest::Extended(vec![4])]));
        assert_eq!(
            10,
            sectors(vec![PartRequest::Primary(4), PartRequest::Extended(vec![4])])
        );
        assert_eq!(
            1 + 6 + 8 + (3 + 1) + (5 + 1),
            sectors(vec![
                PartRequest::Primary(6),
                PartRequest::Primary(8),
                PartRequest::Extended(vec![3, 5]),
            ])
        );
    }
}
