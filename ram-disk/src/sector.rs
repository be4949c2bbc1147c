//! 扇区号的抽象

use derive_more::{Add, From, Into};

use crate::SECTOR_SIZE;

/// 磁盘上的绝对扇区号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, From, Into)]
#[repr(transparent)]
pub struct SectorId(usize);

impl core::ops::Add<usize> for SectorId {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        self + Self(rhs)
    }
}

impl SectorId {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// 扇区起点的字节偏移
    #[inline]
    pub fn byte_offset(self) -> usize {
        self.0 * SECTOR_SIZE
    }
}
