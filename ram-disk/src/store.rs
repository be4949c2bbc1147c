//! 后备存储层
//!
//! 设备的全部数据放在一段零初始化的内存里，容量以扇区计，
//! 改变容量即整段弃旧换新。

use alloc::vec;
use alloc::vec::Vec;

use crate::SECTOR_SIZE;

/// 内存中的扇区阵列
#[derive(Debug)]
pub struct BackingStore {
    data: Vec<u8>,
}

/// 存储访问错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    OutOfBounds,
}

impl BackingStore {
    /// 分配 `capacity` 个全零扇区
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity * SECTOR_SIZE],
        }
    }

    #[inline]
    pub fn capacity_sectors(&self) -> usize {
        self.data.len() / SECTOR_SIZE
    }

    pub fn copy_in(&mut self, offset: usize, src: &[u8]) -> Result<(), StoreError> {
        let end = offset
            .checked_add(src.len())
            .ok_or(StoreError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(StoreError::OutOfBounds);
        }

        self.data[offset..end].copy_from_slice(src);
        Ok(())
    }

    pub fn copy_out(&self, offset: usize, dst: &mut [u8]) -> Result<(), StoreError> {
        let end = offset
            .checked_add(dst.len())
            .ok_or(StoreError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(StoreError::OutOfBounds);
        }

        dst.copy_from_slice(&self.data[offset..end]);
        Ok(())
    }
}
