//! # 块设备接口层
//!
//! [`BlockDevice`] 是对按块读写设备的抽象；
//! 内存盘的句柄实现了它，上层（例如文件系统）照此对接。

use core::any::Any;

/// 块设备驱动特质
pub trait BlockDevice: Send + Sync + Any {
    fn read_block(&self, block_id: usize, buf: &mut [u8]);
    fn write_block(&self, block_id: usize, buf: &[u8]);
}
