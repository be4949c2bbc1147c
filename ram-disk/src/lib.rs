#![no_std]

extern crate alloc;

/* 内存盘的整体架构，自上而下 */

// 设备生命周期层：创建、注册、请求队列与销毁
mod device;
pub use device::{DiskHandle, DiskRegistry, InitError, RamDisk, RequestQueue};

// 控制面：以文本写入触发容量调整
pub mod control;

// 请求传输层：分散聚集段与存储之间的拷贝引擎
mod request;
pub use request::{Direction, IoError, Request, TransferMode};

// 分区方案层：把尺寸请求编排为 MBR 加 EBR 链
mod scheme;
pub use scheme::{DEFAULT_DISK_SIGNATURE, DiskLayout, PartRequest, PartitionScheme, SchemeError};

// 磁盘数据结构层：引导记录与分区表
pub mod layout;

// 后备存储层：零初始化的内存扇区阵列
mod store;
pub use store::{BackingStore, StoreError};

// CHS 几何层：扇区号与柱面-磁头-扇区坐标的折算
pub mod geometry;

// 磁盘块设备接口层：读写磁盘块设备的接口
mod block_dev;
pub use block_dev::BlockDevice;

mod sector;
pub use sector::SectorId;

pub const SECTOR_SIZE: usize = 512;
/// 1 MiB 折合的扇区数
pub const SECTORS_PER_MIB: usize = 2048;
/// 每个引导扇区末尾的引导签名
pub const BOOT_SIGNATURE: u16 = 0xAA55;
