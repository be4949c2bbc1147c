//! 设备生命周期层
//!
//! 创建依次是分配存储、盖印分区方案、登记设备名、挂上请求队列；
//! 中途失败按相反顺序退还已占的资源。销毁消耗掉设备值本身，
//! 从类型上杜绝二次销毁。

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use spin::Mutex;

use crate::SECTOR_SIZE;
use crate::block_dev::BlockDevice;
use crate::request::{self, Direction, IoError, Request, TransferMode};
use crate::scheme::PartitionScheme;
use crate::store::BackingStore;

/// 创建阶段的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// 容量为零
    ZeroCapacity,
    /// 容量折合的字节数溢出
    CapacityOverflow,
    /// 设备名已被占用
    NameTaken,
    /// 分区方案放不进给定容量
    SchemeTooLarge,
}

/// 容量须非零，且折合字节数可表示；创建与调容共用此检查
fn validate_capacity(name: &str, capacity: usize) -> Result<(), InitError> {
    if capacity == 0 {
        log::error!("{name}: zero capacity");
        return Err(InitError::ZeroCapacity);
    }
    if capacity.checked_mul(SECTOR_SIZE).is_none() {
        log::error!("{name}: {capacity} sectors overflow the byte size");
        return Err(InitError::CapacityOverflow);
    }
    Ok(())
}

/// 块设备注册表，扮演宿主块子系统的登记接口
#[derive(Debug)]
pub struct DiskRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    /// 已登记的（主设备号，设备名）
    devices: Vec<(u32, String)>,
    next_major: u32,
}

impl DiskRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                devices: Vec::new(),
                next_major: 1,
            }),
        }
    }

    /// 某主设备号是否仍在登记中
    pub fn contains(&self, major: u32) -> bool {
        self.inner.lock().devices.iter().any(|(m, _)| *m == major)
    }

    /// 登记设备名，分配主设备号
    fn register(&self, name: &str) -> Result<u32, InitError> {
        let mut inner = self.inner.lock();
        if inner.devices.iter().any(|(_, n)| n == name) {
            return Err(InitError::NameTaken);
        }

        let major = inner.next_major;
        inner.next_major += 1;
        inner.devices.push((major, String::from(name)));
        Ok(major)
    }

    fn unregister(&self, major: u32) {
        self.inner.lock().devices.retain(|(m, _)| *m != major);
    }
}

impl Default for DiskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 登记凭据，随持有者丢弃而注销
#[derive(Debug)]
struct Registration {
    registry: Arc<DiskRegistry>,
    major: u32,
    name: String,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(self.major);
        log::info!("{}: unregistered major {}", self.name, self.major);
    }
}

/// 请求队列：持锁串行地服务请求
#[derive(Debug)]
pub struct RequestQueue {
    store: Mutex<BackingStore>,
    mode: TransferMode,
}

impl RequestQueue {
    /// 同步服务一次请求，返回传输的字节数
    pub fn submit(&self, req: Request<'_>) -> Result<usize, IoError> {
        request::transfer(&mut self.store.lock(), req, self.mode)
    }

    #[inline]
    pub fn capacity_sectors(&self) -> usize {
        self.store.lock().capacity_sectors()
    }
}

/// 一块内存盘
#[derive(Debug)]
pub struct RamDisk {
    registration: Registration,
    queue: Arc<RequestQueue>,
}

impl RamDisk {
    /// 创建设备。`scheme` 给出时会盖印到存储开头。
    pub fn create(
        registry: &Arc<DiskRegistry>,
        name: &str,
        capacity: usize,
        scheme: Option<&PartitionScheme>,
        mode: TransferMode,
    ) -> Result<Self, InitError> {
        validate_capacity(name, capacity)?;

        let mut store = BackingStore::new(capacity);
        if let Some(scheme) = scheme {
            if scheme.required_sectors() > capacity {
                log::error!(
                    "{name}: scheme needs {} sectors but capacity is {capacity}",
                    scheme.required_sectors()
                );
                return Err(InitError::SchemeTooLarge);
            }
            scheme
                .build()
                .stamp(&mut store)
                .map_err(|_| InitError::SchemeTooLarge)?;
        }

        let major = registry.register(name).inspect_err(|_| {
            log::error!("{name}: name already registered");
        })?;
        log::info!("{name}: major {major}, {capacity} sectors of {SECTOR_SIZE} bytes");

        Ok(Self {
            registration: Registration {
                registry: Arc::clone(registry),
                major,
                name: String::from(name),
            },
            queue: Arc::new(RequestQueue {
                store: Mutex::new(store),
                mode,
            }),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.registration.name
    }

    #[inline]
    pub fn major(&self) -> u32 {
        self.registration.major
    }

    #[inline]
    pub fn capacity_sectors(&self) -> usize {
        self.queue.capacity_sectors()
    }

    /// 请求队列，可与句柄共享
    #[inline]
    pub fn queue(&self) -> &Arc<RequestQueue> {
        &self.queue
    }

    /// 丢掉全部数据，换一段新容量的全零存储。
    /// 登记身份（设备名与主设备号）保持不变。
    pub fn resize(&self, capacity: usize) -> Result<(), InitError> {
        validate_capacity(self.name(), capacity)?;

        let mut store = self.queue.store.lock();
        *store = BackingStore::new(capacity);
        log::info!("{}: resized to {capacity} sectors", self.name());
        Ok(())
    }

    /// 注销并释放设备
    pub fn destroy(self) {
        log::info!("{}: destroying", self.name());
    }

    /// 发一个实现 [`BlockDevice`] 的句柄
    pub fn handle(&self) -> DiskHandle {
        log::info!("{}: opened", self.name());
        DiskHandle {
            name: String::from(self.name()),
            queue: Arc::clone(&self.queue),
        }
    }
}

/// 设备句柄，对接上层的按块读写
#[derive(Debug)]
pub struct DiskHandle {
    name: String,
    queue: Arc<RequestQueue>,
}

impl BlockDevice for DiskHandle {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) {
        let sectors = buf.len() / SECTOR_SIZE;
        let req = Request {
            direction: Direction::Read,
            start: block_id.into(),
            sectors,
            segments: vec![buf],
        };
        assert_eq!(
            sectors * SECTOR_SIZE,
            self.queue.submit(req).expect("read request failed"),
        );
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) {
        let mut data = buf.to_vec();
        let sectors = data.len() / SECTOR_SIZE;
        let req = Request {
            direction: Direction::Write,
            start: block_id.into(),
            sectors,
            segments: vec![data.as_mut_slice()],
        };
        assert_eq!(
            sectors * SECTOR_SIZE,
            self.queue.submit(req).expect("write request failed"),
        );
    }
}

impl Drop for DiskHandle {
    fn drop(&mut self) {
        log::info!("{}: closed", self.name);
    }
}
