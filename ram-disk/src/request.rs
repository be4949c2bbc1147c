//! 请求传输层
//!
//! 请求以分散聚集的段列表描述缓冲区，引擎逐段在段与存储之间拷贝，
//! 段长不足一个扇区的尾巴不参与传输。

use alloc::vec::Vec;

use crate::SECTOR_SIZE;
use crate::sector::SectorId;
use crate::store::BackingStore;

/// 传输方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// 未对齐段的处置策略
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// 记下错误但继续，该段按扇区整倍数截断拷贝
    #[default]
    Permissive,
    /// 碰到未对齐的段立即中止整个请求
    Strict,
}

/// 一次块设备请求
pub struct Request<'a> {
    pub direction: Direction,
    /// 起始扇区
    pub start: SectorId,
    /// 声明的扇区总数
    pub sectors: usize,
    /// 数据段列表，按序相接构成请求的缓冲区
    pub segments: Vec<&'a mut [u8]>,
}

/// 请求级错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// 请求范围超出设备容量
    OutOfRange,
    /// 段长不是扇区的整倍数
    UnalignedSegment,
    /// 各段扇区数合计与声明不符
    SectorCountMismatch,
}

/// 执行一次传输，成功时返回传输的字节数。
///
/// 已拷贝的段不随后续错误回滚；最先记下的错误就是返回的错误。
pub(crate) fn transfer(
    store: &mut BackingStore,
    mut req: Request<'_>,
    mode: TransferMode,
) -> Result<usize, IoError> {
    let end = usize::from(req.start)
        .checked_add(req.sectors)
        .ok_or(IoError::OutOfRange)?;
    if end > store.capacity_sectors() {
        log::error!(
            "request [{}, {end}) exceeds capacity {}",
            usize::from(req.start),
            store.capacity_sectors()
        );
        return Err(IoError::OutOfRange);
    }

    let mut flagged = None;
    // 已传输的扇区数
    let mut done = 0;

    for segment in req.segments.iter_mut() {
        if segment.len() % SECTOR_SIZE != 0 {
            log::error!("segment of {} bytes is not sector aligned", segment.len());
            if mode == TransferMode::Strict {
                return Err(IoError::UnalignedSegment);
            }
            flagged.get_or_insert(IoError::UnalignedSegment);
        }

        let sectors = segment.len() / SECTOR_SIZE;
        let nbytes = sectors * SECTOR_SIZE;
        let offset = (req.start + done).byte_offset();
        log::debug!(
            "{:?} {sectors} sectors at sector {}",
            req.direction,
            usize::from(req.start) + done
        );

        let copied = match req.direction {
            Direction::Read => store.copy_out(offset, &mut segment[..nbytes]),
            Direction::Write => store.copy_in(offset, &segment[..nbytes]),
        };
        if copied.is_err() {
            log::error!("copy of {nbytes} bytes at byte offset {offset} runs past the store");
            return Err(flagged.unwrap_or(IoError::OutOfRange));
        }

        done += sectors;
    }

    if done != req.sectors {
        log::error!("transferred {done} sectors but {} declared", req.sectors);
        flagged.get_or_insert(IoError::SectorCountMismatch);
    }

    match flagged {
        Some(err) => Err(err),
        None => Ok(done * SECTOR_SIZE),
    }
}
