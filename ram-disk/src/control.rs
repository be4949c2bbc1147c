//! 控制面
//!
//! 设备暴露一个文本端点，写入十进制的 MiB 数即触发容量调整。
//! 不合法的输入只留一条日志，写入总被完整消费。

use crate::SECTORS_PER_MIB;
use crate::device::RamDisk;

/// 处理一次控制写入，返回消费的字节数（恒为全长）
pub fn write(disk: &RamDisk, buf: &[u8]) -> usize {
    match parse(buf) {
        Some(sectors) => {
            log::info!(
                "{}: control resize to {} MiB",
                disk.name(),
                sectors / SECTORS_PER_MIB
            );
            let _ = disk.resize(sectors);
        }
        None => log::warn!("{}: control write ignored", disk.name()),
    }

    buf.len()
}

/// 合法输入是一个正的十进制整数，返回其折合的扇区数
fn parse(buf: &[u8]) -> Option<usize> {
    let mib = core::str::from_utf8(buf).ok()?.trim().parse::<usize>().ok()?;
    if mib == 0 {
        return None;
    }
    mib.checked_mul(SECTORS_PER_MIB)
}
