//! CHS 几何层
//!
//! 沿用 BIOS 时代的固定几何：每磁道 63 扇区，每柱面 255 磁头。
//! 分区表项里的 CHS 字段由绝对扇区号按此折算。

use crate::sector::SectorId;

/// 每磁道的扇区数
pub const SECTORS_PER_TRACK: usize = 63;
/// 每柱面的磁头数
pub const HEADS_PER_CYLINDER: usize = 255;
/// 一个柱面折合的扇区数
const CYLINDER_SECTORS: usize = SECTORS_PER_TRACK * HEADS_PER_CYLINDER;

/// 柱面-磁头-扇区坐标，皆从0计数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chs {
    pub cylinder: u32,
    pub head: u8,
    pub sector: u8,
}

impl Chs {
    pub fn from_sector(id: SectorId) -> Self {
        let raw = usize::from(id);
        let in_cylinder = raw % CYLINDER_SECTORS;

        Self {
            cylinder: (raw / CYLINDER_SECTORS) as u32,
            head: (in_cylinder / SECTORS_PER_TRACK) as u8,
            sector: (in_cylinder % SECTORS_PER_TRACK) as u8,
        }
    }

    /// 打包为分区表项的三字节磁盘格式。
    ///
    /// 扇区子字段从1计数；柱面取低10位，高位截断。
    pub fn encode(self) -> [u8; 3] {
        [
            self.head,
            ((self.sector + 1) & 0x3F) | ((self.cylinder >> 8) as u8 & 0x3) << 6,
            (self.cylinder & 0xFF) as u8,
        ]
    }
}
