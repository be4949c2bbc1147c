use ram_disk::layout::{
    BOOT_SIGNATURE_OFFSET, BootRecord, DISK_SIGNATURE_OFFSET, PART_TABLE_OFFSET, PartEntry,
    PartKind, PartTable,
};
use ram_disk::{
    BackingStore, DEFAULT_DISK_SIGNATURE, PartRequest, PartitionScheme, SECTOR_SIZE, SectorId,
};

/// 取出第 `slot` 项的（类型码，绝对起始，扇区数）
fn entry_fields(record: &[u8], slot: usize) -> (u8, u32, u32) {
    let at = PART_TABLE_OFFSET + slot * PartEntry::SIZE;
    (
        record[at + 4],
        u32::from_le_bytes(record[at + 8..at + 12].try_into().unwrap()),
        u32::from_le_bytes(record[at + 12..at + 16].try_into().unwrap()),
    )
}

fn entry_bytes(record: &[u8], slot: usize) -> &[u8] {
    let at = PART_TABLE_OFFSET + slot * PartEntry::SIZE;
    &record[at..at + PartEntry::SIZE]
}

#[test]
fn primary_and_one_logical() {
    let scheme = PartitionScheme::new(vec![
        PartRequest::Primary(4),
        PartRequest::Extended(vec![4]),
    ])
    .unwrap();
    assert_eq!(10, scheme.required_sectors());

    let built = scheme.build();
    let mbr = built.mbr().as_bytes();

    assert_eq!(mbr[..DISK_SIGNATURE_OFFSET], [0; 440]);
    assert_eq!(
        mbr[DISK_SIGNATURE_OFFSET..DISK_SIGNATURE_OFFSET + 4],
        DEFAULT_DISK_SIGNATURE.to_le_bytes()
    );
    assert_eq!(mbr[444..PART_TABLE_OFFSET], [0; 2]);
    assert_eq!(mbr[BOOT_SIGNATURE_OFFSET..], [0x55, 0xAA]);

    // 主分区：起始扇区1，长4，CHS 随绝对扇区号
    assert_eq!(
        entry_bytes(mbr, 0),
        [0x00, 0x00, 0x02, 0x00, 0x83, 0x00, 0x05, 0x00, 1, 0, 0, 0, 4, 0, 0, 0]
    );
    // 扩展分区：起始扇区5，长 4+1（逻辑分区带自己的 EBR）
    assert_eq!(
        entry_bytes(mbr, 1),
        [0x00, 0x00, 0x06, 0x00, 0x05, 0x00, 0x0A, 0x00, 5, 0, 0, 0, 5, 0, 0, 0]
    );
    assert_eq!(entry_bytes(mbr, 2), [0; 16]);
    assert_eq!(entry_bytes(mbr, 3), [0; 16]);

    // 单个 EBR 在扩展区开头
    let [(at, ebr)] = built.ebrs() else {
        panic!("expected exactly one EBR");
    };
    assert_eq!(SectorId::new(5), *at);

    let ebr = ebr.as_bytes();
    // EBR 不带磁盘签名
    assert_eq!(ebr[..PART_TABLE_OFFSET], [0; 446]);
    assert_eq!(ebr[BOOT_SIGNATURE_OFFSET..], [0x55, 0xAA]);
    // 逻辑分区：起始字段以 EBR 自身为基准，CHS 仍按绝对扇区号
    assert_eq!(
        entry_bytes(ebr, 0),
        [0x00, 0x00, 0x07, 0x00, 0x83, 0x00, 0x0A, 0x00, 1, 0, 0, 0, 4, 0, 0, 0]
    );
    // 链上没有后继，衔接项空置
    assert_eq!(entry_bytes(ebr, 1), [0; 16]);
}

#[test]
fn legacy_default_layout() {
    // 10 MiB、20 MiB 两个主分区，扩展区内两个 10 MiB 逻辑分区
    let scheme = PartitionScheme::new(vec![
        PartRequest::Primary(20480),
        PartRequest::Primary(40960),
        PartRequest::Extended(vec![20480, 20480]),
    ])
    .unwrap();
    assert_eq!(102403, scheme.required_sectors());

    let built = scheme.build();
    let mbr = built.mbr().as_bytes();

    assert_eq!((0x83, 1, 20480), entry_fields(mbr, 0));
    assert_eq!((0x83, 20481, 40960), entry_fields(mbr, 1));
    assert_eq!((0x05, 61441, 40962), entry_fields(mbr, 2));
    assert_eq!(entry_bytes(mbr, 3), [0; 16]);

    let [(first_at, first), (second_at, second)] = built.ebrs() else {
        panic!("expected two EBRs");
    };
    assert_eq!(SectorId::new(61441), *first_at);
    assert_eq!(SectorId::new(81922), *second_at);

    // 首个 EBR：自己的逻辑分区加指向下一个 EBR 的衔接项
    assert_eq!((0x83, 1, 20480), entry_fields(first.as_bytes(), 0));
    assert_eq!((0x05, 20481, 20480), entry_fields(first.as_bytes(), 1));

    // 末个 EBR：衔接项空置
    assert_eq!((0x83, 1, 20480), entry_fields(second.as_bytes(), 0));
    assert_eq!(entry_bytes(second.as_bytes(), 1), [0; 16]);
}

#[test]
fn extended_region_tiles_without_gaps() {
    let logicals = vec![3, 7, 4, 9];
    let scheme = PartitionScheme::new(vec![
        PartRequest::Primary(6),
        PartRequest::Extended(logicals.clone()),
    ])
    .unwrap();
    let built = scheme.build();

    let (_, ext_start, ext_total) = entry_fields(built.mbr().as_bytes(), 1);
    assert_eq!(
        logicals.iter().map(|logical| logical + 1).sum::<usize>(),
        ext_total as usize
    );

    // EBR 链首尾相接：下一个 EBR 紧跟前一个逻辑分区的数据之后
    let ebrs = built.ebrs();
    assert_eq!(logicals.len(), ebrs.len());
    assert_eq!(ext_start as usize, usize::from(ebrs[0].0));

    let mut expected = usize::from(ebrs[0].0);
    for ((at, ebr), logical) in ebrs.iter().zip(&logicals) {
        assert_eq!(expected, usize::from(*at));
        let (kind, rel_start, count) = entry_fields(ebr.as_bytes(), 0);
        assert_eq!((0x83, 1, *logical), (kind, rel_start as usize, count as usize));
        expected += logical + 1;
    }
    assert_eq!(ext_start as usize + ext_total as usize, expected);

    // 衔接项的起始字段以所在 EBR 为基准
    for (((_, ebr), logical), next) in ebrs.iter().zip(&logicals).zip(&logicals[1..]) {
        let (kind, rel_start, count) = entry_fields(ebr.as_bytes(), 1);
        assert_eq!(0x05, kind);
        assert_eq!(logical + 1, rel_start as usize);
        assert_eq!(*next, count as usize);
    }
    let (_, last) = ebrs.last().unwrap();
    assert_eq!(entry_bytes(last.as_bytes(), 1), [0; 16]);
}

#[test]
fn stamp_writes_records_at_their_sectors() {
    let scheme = PartitionScheme::new(vec![
        PartRequest::Primary(4),
        PartRequest::Extended(vec![4]),
    ])
    .unwrap();
    let built = scheme.build();

    let mut store = BackingStore::new(10);
    built.stamp(&mut store).unwrap();

    let mut sector = [0; SECTOR_SIZE];
    store.copy_out(0, &mut sector).unwrap();
    assert_eq!(built.mbr().as_bytes(), sector);

    store.copy_out(5 * SECTOR_SIZE, &mut sector).unwrap();
    assert_eq!(built.ebrs()[0].1.as_bytes(), sector);

    // 分区表之外的扇区保持全零
    store.copy_out(SECTOR_SIZE, &mut sector).unwrap();
    assert_eq!([0; SECTOR_SIZE], sector);

    // 容量装不下 EBR 时盖印失败
    let mut cramped = BackingStore::new(5);
    assert!(built.stamp(&mut cramped).is_err());
}

#[test]
fn custom_disk_signature() {
    let mut scheme = PartitionScheme::new(vec![PartRequest::Primary(4)]).unwrap();
    scheme.set_disk_signature(0xDEAD_BEEF);

    let built = scheme.build();
    assert_eq!(
        0xDEAD_BEEFu32.to_le_bytes(),
        built.mbr().as_bytes()[DISK_SIGNATURE_OFFSET..DISK_SIGNATURE_OFFSET + 4]
    );
}

#[test]
fn entry_accessors() {
    let entry = PartEntry::new(PartKind::LinuxData, SectorId::new(1), 8, 1);
    assert_eq!(1, entry.abs_start_sec());
    assert_eq!(8, entry.sec_in_part());
    assert!(!entry.is_empty());
    assert!(PartEntry::default().is_empty());

    let table = PartTable::from([
        entry.clone(),
        PartEntry::default(),
        PartEntry::default(),
        PartEntry::default(),
    ]);
    assert_eq!(entry.as_bytes(), &table.as_bytes()[..PartEntry::SIZE]);
    assert_eq!(entry.abs_start_sec(), table.entry(0).abs_start_sec());
}

#[test]
fn boot_record_flavors() {
    let table = PartTable::from([
        PartEntry::new(PartKind::LinuxData, SectorId::new(1), 8, 1),
        PartEntry::default(),
        PartEntry::default(),
        PartEntry::default(),
    ]);

    let mbr = BootRecord::mbr(&table, 0x1234_5678);
    let ebr = BootRecord::ebr(&table);

    assert_eq!(
        mbr.as_bytes()[PART_TABLE_OFFSET..BOOT_SIGNATURE_OFFSET],
        ebr.as_bytes()[PART_TABLE_OFFSET..BOOT_SIGNATURE_OFFSET]
    );
    assert_eq!(
        [0x78, 0x56, 0x34, 0x12],
        mbr.as_bytes()[DISK_SIGNATURE_OFFSET..DISK_SIGNATURE_OFFSET + 4]
    );
    assert_eq!(ebr.as_bytes()[DISK_SIGNATURE_OFFSET..DISK_SIGNATURE_OFFSET + 4], [0; 4]);
    assert_eq!(mbr.as_bytes()[BOOT_SIGNATURE_OFFSET..], ebr.as_bytes()[BOOT_SIGNATURE_OFFSET..]);
}
