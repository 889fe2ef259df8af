// Copyright © 2023 David Caldwell <david@porkrind.org>

pub mod ficmac;
pub mod label;

use crate::block::img::IMG;
use crate::block::{Geometry, SectorAddress};
use crate::error::{DiskError, Result};

use ficmac::{CatalogPage, Screen, FICMAC, SCREENS};
use label::{CatalogEntry, DataSet, ErrorMap, VolumeLabel};

// 0 based positions in the track 0 index. IBM 3740 reserves sectors 1-4 for the system and 8-26 for HDR1s.
const ERMAP_SLOT: usize = 4;
const VOL1_SLOT: usize = 6;

#[derive(Clone, Debug)]
pub struct UnitelFs {
    pub image: IMG,
    pub index: Vec<CatalogEntry>,
}

impl UnitelFs {
    /// `raw` is the disk exactly as dumped, still in EBCDIC.
    pub fn load(raw: &[u8], geometry: Geometry) -> Result<UnitelFs> {
        Self::new(IMG::from_ebcdic(raw, geometry))
    }

    pub fn new(image: IMG) -> Result<UnitelFs> {
        let index = Self::read_index(&image)?;
        Self::check_valid_disk(&index)?;
        Ok(UnitelFs {
            image,
            index,
        })
    }

    pub fn read_index(image: &IMG) -> Result<Vec<CatalogEntry>> {
        if image.len() < image.geometry.track_size() {
            return Err(DiskError::MalformedImage(format!("no catalog: {} bytes is less than one track ({} bytes)", image.len(), image.geometry.track_size())));
        }
        (1..=image.geometry.sectors).map(|sector| {
            let address = SectorAddress::new(image.geometry, 0, sector);
            let entry = CatalogEntry::from_repr(image.geometry, image.sector(&address))
                .map_err(|e| match e {
                    DiskError::MalformedRecord { field, reason } => DiskError::MalformedRecord { field, reason: format!("{} (sector {})", reason, sector) },
                    e => e,
                })?;
            log::debug!("Catalog sector {:2}: {}", sector, entry.kind());
            Ok(entry)
        }).collect()
    }

    fn check_valid_disk(index: &[CatalogEntry]) -> Result<()> {
        let Some(CatalogEntry::ErrorMap(_)) = index.get(ERMAP_SLOT) else {
            return Err(DiskError::MalformedImage("error map not found".to_owned()));
        };
        let Some(CatalogEntry::VolumeLabel(_)) = index.get(VOL1_SLOT) else {
            return Err(DiskError::MalformedImage("volume label not found".to_owned()));
        };
        Ok(())
    }

    pub fn geometry(&self) -> &Geometry {
        &self.image.geometry
    }

    /// The whole disk, translated to VDT.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_bytes()
    }

    pub fn dir_iter<'a>(&'a self) -> impl Iterator<Item = &'a DataSet> + 'a {
        self.index.iter().filter_map(|e| match e {
            CatalogEntry::DataSet(d) if !d.deleted => Some(d),
            _ => None,
        })
    }

    pub fn dir(&self) -> Vec<&DataSet> {
        self.dir_iter().collect()
    }

    pub fn file_named<'a>(&'a self, name: &str) -> Option<&'a DataSet> {
        self.dir_iter().find(|f| f.identifier == name)
    }

    /// Everything from the first sector of the extent up to and including the whole last sector.
    pub fn file_contents(&self, file: &DataSet) -> &[u8] {
        self.image.range(file.beginning_of_extent.offset()..file.end_of_extent.offset() + self.geometry().sector_size)
    }

    pub fn read_file(&self, name: &str) -> Result<&[u8]> {
        let Some(file) = self.file_named(name) else {
            return Err(DiskError::FileNotFound(format!("File {}", name)));
        };
        Ok(self.file_contents(file))
    }

    pub fn get_bytes(&self, start: &SectorAddress, length: usize) -> &[u8] {
        let offset = start.offset();
        self.image.range(offset..offset + length)
    }

    pub fn page_contents(&self, page: &CatalogPage) -> &[u8] {
        self.get_bytes(&page.start, page.length)
    }

    pub fn diskinfo(&self) -> Result<&VolumeLabel> {
        self.index.iter().find_map(|e| match e {
            CatalogEntry::VolumeLabel(v) => Some(v),
            _ => None,
        }).ok_or_else(|| DiskError::FileNotFound("Volume label".to_owned()))
    }

    pub fn error_map(&self) -> Option<&ErrorMap> {
        match self.index.get(ERMAP_SLOT) {
            Some(CatalogEntry::ErrorMap(e)) => Some(e),
            _ => None,
        }
    }

    pub fn catalog(&self) -> Result<Vec<CatalogPage>> {
        self.catalog_with(&SCREENS)
    }

    pub fn catalog_with(&self, screens: &[Screen]) -> Result<Vec<CatalogPage>> {
        ficmac::read_pages(*self.geometry(), self.read_file(FICMAC)?, screens)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::block::ebcdic::EBCDIC_TO_VDT;
    use crate::block::UNITEL_GEOMETRY;

    #[macro_export]
    macro_rules! assert_bytes_eq {
        ($got:expr, $expected:expr) => {{
            use pretty_hex::PrettyHex;
            let got: &[u8] = &$got;
            let expected: &[u8] = &$expected;
            assert!(got == expected, "Bytes differ.\nGot:\n{:?}\nExpected:\n{:?}", got.hex_dump(), expected.hex_dump());
        }};
    }

    pub fn put(buf: &mut [u8], offset: usize, data: &[u8]) {
        buf[offset..offset + data.len()].copy_from_slice(data);
    }

    /// A 128 byte label full of spaces, with `fields` written at their offsets.
    pub fn record(fields: &[(usize, &str)]) -> Vec<u8> {
        let mut r = vec![b' '; label::LABEL_SIZE];
        for (offset, text) in fields {
            put(&mut r, *offset, text.as_bytes());
        }
        r
    }

    pub fn blank_record() -> Vec<u8> { record(&[]) }
    pub fn ermap_record() -> Vec<u8> { record(&[(0, "ERMAP")]) }
    pub fn vol1_record(label: &str) -> Vec<u8> { record(&[(0, "VOL1"), (4, label), (79, "W")]) }

    pub fn hdr1_record(name: &str, start: &str, end: &str) -> Vec<u8> {
        record(&[(0, "HDR1"), (5, name), (22, "00080"), (28, start), (34, end), (74, end)])
    }

    pub fn ddr1_record(name: &str, start: &str, end: &str) -> Vec<u8> {
        let mut r = hdr1_record(name, start, end);
        r[0] = b'D';
        r
    }

    pub fn slot(start: &str, length: &str) -> Vec<u8> {
        let mut s = vec![b' '; ficmac::SLOT_SIZE];
        put(&mut s, 0x18, format!("1{}{}00000000", start, length).as_bytes());
        s
    }

    pub fn unused_slot() -> Vec<u8> {
        let mut s = slot("0000", "0000");
        s[0x18] = b'0';
        s
    }

    pub fn empty_ficmac() -> Vec<u8> {
        vec![b'0'; 0x2100 + 22 * ficmac::SLOT_SIZE]
    }

    pub fn ebcdic(vdt: &[u8]) -> Vec<u8> {
        vdt.iter().map(|c| EBCDIC_TO_VDT.iter().position(|v| v == c).expect("no EBCDIC code for byte") as u8).collect()
    }

    // A blank disk with just the mandatory labels, before EBCDIC encoding.
    pub fn vdt_image() -> Vec<u8> {
        let mut image = vec![b' '; UNITEL_GEOMETRY.disk_size()];
        put(&mut image, ERMAP_SLOT * 128, &ermap_record());
        put(&mut image, VOL1_SLOT * 128, &vol1_record("UNITEL"));
        image
    }

    pub fn label_offset(sector: usize) -> usize {
        UNITEL_GEOMETRY.offset(0, sector)
    }

    pub fn load(vdt: &[u8]) -> Result<UnitelFs> {
        UnitelFs::load(&ebcdic(vdt), UNITEL_GEOMETRY)
    }

    // FICMAC on tracks 2-4, two pages on track 10.
    pub fn sample_image() -> Vec<u8> {
        let mut image = vdt_image();
        put(&mut image, label_offset(8), &hdr1_record("FICMAC", "02001", "04026"));
        put(&mut image, label_offset(9), &ddr1_record("DELETED", "05001", "05002"));
        put(&mut image, label_offset(10), &hdr1_record("PAGES", "10001", "10026"));
        put(&mut image, label_offset(11), &ddr1_record("PAGES2", "11001", "11002"));

        let mut ficmac = empty_ficmac();
        put(&mut ficmac, 0x380, &slot("0A01", "0010"));
        put(&mut ficmac, 0x380 + ficmac::SLOT_SIZE, &unused_slot());
        put(&mut ficmac, 0x900, &slot("0A03", "0105"));
        put(&mut image, UNITEL_GEOMETRY.offset(2, 1), &ficmac);

        put(&mut image, UNITEL_GEOMETRY.offset(10, 1), b"FIRST PAGE......");
        put(&mut image, UNITEL_GEOMETRY.offset(10, 3), b"SECOND PAGE");
        image
    }

    #[test]
    fn test_load() {
        let fs = load(&sample_image()).expect("load");
        assert_eq!(26, fs.index.len());
        assert_eq!(vec!["Empty", "Empty", "Empty", "Empty", "ErrorMap", "Empty", "VolumeLabel", "DataSet", "DataSet", "DataSet", "DataSet"],
                   fs.index[..11].iter().map(|e| e.kind()).collect::<Vec<_>>());
        assert!(fs.index[11..].iter().all(|e| *e == CatalogEntry::Empty));
        assert_eq!(UNITEL_GEOMETRY.disk_size(), fs.as_bytes().len());
        assert_bytes_eq!(fs.as_bytes()[0x200..0x205], *b"ERMAP");
        assert!(!fs.error_map().expect("error map").has_defective_track());
    }

    #[test]
    fn test_load_too_short() {
        let image = vdt_image();
        assert!(matches!(load(&image[..UNITEL_GEOMETRY.track_size() - 1]), Err(DiskError::MalformedImage(_))));
        assert!(matches!(load(&[]), Err(DiskError::MalformedImage(_))));
        // One track is enough to read the catalog.
        assert!(load(&image[..UNITEL_GEOMETRY.track_size()]).is_ok());
    }

    #[test]
    fn test_new_too_short() {
        let short = IMG::from_vec(vdt_image()[..UNITEL_GEOMETRY.track_size() - 128].to_vec(), UNITEL_GEOMETRY);
        assert_eq!(Err(DiskError::MalformedImage(format!("no catalog: {} bytes is less than one track ({} bytes)",
                                                         UNITEL_GEOMETRY.track_size() - 128, UNITEL_GEOMETRY.track_size()))),
                   UnitelFs::new(short).map(|_| ()));
    }

    #[test]
    fn test_load_no_error_map() {
        let mut image = vdt_image();
        put(&mut image, ERMAP_SLOT * 128, b"XRMAP");
        assert_eq!(Err(DiskError::MalformedImage("error map not found".to_owned())), load(&image).map(|_| ()));
    }

    #[test]
    fn test_load_error_map_misplaced() {
        let mut image = vdt_image();
        put(&mut image, ERMAP_SLOT * 128, &blank_record());
        put(&mut image, 0, &ermap_record());
        assert!(matches!(load(&image), Err(DiskError::MalformedImage(_))));
    }

    #[test]
    fn test_load_no_volume_label() {
        let mut image = vdt_image();
        put(&mut image, VOL1_SLOT * 128, &blank_record());
        put(&mut image, label_offset(8), &vol1_record("LATE"));
        assert_eq!(Err(DiskError::MalformedImage("volume label not found".to_owned())), load(&image).map(|_| ()));
    }

    #[test]
    fn test_load_malformed_label() {
        let mut image = vdt_image();
        put(&mut image, label_offset(8), &hdr1_record("BAD", "0X001", "01001"));
        assert!(matches!(load(&image), Err(DiskError::MalformedRecord { field: "beginning of extent", .. })));
    }

    #[test]
    fn test_load_small_geometry() {
        // Too few sectors per track to have the error map slot.
        let g = Geometry::new(10, 4, 128);
        assert!(matches!(UnitelFs::load(&vec![0x40; g.disk_size()], g), Err(DiskError::MalformedImage(_))));
    }

    #[test]
    fn test_dir() {
        let fs = load(&sample_image()).expect("load");
        assert_eq!(vec!["FICMAC", "PAGES"], fs.dir().iter().map(|d| d.identifier.as_str()).collect::<Vec<_>>());
        assert!(fs.dir().iter().all(|d| !d.deleted));
    }

    #[test]
    fn test_read_file() {
        let fs = load(&sample_image()).expect("load");
        let pages = fs.read_file("PAGES").expect("read_file");
        assert_eq!(UNITEL_GEOMETRY.track_size(), pages.len());
        assert_bytes_eq!(pages[..16], *b"FIRST PAGE......");
        assert_eq!(3 * UNITEL_GEOMETRY.track_size(), fs.read_file("FICMAC").expect("read_file").len());
    }

    #[test]
    fn test_read_file_single_sector() {
        let mut image = vdt_image();
        put(&mut image, label_offset(8), &hdr1_record("ONE", "01003", "01003"));
        let fs = load(&image).expect("load");
        let file = fs.read_file("ONE").expect("read_file");
        assert_eq!(128, file.len());
        let entry = fs.file_named("ONE").expect("file_named");
        assert_eq!(entry.end_of_extent.last_offset() + 1, entry.beginning_of_extent.offset() + file.len());
    }

    #[test]
    fn test_read_file_not_found() {
        let fs = load(&sample_image()).expect("load");
        assert!(matches!(fs.read_file("NOPE"), Err(DiskError::FileNotFound(_))));
        // Only a deleted data set has this name.
        assert!(matches!(fs.read_file("DELETED"), Err(DiskError::FileNotFound(_))));
        assert!(fs.file_named("PAGES2").is_none());
    }

    #[test]
    fn test_load_deleted_off_disk() {
        let mut image = sample_image();
        put(&mut image, label_offset(9), &ddr1_record("OLD", "75001", "76026"));
        let fs = load(&image).expect("load");
        assert_eq!(vec!["FICMAC", "PAGES"], fs.dir().iter().map(|d| d.identifier.as_str()).collect::<Vec<_>>());
        assert!(matches!(fs.read_file("OLD"), Err(DiskError::FileNotFound(_))));
        assert_eq!(3 * UNITEL_GEOMETRY.track_size(), fs.read_file("FICMAC").expect("read_file").len());
        assert_eq!(2, fs.catalog().expect("catalog").len());
    }

    #[test]
    fn test_read_file_past_end_of_image() {
        let mut image = vdt_image();
        put(&mut image, label_offset(8), &hdr1_record("BIG", "73001", "74001"));
        let fs = load(&image).expect("load");
        assert_eq!(UNITEL_GEOMETRY.track_size(), fs.read_file("BIG").expect("read_file").len());
    }

    #[test]
    fn test_diskinfo() {
        let fs = load(&sample_image()).expect("load");
        let v = fs.diskinfo().expect("diskinfo");
        assert_eq!("UNITEL", v.label);
        assert!(v.label_standard);
    }

    #[test]
    fn test_catalog() {
        let fs = load(&sample_image()).expect("load");
        let pages = fs.catalog().expect("catalog");
        assert_eq!(2, pages.len());
        assert_eq!(SectorAddress::new(UNITEL_GEOMETRY, 10, 1), pages[0].start);
        assert_eq!(0x10, pages[0].length);
        assert_bytes_eq!(fs.page_contents(&pages[0]), *b"FIRST PAGE......");
        assert_eq!(0x105, fs.page_contents(&pages[1]).len());
        assert_bytes_eq!(fs.get_bytes(&pages[1].start, 11), *b"SECOND PAGE");
    }

    #[test]
    fn test_catalog_without_ficmac() {
        let fs = load(&vdt_image()).expect("load");
        assert!(matches!(fs.catalog(), Err(DiskError::FileNotFound(_))));
    }

    #[test]
    fn test_catalog_with_screens() {
        let fs = load(&sample_image()).expect("load");
        let pages = fs.catalog_with(&[Screen { offset: 0x900, slots: 1 }]).expect("catalog_with");
        assert_eq!(vec![0x105], pages.iter().map(|p| p.length).collect::<Vec<_>>());
    }

    #[test]
    fn test_translation_applied() {
        // Lower case EBCDIC on disk comes out as lower case ASCII.
        let mut raw = ebcdic(&vdt_image());
        put(&mut raw, 0x1000, &[0x81, 0x82, 0x83, 0xff]);
        let fs = UnitelFs::load(&raw, UNITEL_GEOMETRY).expect("load");
        assert_bytes_eq!(fs.as_bytes()[0x1000..0x1004], *b"abc\x1a");
    }
}
