// Copyright © 2023 David Caldwell <david@porkrind.org>

// The IBM 3740 track 0 labels. Every sector of track 0 holds one 128 byte record; the first bytes say which
// kind. Fields are at fixed positions, stored as (translated) ASCII text.
// IBM Diskette General Information Manual (GA21-9182), "Diskette Labels".

use std::ops::Range;

use chrono::NaiveDate;

use crate::block::{Geometry, SectorAddress};
use crate::error::{DiskError, Result};
use crate::field;

pub const LABEL_SIZE: usize = 128;

mod ermap {
    use std::ops::Range;
    pub const MAGIC: &[u8] = b"ERMAP";
    pub const FIRST_DEFECTIVE_TRACK: Range<usize> = 6..8;
    pub const SECOND_DEFECTIVE_TRACK: Range<usize> = 10..12;
    pub const DEFECTIVE_RECORD: usize = 22;
}

mod vol1 {
    use std::ops::Range;
    pub const MAGIC: &[u8] = b"VOL1";
    pub const LABEL: Range<usize> = 4..10;
    pub const ACCESSIBILITY: usize = 10;
    pub const OWNER: Range<usize> = 37..51;
    pub const SURFACE: usize = 71;
    pub const SECTOR_SIZE: usize = 75;
    pub const SECTOR_SEQUENCE: Range<usize> = 76..78;
    pub const VERSION: usize = 79;
}

mod hdr1 {
    use std::ops::Range;
    pub const MAGIC: &[u8] = b"HDR1";
    pub const DELETED_MAGIC: &[u8] = b"DDR1";
    pub const IDENTIFIER: Range<usize> = 5..22;
    pub const BLOCK_LENGTH: Range<usize> = 22..27;
    pub const RECORD_ATTRIBUTE: usize = 27;
    pub const BEGINNING_OF_EXTENT: Range<usize> = 28..33;
    pub const PHYSICAL_RECORD_LENGTH: usize = 33;
    pub const END_OF_EXTENT: Range<usize> = 34..39;
    pub const RECORD_FORMAT: usize = 39;
    pub const BYPASS: usize = 40;
    pub const SECURITY: usize = 41;
    pub const WRITE_PROTECT: usize = 42;
    pub const MULTIVOLUME: usize = 44;
    pub const VOLUME_SEQUENCE: Range<usize> = 45..47;
    pub const CREATION_DATE: Range<usize> = 47..53;
    pub const RECORD_LENGTH: Range<usize> = 53..57;
    pub const EXPIRATION_DATE: Range<usize> = 66..72;
    pub const END_OF_DATA: Range<usize> = 74..79;
}

const DEFAULT_BLOCK_LENGTH: usize = 80;

fn size_code(code: u8) -> usize {
    match code {
        b'1' =>  256,
        b'2' =>  512,
        b'3' => 1024,
        _    =>  128,
    }
}

fn check_len(kind: &'static str, raw: &[u8]) -> Result<()> {
    if raw.len() < LABEL_SIZE {
        return Err(DiskError::record(kind, format!("{} bytes is too short (need {})", raw.len(), LABEL_SIZE)));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
pub enum CatalogEntry {
    ErrorMap(ErrorMap),
    VolumeLabel(VolumeLabel),
    DataSet(DataSet),
    Empty,
}

impl CatalogEntry {
    pub fn from_repr(geometry: Geometry, raw: &[u8]) -> Result<CatalogEntry> {
        check_len("catalog entry", raw)?;
        Ok(match raw {
            r if r.starts_with(ermap::MAGIC) => CatalogEntry::ErrorMap(ErrorMap::from_repr(raw)?),
            r if r.starts_with(vol1::MAGIC)  => CatalogEntry::VolumeLabel(VolumeLabel::from_repr(raw)?),
            r if r.starts_with(hdr1::MAGIC) ||
                 r.starts_with(hdr1::DELETED_MAGIC) => CatalogEntry::DataSet(DataSet::from_repr(geometry, raw)?),
            _ => CatalogEntry::Empty,
        })
    }

    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorMap {
    pub first_defective_track: Option<usize>,
    pub second_defective_track: Option<usize>,
    pub defective_record: bool,
}

impl ErrorMap {
    pub fn from_repr(raw: &[u8]) -> Result<ErrorMap> {
        check_len("error map", raw)?;
        if !raw.starts_with(ermap::MAGIC) { return Err(DiskError::record("error map", "missing ERMAP identifier")) }
        Ok(ErrorMap {
            first_defective_track: field::optional_decimal("first defective track", &raw[ermap::FIRST_DEFECTIVE_TRACK])?,
            second_defective_track: field::optional_decimal("second defective track", &raw[ermap::SECOND_DEFECTIVE_TRACK])?,
            defective_record: raw[ermap::DEFECTIVE_RECORD] == b'D',
        })
    }

    pub fn has_defective_track(&self) -> bool {
        self.first_defective_track.is_some()
    }

    pub fn has_defective_record(&self) -> bool {
        self.defective_record
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VolumeLabel {
    pub label: String,
    pub locked: bool,
    pub owner: String,
    pub sides: u8,
    pub double_density: bool,
    pub bytes_per_sector: usize,
    pub sector_sequence: usize,
    pub label_standard: bool,
}

impl VolumeLabel {
    pub fn from_repr(raw: &[u8]) -> Result<VolumeLabel> {
        check_len("volume label", raw)?;
        if !raw.starts_with(vol1::MAGIC) { return Err(DiskError::record("volume label", "missing VOL1 identifier")) }
        let (sides, double_density) = match raw[vol1::SURFACE] {
            b'2' => (2, false),
            b'M' => (2, true),
            _    => (1, false),
        };
        Ok(VolumeLabel {
            label: field::text("volume identifier", &raw[vol1::LABEL])?,
            locked: raw[vol1::ACCESSIBILITY] != b' ',
            owner: field::text("owner identifier", &raw[vol1::OWNER])?,
            sides,
            double_density,
            bytes_per_sector: size_code(raw[vol1::SECTOR_SIZE]),
            sector_sequence: field::optional_decimal("sector sequence", &raw[vol1::SECTOR_SEQUENCE])?.unwrap_or(1),
            label_standard: raw[vol1::VERSION] == b'W',
        })
    }
}

/// A file. `HDR1` for live ones, `DDR1` for deleted ones.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSet {
    pub deleted: bool,
    pub identifier: String,
    pub block_length: usize,
    pub blocked_record: bool,
    pub spanned_record: bool,
    pub beginning_of_extent: SectorAddress,
    pub physical_record_length: usize,
    pub end_of_extent: SectorAddress,
    pub fixed_length: bool,
    pub bypass: bool,
    pub restricted: bool,
    pub write_protect: bool,
    pub multi_volume: bool,
    pub sequence_number: Option<usize>,
    pub creation_date: Option<String>,
    pub record_length: usize,
    pub expiration_date: Option<String>,
    pub end_of_data: SectorAddress,
}

impl DataSet {
    pub fn from_repr(geometry: Geometry, raw: &[u8]) -> Result<DataSet> {
        check_len("data set label", raw)?;
        let deleted = match &raw[0..4] {
            m if m == hdr1::MAGIC         => false,
            m if m == hdr1::DELETED_MAGIC => true,
            m => return Err(DiskError::record("data set label", format!("bad identifier {:?}", String::from_utf8_lossy(m)))),
        };
        let block_length = match &raw[hdr1::BLOCK_LENGTH] {
            b if field::is_blank(b) => DEFAULT_BLOCK_LENGTH,
            b => field::decimal("block length", b)?,
        };
        let (blocked_record, spanned_record) = match raw[hdr1::RECORD_ATTRIBUTE] {
            b'R' => (true, true),
            b'B' => (true, false),
            _    => (false, false),
        };
        // Nothing reads through a deleted data set, so its extent only has to parse.
        let parse = if deleted { SectorAddress::from_ibm_unchecked } else { SectorAddress::from_ibm };
        let address = |name, range: Range<usize>| parse(geometry, name, &raw[range]);
        Ok(DataSet {
            deleted,
            identifier: field::text("data set identifier", &raw[hdr1::IDENTIFIER])?,
            block_length,
            blocked_record,
            spanned_record,
            beginning_of_extent: address("beginning of extent", hdr1::BEGINNING_OF_EXTENT)?,
            physical_record_length: size_code(raw[hdr1::PHYSICAL_RECORD_LENGTH]),
            end_of_extent: address("end of extent", hdr1::END_OF_EXTENT)?,
            fixed_length: matches!(raw[hdr1::RECORD_FORMAT], b' ' | b'F'),
            bypass: raw[hdr1::BYPASS] == b'B',
            restricted: raw[hdr1::SECURITY] != b' ',
            write_protect: raw[hdr1::WRITE_PROTECT] == b'P',
            multi_volume: matches!(raw[hdr1::MULTIVOLUME], b'C' | b'L'),
            sequence_number: field::optional_decimal("volume sequence number", &raw[hdr1::VOLUME_SEQUENCE])?,
            creation_date: field::optional_text("creation date", &raw[hdr1::CREATION_DATE])?,
            record_length: field::optional_decimal("record length", &raw[hdr1::RECORD_LENGTH])?.unwrap_or(block_length),
            expiration_date: field::optional_text("expiration date", &raw[hdr1::EXPIRATION_DATE])?,
            end_of_data: address("end of data", hdr1::END_OF_DATA)?,
        })
    }

    pub fn created(&self) -> Option<NaiveDate> {
        self.creation_date.as_deref().and_then(decode_date)
    }

    pub fn expires(&self) -> Option<NaiveDate> {
        self.expiration_date.as_deref().and_then(decode_date)
    }
}

// YYMMDD. chrono puts 00-68 in the 2000s and 69-99 in the 1900s, which is fine for these disks.
pub fn decode_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%y%m%d").ok()
}
