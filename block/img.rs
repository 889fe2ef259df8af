// Copyright © 2023 David Caldwell <david@porkrind.org>

use std::ops::Range;

use super::{ebcdic, Geometry, SectorAddress};

/// A raw sector dump of the disk (no headers, no interleave), already translated to VDT.
#[derive(Clone, Debug)]
pub struct IMG {
    pub data: Vec<u8>,
    pub geometry: Geometry,
}

impl IMG {
    pub fn from_vec(image: Vec<u8>, geometry: Geometry) -> IMG {
        IMG { data: image, geometry }
    }

    pub fn from_ebcdic(image: &[u8], geometry: Geometry) -> IMG {
        Self::from_vec(ebcdic::translate(image), geometry)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn sector(&self, address: &SectorAddress) -> &[u8] {
        let start = address.offset();
        self.range(start..start + self.geometry.sector_size)
    }

    /// Image dumps are sometimes cut short, so ranges past the end are truncated instead of failing.
    pub fn range(&self, range: Range<usize>) -> &[u8] {
        let end = std::cmp::min(range.end, self.data.len());
        if end < range.end {
            log::warn!("{:#x}..{:#x} runs past the end of the image ({:#x} bytes), truncating", range.start, range.end, self.data.len());
        }
        let start = std::cmp::min(range.start, end);
        &self.data[start..end]
    }
}
