// Copyright © 2023 David Caldwell <david@porkrind.org>

// FICMAC is the Unitel software's own index of Videotex pages. It is a regular data set whose contents are
// the menu screens the terminal shows when picking a page, one 64 byte slot per page.

use bytebuffer::ByteBuffer;

use crate::block::{Geometry, SectorAddress};
use crate::error::{DiskError, Result};
use crate::field;

pub const FICMAC: &str = "FICMAC";

pub const SLOT_SIZE: usize = 0x40;
const SLOT_FIELDS: usize = 0x18; // Page fields start here. Before that is the title shown on the screen.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub offset: usize,
    pub slots: usize,
}

// Only the screens we have seen on real disks. A FICMAC with more pages than these hold would need more.
pub const SCREENS: [Screen; 5] = [
    Screen { offset: 0x0380, slots: 12 },
    Screen { offset: 0x0900, slots: 22 },
    Screen { offset: 0x1100, slots: 22 },
    Screen { offset: 0x1900, slots: 22 },
    Screen { offset: 0x2100, slots: 22 },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogPage {
    pub start: SectorAddress,
    pub length: usize,
}

impl CatalogPage {
    /// Slot layout, from SLOT_FIELDS: used flag (1), start "TTSS" (4), length (4), unused (8). All hex.
    pub fn from_repr(geometry: Geometry, slot: &[u8]) -> Result<Option<CatalogPage>> {
        let mut buf = ByteBuffer::from_bytes(slot);
        buf.set_rpos(SLOT_FIELDS);
        let short = |e: std::io::Error| DiskError::record("page slot", e.to_string());
        if buf.read_u8().map_err(short)? == b'0' {
            return Ok(None);
        }
        let start = buf.read_bytes(4).map_err(short)?;
        let length = buf.read_bytes(4).map_err(short)?;
        buf.read_bytes(8).map_err(short)?;
        Ok(Some(CatalogPage {
            start: SectorAddress::from_unitel(geometry, "page start", &start)?,
            length: field::hex("page length", &length)?,
        }))
    }
}

/// Pages in screen order, then slot order. Page numbers are 1 + the index into this list.
pub fn read_pages(geometry: Geometry, ficmac: &[u8], screens: &[Screen]) -> Result<Vec<CatalogPage>> {
    let mut pages = vec![];
    for (n, screen) in screens.iter().enumerate() {
        let end = screen.offset + screen.slots * SLOT_SIZE;
        let Some(slots) = ficmac.get(screen.offset..end) else {
            return Err(DiskError::record("page catalog",
                                         format!("screen {} ({:#x}..{:#x}) is past the end of {} ({:#x} bytes)", n + 1, screen.offset, end, FICMAC, ficmac.len())));
        };
        for (i, slot) in slots.chunks(SLOT_SIZE).enumerate() {
            let page = CatalogPage::from_repr(geometry, slot)
                .map_err(|e| DiskError::record("page catalog", format!("screen {} slot {}: {}", n + 1, i + 1, e)))?;
            if let Some(page) = page {
                log::debug!("Screen {} slot {}: page {} @ {} ({} bytes)", n + 1, i + 1, pages.len() + 1, page.start, page.length);
                pages.push(page);
            }
        }
    }
    Ok(pages)
}
