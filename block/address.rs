// Copyright © 2023 David Caldwell <david@porkrind.org>

use std::fmt::{self, Display};

use super::Geometry;
use crate::error::{DiskError, Result};
use crate::field;

/// A track/sector pair. The IBM labels write these as decimal "TT0SS", the Unitel software as hex "TTSS";
/// once decoded they are the same thing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectorAddress {
    geometry: Geometry,
    pub track: usize,
    pub sector: usize,
}

impl SectorAddress {
    pub fn new(geometry: Geometry, track: usize, sector: usize) -> SectorAddress {
        assert!(geometry.contains(track, sector), "Track {} sector {} is outside of {:?}", track, sector, geometry);
        SectorAddress { geometry, track, sector }
    }

    fn checked(geometry: Geometry, name: &'static str, track: usize, sector: usize) -> Result<SectorAddress> {
        if !geometry.contains(track, sector) {
            return Err(DiskError::record(name, format!("track {} sector {} is not on the disk", track, sector)));
        }
        Ok(SectorAddress { geometry, track, sector })
    }

    fn ibm_digits(name: &'static str, raw: &[u8]) -> Result<(usize, usize)> {
        if raw.len() != 5 { return Err(DiskError::record(name, format!("IBM address must be 5 bytes, not {}", raw.len()))) }
        Ok((field::decimal(name, &raw[0..2])?, field::decimal(name, &raw[3..5])?))
    }

    /// 2 decimal digits of track, a separator we don't look at, 2 decimal digits of sector.
    pub fn from_ibm(geometry: Geometry, name: &'static str, raw: &[u8]) -> Result<SectorAddress> {
        let (track, sector) = Self::ibm_digits(name, raw)?;
        Self::checked(geometry, name, track, sector)
    }

    /// Like `from_ibm` but the address doesn't have to be on the disk. Deleted data sets keep stale extents
    /// around; they can be displayed with `ibm_field()` but `offset()` on one that is off the disk panics.
    pub fn from_ibm_unchecked(geometry: Geometry, name: &'static str, raw: &[u8]) -> Result<SectorAddress> {
        let (track, sector) = Self::ibm_digits(name, raw)?;
        Ok(SectorAddress { geometry, track, sector })
    }

    /// 2 hex digits of track then 2 hex digits of sector.
    pub fn from_unitel(geometry: Geometry, name: &'static str, raw: &[u8]) -> Result<SectorAddress> {
        if raw.len() != 4 { return Err(DiskError::record(name, format!("Unitel address must be 4 bytes, not {}", raw.len()))) }
        Self::checked(geometry, name, field::hex(name, &raw[0..2])?, field::hex(name, &raw[2..4])?)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn offset(&self) -> usize {
        self.geometry.offset(self.track, self.sector)
    }

    pub fn last_offset(&self) -> usize {
        self.offset() + self.geometry.sector_size - 1
    }

    pub fn ibm_field(&self) -> String {
        format!("{:02}0{:02}", self.track, self.sector)
    }

    pub fn unitel_field(&self) -> String {
        format!("{:02X}{:02X}", self.track, self.sector)
    }
}

impl Display for SectorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.track, self.sector)
    }
}
