// Copyright © 2023 David Caldwell <david@porkrind.org>

pub mod address;
pub mod ebcdic;
pub mod img;

pub use address::SectorAddress;

/// The Unitel terminal writes IBM 3740 single sided, single density disks but only uses 74 of the 77 tracks.
pub const UNITEL_GEOMETRY: Geometry = Geometry {
    tracks: 74,
    sectors: 26,
    sector_size: 128,
};

/// Tracks are numbered from 0, sectors from 1 (IBM convention).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub tracks: usize,      // per side
    pub sectors: usize,     // per track
    pub sector_size: usize, // bytes
}

impl Geometry {
    pub fn new(tracks: usize, sectors: usize, sector_size: usize) -> Geometry {
        assert!(tracks > 0, "Geometry needs at least one track");
        assert!(sectors > 0, "Geometry needs at least one sector per track");
        assert!(sector_size > 0 && sector_size % 128 == 0, "Bad sector size {}", sector_size);
        Geometry { tracks, sectors, sector_size }
    }

    pub fn track_size(&self) -> usize {
        self.sectors * self.sector_size
    }

    pub fn disk_size(&self) -> usize {
        self.track_size() * self.tracks
    }

    // The track bound is inclusive: an end-of-data address may point just past the last track.
    pub fn contains(&self, track: usize, sector: usize) -> bool {
        track <= self.tracks && sector >= 1 && sector <= self.sectors
    }

    pub fn offset(&self, track: usize, sector: usize) -> usize {
        assert!(self.contains(track, sector), "Track {} sector {} is outside of {:?}", track, sector, self);
        track * self.sector_size * self.sectors + (sector - 1) * self.sector_size
    }
}
