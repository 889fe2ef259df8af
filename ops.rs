// Copyright © 2023 David Caldwell <david@porkrind.org>

// Various operations we can do on Unitel disk images

use crate::block::Geometry;
use crate::fs::label::CatalogEntry;
use crate::fs::UnitelFs;

use std::path::{PathBuf, Path};

use anyhow::Context;
use pretty_hex::PrettyHex;

pub fn open_image(path: &Path, geometry: Geometry) -> anyhow::Result<UnitelFs> {
    let raw = std::fs::read(path).with_context(|| format!("{}", path.to_string_lossy()))?;
    UnitelFs::load(&raw, geometry).with_context(|| format!("{}", path.to_string_lossy()))
}

pub fn convert(fs: &UnitelFs, image: &Path) -> anyhow::Result<()> {
    let dest = image.append(".ascii");
    println!("Converting to {}", dest.to_string_lossy());
    std::fs::write(&dest, fs.as_bytes()).with_context(|| format!("{}", dest.to_string_lossy()))?;
    Ok(())
}

pub fn diskinfo(fs: &UnitelFs) -> anyhow::Result<()> {
    let vlabel = fs.diskinfo()?;
    println!("Information on volume {}:", vlabel.label);
    println!(" - locked: {}", vlabel.locked);
    println!(" - owner: {}", vlabel.owner);
    println!(" - side(s): {}", vlabel.sides);
    println!(" - double density: {}", vlabel.double_density);
    println!(" - bytes per sector: {}", vlabel.bytes_per_sector);
    println!(" - sector sequence: {}", vlabel.sector_sequence);
    println!(" - label standard: {}", vlabel.label_standard);
    if let Some(ermap) = fs.error_map() {
        println!(" - defective tracks: {}", match (ermap.first_defective_track, ermap.second_defective_track) {
            (None,    _)       => "none".to_owned(),
            (Some(a), None)    => format!("{}", a),
            (Some(a), Some(b)) => format!("{}, {}", a, b),
        });
        println!(" - defective record: {}", ermap.has_defective_record());
    }
    Ok(())
}

pub fn listfiles(fs: &UnitelFs, long: bool) {
    println!("identifier        start l.end p.end blk {}", if long { " rec flags created    expires" } else { "" });
    println!("----------------- ----- ----- ----- ----{}", if long { " ---- ----- ---------- ----------" } else { "" });
    for entry in fs.dir_iter() {
        print!("{:17} {:05X} {:05X} {:05X} {:4}",
               entry.identifier,
               entry.beginning_of_extent.offset(),
               entry.end_of_extent.last_offset(),
               entry.end_of_data.offset().saturating_sub(1),
               entry.block_length);
        if long {
            let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or("-".to_owned());
            print!(" {:4} {}{}{}{}{} {:10} {:10}",
                   entry.record_length,
                   if entry.blocked_record { if entry.spanned_record { 'S' } else { 'B' } } else { '-' },
                   if entry.bypass { 'Y' } else { '-' },
                   if entry.restricted { 'R' } else { '-' },
                   if entry.write_protect { 'P' } else { '-' },
                   if entry.multi_volume { 'M' } else { '-' },
                   date(entry.created()),
                   date(entry.expires()));
        }
        println!("");
    }
}

pub fn listpages(fs: &UnitelFs) -> anyhow::Result<()> {
    println!("id  start len  ");
    println!("--- ----- -----");
    for (index, page) in fs.catalog()?.iter().enumerate() {
        println!("{:03} {:05X} {:5}", index + 1, page.start.offset(), page.length);
    }
    Ok(())
}

pub fn page_filename(image: &Path, page_number: usize) -> PathBuf {
    image.append(format!("-{:03}.vdt", page_number))
}

pub fn extract(fs: &UnitelFs, image: &Path) -> anyhow::Result<()> {
    let pages = fs.catalog()?;
    for (index, page) in pages.iter().enumerate() {
        let dest = page_filename(image, index + 1);
        let data = fs.page_contents(page);
        if data.len() < page.length {
            log::warn!("Page {} is truncated: {} of {} bytes", index + 1, data.len(), page.length);
        }
        std::fs::write(&dest, data).with_context(|| format!("{}", dest.to_string_lossy()))?;
        log::info!("Page {} @ {} -> {}", index + 1, page.start, dest.to_string_lossy());
    }
    println!("Extracted {} pages", pages.len());
    Ok(())
}

pub fn dump(fs: &UnitelFs, file: Option<&str>) -> anyhow::Result<()> {
    match file {
        Some(name) => println!("{}\n{:?}", name, fs.read_file(name)?.hex_dump()),
        None => {
            let track_size = fs.geometry().track_size();
            for (track, data) in fs.as_bytes().chunks(track_size).enumerate() {
                println!("Track {}\n{:?}", track, data.hex_dump());
            }
        }
    }
    Ok(())
}

pub fn dump_index(fs: &UnitelFs) {
    for (slot, entry) in fs.index.iter().enumerate() {
        match entry {
            CatalogEntry::Empty => println!("{:2} {}", slot + 1, entry.kind()),
            CatalogEntry::DataSet(d) => println!("{:2} {:11} {:17} {} -> {} (eod {}){}", slot + 1, entry.kind(), d.identifier,
                                                 d.beginning_of_extent.ibm_field(), d.end_of_extent.ibm_field(), d.end_of_data.ibm_field(),
                                                 if d.deleted { " deleted" } else { "" }),
            e => println!("{:2} {:11} {:?}", slot + 1, entry.kind(), e),
        }
    }
}

// Stolen^H^H^H^H^H^H Adapted from https://internals.rust-lang.org/t/pathbuf-has-set-extension-but-no-add-extension-cannot-cleanly-turn-tar-to-tar-gz/14187/10
use std::ffi::{OsString, OsStr};
trait Append {
    fn append(&self, ext: impl AsRef<OsStr>) -> PathBuf;
}

impl Append for Path {
    fn append(&self, ext: impl AsRef<OsStr>) -> PathBuf {
        let mut os_string: OsString = self.to_owned().into();
        os_string.push(ext.as_ref());
        os_string.into()
    }
}
