// Copyright © 2023 David Caldwell <david@porkrind.org>

use std::path::PathBuf;

use docopt::Docopt;
use serde::Deserialize;

use unitel::block::UNITEL_GEOMETRY;
use unitel::ops::*;

const USAGE: &'static str = r#"
Unitel - Extract Videotex pages from 8 inch floppy disks.

Usage:
  unitel -h
  unitel convert <image>
  unitel diskinfo <image>
  unitel listfiles [-l] <image>
  unitel listpages <image>
  unitel extract <image>
  unitel dump [--file <file>] <image>
  unitel dump-index <image>

Options:
  -h --help              Show this screen.

 convert:
   Converts the EBCDIC disk image to a VDT (ASCII) disk image, written to
   <image>.ascii.

 diskinfo:
   Display information about the disk image (volume label and error map).

 listfiles:
   -l --long             Also show record length, flags and dates.

   List files with their start, logical end and physical end offsets.

 listpages:
   List Videotex pages and their offsets.

 extract:
   Extract all pages into <image>-NNN.vdt files, NNN being the page number.

 dump:
   -f --file <file>      Dump this file instead of the whole image.

   Hex dump of the converted image, one track at a time.

 dump-index:
   Show every track 0 catalog record.
"#;

#[derive(Debug, Deserialize)]
struct Args {
    flag_long:        bool,
    flag_file:        Option<String>,
    cmd_convert:      bool,
    cmd_diskinfo:     bool,
    cmd_listfiles:    bool,
    cmd_listpages:    bool,
    cmd_extract:      bool,
    cmd_dump:         bool,
    cmd_dump_index:   bool,
    arg_image:        PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let fs = open_image(&args.arg_image, UNITEL_GEOMETRY)?;
    log::debug!("{} files, {} bytes", fs.dir().len(), fs.as_bytes().len());

    if args.cmd_convert {
        convert(&fs, &args.arg_image)?;
    }

    if args.cmd_diskinfo {
        diskinfo(&fs)?;
    }

    if args.cmd_listfiles {
        listfiles(&fs, args.flag_long);
    }

    if args.cmd_listpages {
        listpages(&fs)?;
    }

    if args.cmd_extract {
        extract(&fs, &args.arg_image)?;
    }

    if args.cmd_dump {
        dump(&fs, args.flag_file.as_deref())?;
    }

    if args.cmd_dump_index {
        dump_index(&fs);
    }

    Ok(())
}
