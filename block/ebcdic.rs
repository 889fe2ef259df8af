// Copyright © 2023 David Caldwell <david@porkrind.org>

// The Unitel terminal's EBCDIC variant, mapped to the Videotex (VDT) code set the pages are meant to be
// sent in. Codes with no VDT equivalent all become 0x1a (SUB), so this is not reversible.

pub const SUB: u8 = 0x1a;

pub const EBCDIC_TO_VDT: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x09, 0x06, 0x7f, // 00
    0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, // 08
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x08, 0x17, // 10
    0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f, // 18
    0x20, 0x21, 0x22, 0x23, 0x24, 0x0a, 0x17, 0x1b, // 20
    0x28, 0x29, 0x3a, 0x3b, 0x3c, 0x05, 0x06, 0x07, // 28
    0x30, 0x31, 0x16, 0x33, 0x34, 0x35, 0x36, 0x04, // 30
    0x38, 0x39, 0x3a, 0x3b, 0x14, 0x15, 0x3e, 0x3f, // 38
    0x20, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, // 40
    0x48, 0x49, 0x5b, 0x2e, 0x3c, 0x28, 0x2b, 0x21, // 48
    0x26, 0x51, 0x52, 0x53, 0x54, 0x55, 0x56, 0x57, // 50
    0x58, 0x59, 0x5d, 0x24, 0x2a, 0x29, 0x3b, 0x5e, // 58
    0x2d, 0x2f, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, // 60
    0x68, 0x69, 0x7c, 0x2c, 0x25, 0x5f, 0x3e, 0x3f, // 68
    0x70, 0x71, 0x72, 0x73, 0x74, 0x75, 0x76, 0x77, // 70
    0x78, 0x60, 0x3a, 0x23, 0x40, 0x27, 0x3d, 0x22, // 78
    0x1a, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, // 80
    0x68, 0x69, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // 88
    0x1a, 0x6a, 0x6b, 0x6c, 0x6d, 0x6e, 0x6f, 0x70, // 90
    0x71, 0x72, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // 98
    0x1a, 0x7e, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, // a0
    0x79, 0x7a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // a8
    0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // b0
    0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // b8
    0x7b, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, // c0
    0x48, 0x49, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // c8
    0x7d, 0x4a, 0x4b, 0x4c, 0x4d, 0x4e, 0x4f, 0x50, // d0
    0x51, 0x52, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // d8
    0x5c, 0x1a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, // e0
    0x59, 0x5a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // e8
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, // f0
    0x38, 0x39, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a, // f8
];

pub fn to_vdt(byte: u8) -> u8 {
    EBCDIC_TO_VDT[byte as usize]
}

pub fn translate(raw: &[u8]) -> Vec<u8> {
    raw.iter().map(|b| to_vdt(*b)).collect()
}
