//! Deterministic ZIP writing

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use super::{PackageError, Result};

const EOCD_SIG: u32 = 0x0605_4b50;
const CDIR_SIG: u32 = 0x0201_4b50;
const LOCAL_SIG: u32 = 0x0403_4b50;

const VERSION: u16 = 20;
const METHOD_DEFLATE: u16 = 8;

// Fixed MS-DOS stamp (2024-06-01 12:00) so output bytes do not depend
// on the wall clock.
const DOS_TIME: u16 = 0x6000;
const DOS_DATE: u16 = 0x58C1;

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn as_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| PackageError::Unsupported(format!("{what} exceeds 4 GiB")))
}

struct WrittenEntry {
    name: String,
    crc: u32,
    compressed_len: u32,
    uncompressed_len: u32,
    local_offset: u32,
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

pub(super) fn write_archive(parts: &[&(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut entries = Vec::with_capacity(parts.len());

    for (name, data) in parts.iter().map(|p| (&p.0, &p.1)) {
        let local_offset = as_u32(out.len(), "archive")?;
        let compressed = deflate(data)?;
        let entry = WrittenEntry {
            name: name.clone(),
            crc: crc32fast::hash(data),
            compressed_len: as_u32(compressed.len(), name)?,
            uncompressed_len: as_u32(data.len(), name)?,
            local_offset,
        };

        push_u32(&mut out, LOCAL_SIG);
        push_u16(&mut out, VERSION);
        push_u16(&mut out, 0); // flags
        push_u16(&mut out, METHOD_DEFLATE);
        push_u16(&mut out, DOS_TIME);
        push_u16(&mut out, DOS_DATE);
        push_u32(&mut out, entry.crc);
        push_u32(&mut out, entry.compressed_len);
        push_u32(&mut out, entry.uncompressed_len);
        push_u16(&mut out, as_u32(name.len(), "entry name")? as u16);
        push_u16(&mut out, 0); // extra
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&compressed);

        entries.push(entry);
    }

    let cd_offset = as_u32(out.len(), "archive")?;
    for entry in &entries {
        push_u32(&mut out, CDIR_SIG);
        push_u16(&mut out, VERSION); // version made by
        push_u16(&mut out, VERSION); // version needed
        push_u16(&mut out, 0); // flags
        push_u16(&mut out, METHOD_DEFLATE);
        push_u16(&mut out, DOS_TIME);
        push_u16(&mut out, DOS_DATE);
        push_u32(&mut out, entry.crc);
        push_u32(&mut out, entry.compressed_len);
        push_u32(&mut out, entry.uncompressed_len);
        push_u16(&mut out, entry.name.len() as u16);
        push_u16(&mut out, 0); // extra
        push_u16(&mut out, 0); // comment
        push_u16(&mut out, 0); // disk number
        push_u16(&mut out, 0); // internal attributes
        push_u32(&mut out, 0); // external attributes
        push_u32(&mut out, entry.local_offset);
        out.extend_from_slice(entry.name.as_bytes());
    }
    let cd_len = as_u32(out.len() - cd_offset as usize, "central directory")?;

    let count = entries.len() as u16;
    push_u32(&mut out, EOCD_SIG);
    push_u16(&mut out, 0); // this disk
    push_u16(&mut out, 0); // central directory disk
    push_u16(&mut out, count);
    push_u16(&mut out, count);
    push_u32(&mut out, cd_len);
    push_u32(&mut out, cd_offset);
    push_u16(&mut out, 0); // comment length
    Ok(out)
}
