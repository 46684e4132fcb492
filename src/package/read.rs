//! ZIP reading via the central directory

use std::io::Read;

use flate2::read::DeflateDecoder;

use super::{PackageError, Result};

const EOCD_SIG: u32 = 0x0605_4b50;
const CDIR_SIG: u32 = 0x0201_4b50;
const LOCAL_SIG: u32 = 0x0403_4b50;

const EOCD_LEN: usize = 22;
const MAX_COMMENT: usize = 0xFFFF;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

const FLAG_ENCRYPTED: u16 = 0x0001;

fn u16_at(data: &[u8], pos: usize) -> Result<u16> {
    let bytes = data
        .get(pos..pos + 2)
        .ok_or_else(|| PackageError::Format("truncated record".into()))?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(data: &[u8], pos: usize) -> Result<u32> {
    let bytes = data
        .get(pos..pos + 4)
        .ok_or_else(|| PackageError::Format("truncated record".into()))?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Locate the end-of-central-directory record by scanning backwards.
/// Its fixed part is 22 bytes; an archive comment of up to 64 KiB may
/// follow, so the signature is matched against the comment length.
fn find_eocd(data: &[u8]) -> Result<usize> {
    if data.len() < EOCD_LEN {
        return Err(PackageError::Format("shorter than an empty archive".into()));
    }
    let floor = data.len().saturating_sub(EOCD_LEN + MAX_COMMENT);
    let mut pos = data.len() - EOCD_LEN;
    loop {
        if u32_at(data, pos)? == EOCD_SIG {
            let comment_len = u16_at(data, pos + 20)? as usize;
            if pos + EOCD_LEN + comment_len == data.len() {
                return Ok(pos);
            }
        }
        if pos == floor {
            return Err(PackageError::Format("end of central directory not found".into()));
        }
        pos -= 1;
    }
}

struct CentralEntry {
    name: String,
    flags: u16,
    method: u16,
    crc: u32,
    compressed_len: usize,
    uncompressed_len: usize,
    local_offset: usize,
}

fn read_central_entry(data: &[u8], pos: usize) -> Result<(CentralEntry, usize)> {
    if u32_at(data, pos)? != CDIR_SIG {
        return Err(PackageError::Format("bad central directory signature".into()));
    }
    let flags = u16_at(data, pos + 8)?;
    let method = u16_at(data, pos + 10)?;
    let crc = u32_at(data, pos + 16)?;
    let compressed_len = u32_at(data, pos + 20)? as usize;
    let uncompressed_len = u32_at(data, pos + 24)? as usize;
    let name_len = u16_at(data, pos + 28)? as usize;
    let extra_len = u16_at(data, pos + 30)? as usize;
    let comment_len = u16_at(data, pos + 32)? as usize;
    let local_offset = u32_at(data, pos + 42)? as usize;
    let name_bytes = data
        .get(pos + 46..pos + 46 + name_len)
        .ok_or_else(|| PackageError::Format("truncated entry name".into()))?;
    let name = String::from_utf8(name_bytes.to_vec())
        .map_err(|_| PackageError::Unsupported("non-utf8 entry name".into()))?;
    let next = pos + 46 + name_len + extra_len + comment_len;
    Ok((
        CentralEntry {
            name,
            flags,
            method,
            crc,
            compressed_len,
            uncompressed_len,
            local_offset,
        },
        next,
    ))
}

/// The local header repeats name and extra fields with lengths that can
/// differ from the central directory copy, so the data offset must be
/// computed from the local lengths.
fn entry_data<'a>(data: &'a [u8], entry: &CentralEntry) -> Result<&'a [u8]> {
    let pos = entry.local_offset;
    if u32_at(data, pos)? != LOCAL_SIG {
        return Err(PackageError::Format(format!(
            "bad local header for {}",
            entry.name
        )));
    }
    let name_len = u16_at(data, pos + 26)? as usize;
    let extra_len = u16_at(data, pos + 28)? as usize;
    let start = pos + 30 + name_len + extra_len;
    data.get(start..start + entry.compressed_len)
        .ok_or_else(|| PackageError::Format(format!("truncated data for {}", entry.name)))
}

fn inflate_entry(entry: &CentralEntry, raw: &[u8]) -> Result<Vec<u8>> {
    let out = match entry.method {
        METHOD_STORED => raw.to_vec(),
        METHOD_DEFLATE => {
            let mut out = Vec::with_capacity(entry.uncompressed_len);
            DeflateDecoder::new(raw).read_to_end(&mut out).map_err(|e| {
                PackageError::Corrupt(format!("{}: bad deflate stream: {e}", entry.name))
            })?;
            out
        }
        other => {
            return Err(PackageError::Unsupported(format!(
                "compression method {other} ({})",
                entry.name
            )))
        }
    };
    if out.len() != entry.uncompressed_len {
        return Err(PackageError::Corrupt(format!(
            "{}: size mismatch ({} != {})",
            entry.name,
            out.len(),
            entry.uncompressed_len
        )));
    }
    if crc32fast::hash(&out) != entry.crc {
        return Err(PackageError::Corrupt(format!(
            "{}: crc32 mismatch",
            entry.name
        )));
    }
    Ok(out)
}

pub(super) fn parse_archive(data: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let eocd = find_eocd(data)?;
    let entry_count = u16_at(data, eocd + 10)? as usize;
    let cd_offset = u32_at(data, eocd + 16)? as usize;

    let mut parts = Vec::with_capacity(entry_count);
    let mut pos = cd_offset;
    for _ in 0..entry_count {
        let (entry, next) = read_central_entry(data, pos)?;
        pos = next;
        if entry.flags & FLAG_ENCRYPTED != 0 {
            return Err(PackageError::Unsupported(format!(
                "encrypted entry {}",
                entry.name
            )));
        }
        // Directory markers carry no payload.
        if entry.name.ends_with('/') {
            continue;
        }
        let raw = entry_data(data, &entry)?;
        let bytes = inflate_entry(&entry, raw)?;
        parts.push((entry.name, bytes));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eocd_found_with_trailing_comment() {
        // Empty archive followed by a comment of 4 bytes.
        let mut data = Vec::new();
        data.extend_from_slice(&EOCD_SIG.to_le_bytes());
        data.extend_from_slice(&[0u8; 16]);
        data.extend_from_slice(&4u16.to_le_bytes());
        data.extend_from_slice(b"note");
        assert_eq!(find_eocd(&data).expect("eocd"), 0);
    }

    #[test]
    fn eocd_with_wrong_comment_length_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(&EOCD_SIG.to_le_bytes());
        data.extend_from_slice(&[0u8; 16]);
        data.extend_from_slice(&9u16.to_le_bytes());
        data.extend_from_slice(b"note");
        assert!(find_eocd(&data).is_err());
    }

    #[test]
    fn empty_archive_has_no_parts() {
        let mut data = Vec::new();
        data.extend_from_slice(&EOCD_SIG.to_le_bytes());
        data.extend_from_slice(&[0u8; 18]);
        assert!(parse_archive(&data).expect("parse").is_empty());
    }
}
