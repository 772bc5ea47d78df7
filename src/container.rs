//! ZIP container handling
//!
//! Codec output is stored in, or fetched from, a ZIP archive without being
//! touched.  Only single entry archives are written; on reading, the first
//! entry with a matching extension is taken.

use std::io::{Cursor,Read,Write};
use zip::{CompressionMethod,ZipArchive,ZipWriter};
use zip::write::FileOptions;
use crate::{DYNERR,Error};

/// Create an archive holding `dat` as the single entry `entry_name`
pub fn wrap(dat: &[u8],entry_name: &str) -> Result<Vec<u8>,DYNERR> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(entry_name,options)?;
    writer.write_all(dat)?;
    let ans = writer.finish()?.into_inner();
    log::debug!("wrapped {} bytes as {} in {} byte archive",dat.len(),entry_name,ans.len());
    Ok(ans)
}

/// Get (name,contents) of the first file entry whose name ends with `extension`
pub fn extract(archive: &[u8],extension: &str) -> Result<(String,Vec<u8>),DYNERR> {
    let mut reader = ZipArchive::new(Cursor::new(archive))?;
    for i in 0..reader.len() {
        let mut entry = reader.by_index(i)?;
        log::trace!("entry {}: {}",i,entry.name());
        if entry.is_file() && entry.name().ends_with(extension) {
            let name = entry.name().to_string();
            let mut ans = Vec::new();
            entry.read_to_end(&mut ans)?;
            log::debug!("extracted {} bytes from {}",ans.len(),name);
            return Ok((name,ans));
        }
    }
    log::error!("no entry ending with {}",extension);
    Err(Box::new(Error::EntryNotFound))
}

#[test]
fn container_is_lossless() {
    let huf = crate::huff::encode("I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes()).expect("compression failed");
    let archive = wrap(&huf,"sam.huf").expect("wrap failed");
    assert_eq!(archive[0..4],[0x50,0x4b,0x03,0x04]);
    let (name,extracted) = extract(&archive,".huf").expect("extract failed");
    assert_eq!(name,"sam.huf");
    assert_eq!(extracted,huf);
}

#[test]
fn empty_entry() {
    let archive = wrap(&[],"nothing.txt").expect("wrap failed");
    let (_,extracted) = extract(&archive,".txt").expect("extract failed");
    assert!(extracted.is_empty());
}

#[test]
fn missing_entry() {
    let archive = wrap("hello".as_bytes(),"hello.txt").expect("wrap failed");
    let err = extract(&archive,".huf").expect_err("found an entry that is not there");
    assert_eq!(err.downcast_ref::<Error>(),Some(&Error::EntryNotFound));
    assert!(extract("not an archive".as_bytes(),".huf").is_err());
}
