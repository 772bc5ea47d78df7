//! Format conversions between `.huf`, `.zip`, and `.txt`.
//!
//! These are byte buffer transformations built from `huff` and `container`.
//! Text conversions check that the result is UTF-8 but otherwise pass the bytes through.

use crate::{container,huff,DYNERR,Error};

/// Store a `.huf` buffer in a new archive
pub fn huf_to_zip(huf: &[u8],entry_name: &str) -> Result<Vec<u8>,DYNERR> {
    container::wrap(huf,entry_name)
}

/// Get the first `.huf` entry from an archive, unchanged
pub fn zip_to_huf(archive: &[u8]) -> Result<Vec<u8>,DYNERR> {
    let (_,huf) = container::extract(archive,".huf")?;
    Ok(huf)
}

/// Expand a `.huf` buffer that holds text
pub fn huf_to_txt(huf: &[u8]) -> Result<Vec<u8>,DYNERR> {
    let txt = huff::decode(huf)?;
    if let Err(e) = std::str::from_utf8(&txt) {
        log::error!("expanded data is not text: {}",e);
        return Err(Box::new(Error::NotText));
    }
    Ok(txt)
}

/// Expand the first `.huf` entry of an archive to text
pub fn zip_to_txt(archive: &[u8]) -> Result<Vec<u8>,DYNERR> {
    huf_to_txt(&zip_to_huf(archive)?)
}

/// Store text in a new archive, the Huffman codec is not involved
pub fn txt_to_zip(txt: &[u8],entry_name: &str) -> Result<Vec<u8>,DYNERR> {
    container::wrap(txt,entry_name)
}

/// Get the first `.txt` entry from an archive
pub fn unzip_txt(archive: &[u8]) -> Result<Vec<u8>,DYNERR> {
    let (_,txt) = container::extract(archive,".txt")?;
    Ok(txt)
}

#[test]
fn huf_zip_txt_chain() {
    let txt = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let huf = huff::encode(txt).expect("compression failed");
    let archive = huf_to_zip(&huf,"sam.huf").expect("conversion failed");
    assert_eq!(zip_to_huf(&archive).expect("conversion failed"),huf);
    assert_eq!(zip_to_txt(&archive).expect("conversion failed"),txt);
    assert_eq!(huf_to_txt(&huf).expect("conversion failed"),txt);
}

#[test]
fn text_archive_skips_codec() {
    let txt = "Sam I am\n".as_bytes();
    let archive = txt_to_zip(txt,"sam.txt").expect("conversion failed");
    assert_eq!(unzip_txt(&archive).expect("conversion failed"),txt);
    // a text entry is not a huf entry
    let err = zip_to_huf(&archive).expect_err("found huf entry");
    assert_eq!(err.downcast_ref::<Error>(),Some(&Error::EntryNotFound));
}

#[test]
fn binary_is_not_text() {
    let huf = huff::encode(&[0xff,0xfe,0x00,0xff]).expect("compression failed");
    let err = huf_to_txt(&huf).expect_err("binary accepted as text");
    assert_eq!(err.downcast_ref::<Error>(),Some(&Error::NotText));
    let err = huf_to_txt("plain text".as_bytes()).expect_err("foreign data accepted");
    assert_eq!(err.downcast_ref::<Error>(),Some(&Error::UnsupportedFormat));
}
