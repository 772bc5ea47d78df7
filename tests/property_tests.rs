use huffpress::{container,huff,Error};
use huffpress::huff::Header;
use proptest::prelude::*;

proptest! {
    #[test]
    fn roundtrip(bytes in proptest::collection::vec(any::<u8>(),0..4096)) {
        let compressed = huff::encode(&bytes).expect("compression failed");
        prop_assert_eq!(huff::decode(&compressed),Ok(bytes));
    }

    #[test]
    fn roundtrip_few_symbols(bytes in proptest::collection::vec(0u8..3,0..4096)) {
        let compressed = huff::encode(&bytes).expect("compression failed");
        prop_assert_eq!(huff::decode(&compressed),Ok(bytes));
    }

    #[test]
    fn deterministic(bytes in proptest::collection::vec(any::<u8>(),0..2048)) {
        prop_assert_eq!(huff::encode(&bytes),huff::encode(&bytes));
    }

    #[test]
    fn header_counts_input(bytes in proptest::collection::vec(any::<u8>(),0..2048)) {
        let compressed = huff::encode(&bytes).expect("compression failed");
        let (header,offset) = Header::parse(&compressed).expect("parse failed");
        prop_assert_eq!(header.symbol_count(),bytes.len() as u64);
        prop_assert_eq!((compressed.len() - offset) as u64,(header.bit_count + 7) / 8);
        if bytes.len() > 0 {
            prop_assert!(header.bit_count >= bytes.len() as u64);
        }
    }

    #[test]
    fn truncation_is_an_error(bytes in proptest::collection::vec(any::<u8>(),0..1024)) {
        let compressed = huff::encode(&bytes).expect("compression failed");
        prop_assert_eq!(huff::decode(&compressed[0..compressed.len()-1]),Err(Error::TruncatedStream));
    }

    #[test]
    fn container_roundtrip(bytes in proptest::collection::vec(any::<u8>(),0..1024)) {
        let compressed = huff::encode(&bytes).expect("compression failed");
        let archive = container::wrap(&compressed,"data.huf").expect("wrap failed");
        let (_,extracted) = container::extract(&archive,".huf").expect("extract failed");
        prop_assert_eq!(extracted,compressed);
    }
}
