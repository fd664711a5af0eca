//! Feeds arbitrary datagrams to the BVLC decoder. Decoding must never panic,
//! and a strictly decoded frame must re-encode to the octets its length
//! field covers.
//! Build with: cargo fuzz run fuzz_bvlc_decode

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use bacwire_core::encoding::{encode::Encode, options::DecodeOptions, reader::Reader};
#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let mut r = Reader::with_options(data, DecodeOptions::strict());
    if let Ok(frame) = bacwire_datalink::Bvlc::decode(&mut r) {
        let consumed = r.position();
        assert_eq!(frame.length(), consumed);
        assert_eq!(frame.bit_len(), consumed * 8);
        assert_eq!(frame.to_bytes().unwrap(), &data[..consumed]);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run fuzz_bvlc_decode");
}
