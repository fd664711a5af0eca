//! Feeds arbitrary bytes to the APDU decoder. Decoding must never panic, and
//! a strictly decoded APDU must re-encode to exactly the input.
//! Build with: cargo fuzz run fuzz_apdu_decode

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use bacwire_core::encoding::{encode::Encode, options::DecodeOptions, reader::Reader};
#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let mut r = Reader::with_options(data, DecodeOptions::strict());
    if let Ok(apdu) = bacwire_core::apdu::Apdu::decode(&mut r, data.len()) {
        assert_eq!(apdu.bit_len(), r.position() * 8);
        assert_eq!(apdu.to_bytes().unwrap(), data);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run fuzz_apdu_decode");
}
