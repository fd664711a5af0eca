//! Feeds arbitrary bytes to the NPDU decoder. Decoding must never panic, and
//! a strictly decoded NPDU must re-encode to exactly the input.
//! Build with: cargo fuzz run fuzz_npdu_decode

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use bacwire_core::encoding::{encode::Encode, options::DecodeOptions, reader::Reader};
#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let mut r = Reader::with_options(data, DecodeOptions::strict());
    if let Ok(npdu) = bacwire_core::npdu::Npdu::decode(&mut r, data.len()) {
        assert_eq!(npdu.bit_len(), r.position() * 8);
        assert_eq!(npdu.to_bytes().unwrap(), data);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run fuzz_npdu_decode");
}
