//! Feeds arbitrary bytes to the tag and constructed-data decoders. Decoding
//! must never panic, and whatever decodes strictly must re-encode to exactly
//! the input.
//! Build with: cargo fuzz run fuzz_tag_decode

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use bacwire_core::encoding::{encode::Encode, options::DecodeOptions, reader::Reader};
#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let mut r = Reader::with_options(data, DecodeOptions::strict());
    if let Ok(elements) = bacwire_core::encoding::constructed::decode_elements(&mut r) {
        assert_eq!(elements.bit_len(), r.position() * 8);
        assert_eq!(elements.to_bytes().unwrap(), data);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run fuzz_tag_decode");
}
