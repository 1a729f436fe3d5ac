//! Decoder fuzz target: feed arbitrary bytes to the action decoder.
//! Decoding must never panic or read out of bounds; it returns Ok(Action)
//! or Err(CodecError). Build with: cargo fuzz run decode_fuzz.

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    if let Ok(action) = ofactions::Action::decode(data) {
        // Whatever decodes must re-encode without panicking.
        let _ = action.encode();
    }
    let _ = ofactions::decode_sequence(data);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
