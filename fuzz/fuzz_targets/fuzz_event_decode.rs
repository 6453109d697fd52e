#![no_main]

use libfuzzer_sys::fuzz_target;
use zui::event::Decoder;

fuzz_target!(|data: &[u8]| {
    let Ok(decoder) = Decoder::new(data) else { return };
    let _ = decoder.events();
});
