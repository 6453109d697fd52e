#![no_main]

use libfuzzer_sys::fuzz_target;
use zui::drawlist::Decoder;

fuzz_target!(|data: &[u8]| {
    let Ok(decoder) = Decoder::new(data) else { return };
    for command in decoder.commands() {
        if command.is_err() {
            break;
        }
    }
});
