#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let doc = hangar::document::parse(text);
    let out = hangar::document::serialize(&doc);
    assert_eq!(hangar::document::parse(&out), doc);
});
