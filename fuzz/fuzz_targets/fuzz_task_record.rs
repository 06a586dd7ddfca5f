#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes on disk must load as some task list, never panic.
    let dir = tempfile::tempdir().unwrap();
    let store = hangar::todos::TaskStore::new(dir.path());
    std::fs::write(store.record_path("fuzz"), data).unwrap();
    let _ = store.load("fuzz");
});
