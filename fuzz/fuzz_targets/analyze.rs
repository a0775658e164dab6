#![no_main]

use bhs::analyze;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let analysis = analyze(s);
        if let Some(index) = &analysis.index {
            // Resolve at every char boundary, including the ends
            for offset in (0..=s.len()).filter(|&i| s.is_char_boundary(i)) {
                let _ = index.visible_at(offset);
            }
        }
    }
});
