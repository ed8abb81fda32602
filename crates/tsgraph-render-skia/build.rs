// File: crates/tsgraph-render-skia/build.rs
// Summary: Extra system link for skia-bindings on Windows targets.
// Notes:
// - skia-bindings' DirectWrite font manager reads font metadata through the
//   registry API (RegOpenKeyEx and friends) without linking advapi32 itself.
// - Decided by the target, not the host, so cross builds from Linux link it too.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        println!("cargo:rustc-link-lib=advapi32");
    }
}
