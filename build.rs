// Build script for linking the native communications library
//
// The native engine ships as a prebuilt library (libcomms_native). It is only
// linked when the `native-link` feature is enabled; default builds use the
// in-process stub engine and need nothing from this script.
//
// Point COMMS_NATIVE_LIB_DIR at the directory holding the library:
//   COMMS_NATIVE_LIB_DIR=/opt/comms/lib cargo build --features native-link

fn main() {
    println!("cargo:rerun-if-env-changed=COMMS_NATIVE_LIB_DIR");

    if std::env::var_os("CARGO_FEATURE_NATIVE_LINK").is_none() {
        return;
    }

    if let Ok(dir) = std::env::var("COMMS_NATIVE_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir);
    }

    // The native engine is C++ underneath; Android needs the shared runtime
    // so symbols like __cxa_pure_virtual resolve on all ABIs.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("android") {
        println!("cargo:rustc-link-lib=c++_shared");
    }
}
