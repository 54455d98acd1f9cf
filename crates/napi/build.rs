fn main() {
    // Builds outside the napi CLI do not export its version.
    if std::env::var_os("NAPI_RS_CLI_VERSION").is_none() {
        println!("cargo:rustc-env=NAPI_RS_CLI_VERSION=cargo");
    }

    napi_build::setup();
}
