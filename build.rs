fn main() {
    // Build date shown in the console banner
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=E2G_BUILD_DATE={}", build_date);
    println!("cargo:rerun-if-changed=build.rs");
}
