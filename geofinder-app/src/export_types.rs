use std::borrow::Cow;

use geofinder_app_lib::mk_specta;
use specta_typescript::Typescript;

const DEFAULT_PATH: &str = "bindings.ts";

pub fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PATH.to_string());
    let mut lang = Typescript::new();
    lang.header = Cow::Borrowed("/* eslint @typescript-eslint/no-unused-vars: 0 */");
    mk_specta()
        .export(lang, &path)
        .expect("Failed to export bindings");
    println!("Wrote GeoFinder bindings to {path}");
}
