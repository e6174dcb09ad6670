// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BIM2GIS WebAssembly Bindings
//!
//! JavaScript/TypeScript API for placing IFC models on a map, built with
//! wasm-bindgen.

use wasm_bindgen::prelude::*;

#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

mod api;
mod utils;

pub use api::{direction_to_degrees, utm_zone, GeoPlacer, GeoPoseJs, GeoReferenceJs};
pub use utils::set_panic_hook as init_panic_hook;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the version of BIM2GIS
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
