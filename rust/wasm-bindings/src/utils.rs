// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Display;

use wasm_bindgen::JsError;

/// Set panic hook for better error messages in the browser
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Contract violations surface in JavaScript as thrown `Error`s
#[inline]
pub(crate) fn js_error(err: impl Display) -> JsError {
    JsError::new(&err.to_string())
}
