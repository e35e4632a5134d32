// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

pub(crate) fn init_with_level(crates: &[&'static str], log_level: log::LevelFilter) {
    let filter_string = crate::filter_string(crates, log_level);

    // Use env_logger's builder API to avoid unsafe set_var call.  `try_init` so that a second
    // initialization (e.g. from tests) is harmless.
    let result = if std::env::var("RUST_LOG").is_err() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&filter_string))
            .try_init()
    } else {
        env_logger::try_init()
    };
    if result.is_err() {
        log::debug!("logger already initialized");
    }
}

// End of File
