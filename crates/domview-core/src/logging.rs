//! Logging bootstrap based on `tracing-subscriber`.
//!
//! Native targets log to stdout through the fmt subscriber. In the browser
//! the same subscriber writes to the developer console and panics are
//! forwarded there as well.

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};

/// Install the global subscriber with the default [`Config`].
pub fn init() {
    init_with(&Config::default());
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over [`Config::log_filter`]. Calling this more
/// than once is harmless: later calls leave the first subscriber in place.
pub fn init_with(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    #[cfg(not(target_arch = "wasm32"))]
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi);

    #[cfg(target_arch = "wasm32")]
    let builder = {
        console_error_panic_hook::set_once();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .without_time()
            .with_writer(console::ConsoleWriter::default)
    };

    let result = match config.log_format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    if let Err(err) = result {
        tracing::debug!("logging already initialized: {}", err);
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    /// Buffers one formatted event and hands it to `console.log` on drop.
    #[derive(Default)]
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if self.buf.is_empty() {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&self.buf);
            web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line.trim_end()));
            self.buf.clear();
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let _ = io::Write::flush(self);
        }
    }
}
