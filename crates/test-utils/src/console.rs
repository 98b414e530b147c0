use std::sync::{Arc, Mutex};

use pi_updater::console::Console;

/// Records everything a [`Console`] prints so tests can assert on it.
#[derive(Debug, Clone, Default)]
pub struct ConsoleCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl ConsoleCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A console writing into this capture.
    pub fn console(&self) -> Console {
        Console::with_writer(self.buf.clone())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Byte offset of the first occurrence of `needle`, panicking if absent.
    pub fn position(&self, needle: &str) -> usize {
        let text = self.text();
        text.find(needle)
            .unwrap_or_else(|| panic!("{needle:?} not printed; console was:\n{text}"))
    }
}
