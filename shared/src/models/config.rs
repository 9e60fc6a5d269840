//! Persisted configuration record
//!
//! Loaded from `config.json`. Any field missing from the file (including
//! whole sections written by older versions) falls back to its default.

use serde::{Deserialize, Serialize};

/// Default paper width in characters (80mm paper)
pub const DEFAULT_CHARS_PER_LINE: usize = 48;

#[cfg(not(windows))]
const DEFAULT_PRINTER_PATH: &str = "/dev/usb/lp0";
#[cfg(windows)]
const DEFAULT_PRINTER_PATH: &str = "";

/// Restaurant identity printed on receipts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Tax identification number
    pub cnpj: String,
    pub footer: String,
}

impl Default for RestaurantInfo {
    fn default() -> Self {
        Self {
            name: "Meu Restaurante".to_string(),
            address: String::new(),
            phone: String::new(),
            cnpj: String::new(),
            footer: "Obrigado pela preferencia!".to_string(),
        }
    }
}

/// Printer address and paper geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Device file path (unix) or spooler printer name (windows)
    pub device_path: String,
    pub chars_per_line: usize,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            device_path: DEFAULT_PRINTER_PATH.to_string(),
            chars_per_line: DEFAULT_CHARS_PER_LINE,
        }
    }
}

impl PrinterConfig {
    /// Paper width, falling back to the default for a zero width
    pub fn width(&self) -> usize {
        paper_width(self.chars_per_line)
    }
}

/// Map an unset (zero) paper width to [`DEFAULT_CHARS_PER_LINE`]
pub fn paper_width(chars_per_line: usize) -> usize {
    if chars_per_line == 0 {
        DEFAULT_CHARS_PER_LINE
    } else {
        chars_per_line
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub restaurant: RestaurantInfo,
    pub printer: PrinterConfig,
    /// Last issued order number
    pub order_counter: i64,
    /// Print a kitchen ticket after each receipt
    pub kitchen_ticket: bool,
}
