//! # notinha-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - WPC1252 encoding for accented Latin text
//! - Device file printing (unix, e.g. `/dev/usb/lp0`)
//! - Spooler printing (windows)
//!
//! Business logic (WHAT to print) stays in application code:
//! receipts, kitchen tickets and day summaries are rendered in notinha-pos.
//!
//! ## Example
//!
//! ```ignore
//! use notinha_printer::{EscPosBuilder, Printer};
//!
//! let mut builder = EscPosBuilder::new();
//! builder.center().font_double().line("Cantina").font_normal();
//! builder.separator('-', 48).left().line("Pedido: #12");
//! builder.feed(4).cut_partial();
//!
//! let printer = Printer::open("/dev/usb/lp0")?;
//! printer.print(&builder)?;
//! ```

mod connection;
mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use connection::{DeviceConnection, detect_printers, open_device};
pub use encoding::{encode_text, pad_left, pad_right, text_width, truncate_width};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::Printer;

#[cfg(unix)]
pub use connection::DeviceFile;

#[cfg(windows)]
pub use connection::SpoolerConnection;
