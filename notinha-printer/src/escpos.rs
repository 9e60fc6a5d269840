//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::encoding::encode_text;

/// ESC @ - Initialize printer
const INIT: [u8; 2] = [0x1B, 0x40];
/// ESC t 16 - Select code table WPC1252
const CODE_PAGE_WPC1252: [u8; 3] = [0x1B, 0x74, 0x10];
const LINE_FEED: u8 = 0x0A;

/// ESC/POS command builder
///
/// Append-only byte buffer. A fresh builder always starts with a printer
/// reset followed by the code table selection, so accented Portuguese text
/// prints correctly. Building is deterministic: the same sequence of calls
/// always yields the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(&INIT);
        buf.extend_from_slice(&CODE_PAGE_WPC1252);
        Self { buf }
    }

    /// Re-send the printer reset and code table selection
    pub fn init(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&INIT);
        self.buf.extend_from_slice(&CODE_PAGE_WPC1252);
        self
    }

    // === Text Output ===

    /// Write text encoded for the selected code table
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(&encode_text(s));
        self
    }

    /// Write text followed by a line feed
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(LINE_FEED);
        self
    }

    /// Print and feed `lines` lines
    ///
    /// Only 1..=255 is meaningful to the printer; anything else is ignored.
    pub fn feed(&mut self, lines: usize) -> &mut Self {
        if let Ok(n @ 1..=255) = u8::try_from(lines) {
            // ESC d n
            self.buf.extend_from_slice(&[0x1B, 0x64, n]);
        }
        self
    }

    /// A full line of `ch` repeated `width` times
    pub fn separator(&mut self, ch: char, width: usize) -> &mut Self {
        self.line(&ch.to_string().repeat(width))
    }

    // === Alignment ===

    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    pub fn right(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x02]);
        self
    }

    // === Text Style ===

    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// ESC ! 0 - Normal font
    pub fn font_normal(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x21, 0x00]);
        self
    }

    /// ESC ! 0x30 - Double width and height
    pub fn font_double(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x21, 0x30]);
        self
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    /// Partial cut (leave a small connection)
    pub fn cut_partial(&mut self) -> &mut Self {
        // GS V 1
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x01]);
        self
    }

    // === Cash Drawer ===

    /// Open cash drawer (pin 2)
    pub fn open_drawer(&mut self) -> &mut Self {
        // ESC p m t1 t2 - Generate pulse on pin m
        self.buf.extend_from_slice(&[0x1B, 0x70, 0x00, 25, 250]);
        self
    }

    // === Build ===

    /// Copy of the bytes built so far
    pub fn build(&self) -> Vec<u8> {
        self.buf.clone()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Clear the buffer back to the freshly constructed state
    pub fn reset(&mut self) -> &mut Self {
        self.buf.clear();
        self.init()
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}
