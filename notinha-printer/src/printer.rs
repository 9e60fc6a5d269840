//! Printer wrapper
//!
//! Holds whichever platform connection was opened and serializes every
//! write behind a mutex, so two jobs never interleave their bytes.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use crate::connection::{DeviceConnection, open_device};
use crate::error::{PrintError, PrintResult};
use crate::escpos::EscPosBuilder;

/// Width of the fixed test page
const TEST_PAGE_WIDTH: usize = 48;

/// A connected thermal printer
pub struct Printer {
    address: String,
    device: Mutex<Option<Box<dyn DeviceConnection>>>,
    connected: AtomicBool,
}

impl std::fmt::Debug for Printer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Printer")
            .field("address", &self.address)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Printer {
    /// Open the printer at a device path (unix) or printer name (windows)
    #[instrument]
    pub fn open(address: &str) -> PrintResult<Self> {
        let device = open_device(address)?;
        info!("Printer connected");
        Ok(Self::with_connection(address, device))
    }

    /// Wrap an already opened connection
    pub fn with_connection(address: &str, device: Box<dyn DeviceConnection>) -> Self {
        Self {
            address: address.to_string(),
            device: Mutex::new(Some(device)),
            connected: AtomicBool::new(true),
        }
    }

    /// Device path or printer name this printer was opened with
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether a live handle is held. Never blocks on an in-flight job.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Send raw bytes as one job
    #[instrument(skip(self, data), fields(address = %self.address, data_len = data.len()))]
    pub fn write(&self, data: &[u8]) -> PrintResult<()> {
        let mut guard = self.device.lock();
        let device = guard.as_mut().ok_or(PrintError::NotConnected)?;
        device.write(data).inspect_err(|e| {
            warn!(error = %e, "Print job failed");
        })
    }

    /// Send several jobs back to back
    ///
    /// Each slice is its own job, but the device stays locked for the whole
    /// batch so no other job can land between them. Stops at the first
    /// failed job.
    #[instrument(skip(self, jobs), fields(address = %self.address, jobs = jobs.len()))]
    pub fn write_jobs(&self, jobs: &[&[u8]]) -> PrintResult<()> {
        let mut guard = self.device.lock();
        let device = guard.as_mut().ok_or(PrintError::NotConnected)?;
        for data in jobs {
            device.write(data).inspect_err(|e| {
                warn!(error = %e, data_len = data.len(), "Print job failed");
            })?;
        }
        Ok(())
    }

    /// Send the bytes built so far
    pub fn print(&self, builder: &EscPosBuilder) -> PrintResult<()> {
        self.write(builder.as_bytes())
    }

    /// Release the handle. Closing twice is a no-op.
    #[instrument(skip(self), fields(address = %self.address))]
    pub fn close(&self) -> PrintResult<()> {
        let mut guard = self.device.lock();
        let Some(mut device) = guard.take() else {
            return Ok(());
        };
        self.connected.store(false, Ordering::Release);
        info!("Printer disconnected");
        device.close()
    }

    /// Print the fixed test page
    pub fn print_test(&self) -> PrintResult<()> {
        self.print(&test_page())
    }

    /// Pulse the cash drawer
    pub fn open_drawer(&self) -> PrintResult<()> {
        let mut builder = EscPosBuilder::new();
        builder.open_drawer();
        self.print(&builder)
    }
}

impl Drop for Printer {
    fn drop(&mut self) {
        if let Some(mut device) = self.device.get_mut().take()
            && let Err(e) = device.close()
        {
            warn!(address = %self.address, error = %e, "Close on drop failed");
        }
    }
}

fn test_page() -> EscPosBuilder {
    let mut b = EscPosBuilder::new();
    b.center()
        .font_double()
        .bold()
        .line("TESTE DE IMPRESSAO")
        .font_normal()
        .bold_off()
        .line("GoldenSky GS-T80E")
        .separator('-', TEST_PAGE_WIDTH)
        .left()
        .line("Caracteres especiais:")
        .line("áéíóú ÁÉÍÓÚ")
        .line("açúcar café pão não")
        .separator('-', TEST_PAGE_WIDTH)
        .center()
        .line("Impressora funcionando!")
        .feed(4)
        .cut_partial();
    b
}
