//! Platform printer connections
//!
//! Supports:
//! - Device files such as `/dev/usb/lp0` (unix)
//! - Installed printers through the print spooler (windows)
//!
//! Both variants implement [`DeviceConnection`]; [`open_device`] and
//! [`detect_printers`] pick the one for the build target.

use crate::error::PrintResult;

/// An open, writable printer handle
pub trait DeviceConnection: Send {
    /// Send raw ESC/POS data to the printer
    fn write(&mut self, data: &[u8]) -> PrintResult<()>;

    /// Release the handle
    fn close(&mut self) -> PrintResult<()>;
}

/// Open the printer at `address` using the platform's variant
///
/// The address is a device path on unix and a printer name on windows.
pub fn open_device(address: &str) -> PrintResult<Box<dyn DeviceConnection>> {
    #[cfg(unix)]
    {
        Ok(Box::new(DeviceFile::open(address)?))
    }
    #[cfg(windows)]
    {
        Ok(Box::new(SpoolerConnection::open(address)?))
    }
}

/// Candidate printer addresses; empty when enumeration fails
pub fn detect_printers() -> Vec<String> {
    #[cfg(unix)]
    {
        DeviceFile::detect()
    }
    #[cfg(windows)]
    {
        SpoolerConnection::detect()
    }
}

#[cfg(unix)]
pub use device_file::DeviceFile;

#[cfg(unix)]
mod device_file {
    use super::DeviceConnection;
    use crate::error::{PrintError, PrintResult};
    use std::fs::{File, OpenOptions};
    use std::io::Write;
    use std::path::Path;
    use tracing::{debug, instrument, warn};

    const USB_DEVICE_DIR: &str = "/dev/usb";

    /// Printer exposed as a character device, opened write-only
    #[derive(Debug)]
    pub struct DeviceFile {
        path: String,
        file: Option<File>,
    }

    impl DeviceFile {
        #[instrument]
        pub fn open(path: &str) -> PrintResult<Self> {
            if path.is_empty() {
                return Err(PrintError::InvalidConfig("Empty device path".to_string()));
            }
            let file = OpenOptions::new()
                .write(true)
                .open(path)
                .map_err(|e| PrintError::Connection(format!("{}: {}", path, e)))?;
            debug!("Device opened");
            Ok(Self {
                path: path.to_string(),
                file: Some(file),
            })
        }

        pub fn path(&self) -> &str {
            &self.path
        }

        /// USB line printer devices (`/dev/usb/lp*`), sorted
        pub fn detect() -> Vec<String> {
            Self::detect_in(Path::new(USB_DEVICE_DIR))
        }

        pub(crate) fn detect_in(dir: &Path) -> Vec<String> {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "No printer devices found");
                    return Vec::new();
                }
            };

            let mut found: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_name().to_string_lossy().starts_with("lp"))
                .map(|entry| entry.path().to_string_lossy().into_owned())
                .collect();
            found.sort();
            found
        }
    }

    impl DeviceConnection for DeviceFile {
        fn write(&mut self, data: &[u8]) -> PrintResult<()> {
            let file = self.file.as_mut().ok_or(PrintError::NotConnected)?;
            file.write_all(data)?;
            file.flush()?;
            Ok(())
        }

        fn close(&mut self) -> PrintResult<()> {
            if let Some(file) = self.file.take() {
                if let Err(e) = file.sync_all() {
                    // Character devices commonly reject fsync
                    warn!(path = %self.path, error = %e, "Device sync failed on close");
                }
            }
            Ok(())
        }
    }
}

#[cfg(windows)]
pub use spooler::SpoolerConnection;

#[cfg(windows)]
mod spooler {
    use super::DeviceConnection;
    use crate::error::{PrintError, PrintResult};
    use tracing::{debug, instrument, warn};
    use windows::Win32::Graphics::Printing::{
        ClosePrinter, GetPrinterW, OpenPrinterW, PRINTER_HANDLE, PRINTER_INFO_6,
        PRINTER_STATUS_ERROR, PRINTER_STATUS_NOT_AVAILABLE, PRINTER_STATUS_OFFLINE,
    };
    use windows::core::PCWSTR;

    const STATUS_MASK: u32 =
        PRINTER_STATUS_ERROR | PRINTER_STATUS_OFFLINE | PRINTER_STATUS_NOT_AVAILABLE;

    const DOC_NAME: &str = "Notinha POS";

    fn to_wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    /// Installed printer reached through the Windows print spooler
    pub struct SpoolerConnection {
        name: String,
        handle: Option<PRINTER_HANDLE>,
    }

    // SAFETY: the spooler handle is only used through `&mut self`, and the
    // owning `Printer` serializes every access behind its mutex.
    unsafe impl Send for SpoolerConnection {}

    impl SpoolerConnection {
        /// Open the printer and verify it is actually reachable
        ///
        /// `OpenPrinterW` succeeds for any installed driver even when the
        /// device is unplugged, so the status flags are probed right away and
        /// the handle is released if the printer is not usable.
        #[instrument]
        pub fn open(name: &str) -> PrintResult<Self> {
            if name.is_empty() {
                return Err(PrintError::InvalidConfig("Empty printer name".to_string()));
            }

            let mut handle = PRINTER_HANDLE::default();
            let name_w = to_wide(name);
            unsafe { OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None) }
                .map_err(|e| PrintError::Connection(format!("{}: {}", name, e)))?;

            let conn = Self {
                name: name.to_string(),
                handle: Some(handle),
            };

            // Dropping `conn` on the error paths releases the handle
            let status = conn.status(handle)?;
            if status & STATUS_MASK != 0 {
                return Err(PrintError::Offline(format!(
                    "{} (status: 0x{:X})",
                    name, status
                )));
            }
            debug!("Spooler handle opened");
            Ok(conn)
        }

        pub fn name(&self) -> &str {
            &self.name
        }

        /// Status flags from `PRINTER_INFO_6`
        fn status(&self, handle: PRINTER_HANDLE) -> PrintResult<u32> {
            let mut needed: u32 = 0;
            unsafe {
                let _ = GetPrinterW(handle, 6, None, &mut needed);
                if needed == 0 {
                    return Err(PrintError::Offline(format!(
                        "{}: no status reported",
                        self.name
                    )));
                }

                let mut buf: Vec<u8> = vec![0; needed as usize];
                GetPrinterW(handle, 6, Some(buf.as_mut_slice()), &mut needed).map_err(|e| {
                    PrintError::WindowsPrinter(format!("GetPrinterW failed: {}", e))
                })?;
                let info = std::ptr::read_unaligned(buf.as_ptr() as *const PRINTER_INFO_6);
                Ok(info.dwStatus)
            }
        }

        /// Locally installed printers, skipping virtual ports
        pub fn detect() -> Vec<String> {
            match list_printers() {
                Ok(printers) => printers,
                Err(e) => {
                    warn!(error = %e, "Printer enumeration failed");
                    Vec::new()
                }
            }
        }
    }

    impl DeviceConnection for SpoolerConnection {
        /// One spooler job per write: StartDoc, StartPage, payload, EndPage, EndDoc
        ///
        /// A failure at any stage still ends the stages already started.
        fn write(&mut self, data: &[u8]) -> PrintResult<()> {
            use core::ffi::c_void;
            use windows::Win32::Graphics::Printing::{
                DOC_INFO_1W, EndDocPrinter, EndPagePrinter, StartDocPrinterW, StartPagePrinter,
                WritePrinter,
            };
            use windows::core::PWSTR;

            let handle = self.handle.ok_or(PrintError::NotConnected)?;
            if data.is_empty() {
                return Ok(());
            }

            let doc_name_w = to_wide(DOC_NAME);
            let datatype_w = to_wide("RAW");
            let doc_info = DOC_INFO_1W {
                pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
                pOutputFile: PWSTR::null(),
                pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
            };

            unsafe {
                if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                    return Err(PrintError::WindowsPrinter(
                        "StartDocPrinter failed".to_string(),
                    ));
                }

                if !StartPagePrinter(handle).as_bool() {
                    let _ = EndDocPrinter(handle);
                    return Err(PrintError::WindowsPrinter(
                        "StartPagePrinter failed".to_string(),
                    ));
                }

                let mut written: u32 = 0;
                let ok = WritePrinter(
                    handle,
                    data.as_ptr() as *const c_void,
                    data.len() as u32,
                    &mut written,
                );

                let _ = EndPagePrinter(handle);
                let _ = EndDocPrinter(handle);

                if !ok.as_bool() {
                    return Err(PrintError::WindowsPrinter(
                        "WritePrinter failed".to_string(),
                    ));
                }
                if written != data.len() as u32 {
                    return Err(PrintError::WindowsPrinter("Incomplete write".to_string()));
                }
            }
            Ok(())
        }

        fn close(&mut self) -> PrintResult<()> {
            if let Some(handle) = self.handle.take() {
                unsafe { ClosePrinter(handle) }.map_err(|e| {
                    PrintError::WindowsPrinter(format!("ClosePrinter failed: {}", e))
                })?;
            }
            Ok(())
        }
    }

    impl Drop for SpoolerConnection {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                release(handle);
            }
        }
    }

    fn release(handle: PRINTER_HANDLE) {
        let _ = unsafe { ClosePrinter(handle) };
    }

    fn list_printers() -> PrintResult<Vec<String>> {
        use windows::Win32::Graphics::Printing::{
            EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_5W,
        };
        use windows::core::PWSTR;

        unsafe {
            let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;

            let _ = EnumPrintersW(flags, None, 5, None, &mut needed, &mut returned);
            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumPrintersW(
                flags,
                None,
                5,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|e| PrintError::WindowsPrinter(format!("EnumPrintersW failed: {}", e)))?;

            let ptr = buf.as_ptr() as *const PRINTER_INFO_5W;
            let slice = std::slice::from_raw_parts(ptr, returned as usize);

            let mut result = Vec::new();
            for info in slice {
                if info.pPrinterName.is_null() {
                    continue;
                }
                let name = PWSTR(info.pPrinterName.0).to_string().unwrap_or_default();
                let port = if info.pPortName.is_null() {
                    String::new()
                } else {
                    PWSTR(info.pPortName.0).to_string().unwrap_or_default()
                };
                if !is_virtual_port(&port) {
                    result.push(name);
                }
            }
            Ok(result)
        }
    }

    /// PDF, XPS, OneNote and similar software printers
    fn is_virtual_port(port: &str) -> bool {
        let p = port.to_lowercase();
        p == "file:"
            || p == "portprompt:"
            || p == "xpsport:"
            || p.starts_with("onenote")
            || p == "nul:"
            || p.starts_with("wfsport:")
    }
}
