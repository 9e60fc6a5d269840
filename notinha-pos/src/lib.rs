//! Notinha POS - restaurant point-of-sale back end
//!
//! Takes orders, settles them (single or split payment, cash change),
//! keeps one order file per day and prints receipts, kitchen tickets and
//! day summaries on an ESC/POS thermal printer.
//!
//! # Module layout
//!
//! ```text
//! notinha-pos/src/
//! ├── core/        # process settings
//! ├── storage/     # config, menu and order files (atomic writes)
//! ├── printing/    # receipt, kitchen ticket and summary renderers
//! ├── services/    # checkout service and printer ownership
//! └── utils/       # logger
//! ```

pub mod core;
pub mod printing;
pub mod services;
pub mod storage;
pub mod utils;

pub use core::Settings;
pub use services::{Checkout, PosError, PosResult, PosService, Settlement};
pub use storage::{ConfigStore, MenuStore, OrderStore, StorageError, StorageResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, read settings and install the logger
pub fn setup_environment() -> Settings {
    // A missing .env file is fine
    let _ = dotenv::dotenv();

    let settings = Settings::from_env();
    init_logger_with_file(Some(&settings.log_level), settings.log_dir.as_deref());
    settings
}
