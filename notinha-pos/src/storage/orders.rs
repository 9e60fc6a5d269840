//! Date-partitioned order history
//!
//! One file per calendar day, `orders_<YYYY-MM-DD>.json`, holding that day's
//! closed orders in the order they were saved. Files are append-only: a
//! saved order is never rewritten.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use shared::Order;
use tracing::{debug, info, instrument};

use super::atomic::{atomic_write_json, read_json};
use super::error::{StorageError, StorageResult};

const FILE_PREFIX: &str = "orders_";
const FILE_SUFFIX: &str = ".json";

/// Store for closed orders
#[derive(Debug)]
pub struct OrderStore {
    dir: PathBuf,
    /// Serializes read-modify-write of day files
    lock: Mutex<()>,
}

impl OrderStore {
    /// Open the store, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn day_path(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{date}{FILE_SUFFIX}"))
    }

    /// Append a closed order to the file of the day it was closed
    ///
    /// Returns the ISO date the order was filed under.
    #[instrument(skip(self, order), fields(order_number = order.number))]
    pub fn save_order(&self, order: &Order) -> StorageResult<String> {
        let date = order.closed_date().unwrap_or_else(Self::today);
        let path = self.day_path(&date);

        let _guard = self.lock.lock();
        let mut orders: Vec<Order> = read_json(&path)?.unwrap_or_default();
        orders.push(order.clone());
        atomic_write_json(&path, &orders)?;

        info!(date = %date, day_count = orders.len(), "Order saved");
        Ok(date)
    }

    /// Orders of one day; a day without a file has no orders
    pub fn load_day_orders(&self, date: &str) -> StorageResult<Vec<Order>> {
        let path = self.day_path(date);
        let _guard = self.lock.lock();
        let orders: Vec<Order> = read_json(&path)?.unwrap_or_default();
        debug!(date = %date, count = orders.len(), "Loaded day orders");
        Ok(orders)
    }

    /// Dates that have an order file, newest first
    pub fn list_order_dates(&self) -> StorageResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.dir, e)),
        };

        let mut dates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.strip_prefix(FILE_PREFIX)?
                    .strip_suffix(FILE_SUFFIX)
                    .map(str::to_string)
            })
            .collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        Ok(dates)
    }

    /// Today's local date (`YYYY-MM-DD`)
    pub fn today() -> String {
        shared::util::today_iso()
    }
}
