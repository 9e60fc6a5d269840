//! Point-of-sale service
//!
//! Owns the config, menu and order stores plus the shared printer handle.
//! The caller owns the live order; this service only sequences what happens
//! when it is closed:
//!
//! ```text
//! validate ─▶ finalize ─▶ persist (blocking task, awaited)
//!                            │
//!                            ├─ printer connected ─▶ background print task
//!                            └─ no printer ────────▶ fallback notice
//! ```

use std::sync::Arc;

use notinha_printer::{PrintError, PrintResult, Printer, detect_printers};
use parking_lot::RwLock;
use shared::{DaySummary, Order, PaymentMethod, PaymentSplit, compute_day_summary, format_brl};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::error::{PosError, PosResult};
use crate::core::Settings;
use crate::printing::{
    ReceiptData, SummaryReceiptData, render_day_summary, render_kitchen_ticket, render_receipt,
};
use crate::storage::{ConfigStore, MenuStore, OrderStore};

/// How an order is being paid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Whole total with one method
    Single {
        method: PaymentMethod,
        /// Cash handed over, zero when not recorded
        cash_received: i64,
    },
    /// Breakdown across methods; amounts must add up to the order total
    Split {
        payments: Vec<PaymentSplit>,
        cash_received: i64,
    },
}

impl Settlement {
    pub fn single(method: PaymentMethod) -> Self {
        Self::Single {
            method,
            cash_received: 0,
        }
    }
}

/// Outcome of a successful checkout
///
/// The order is already persisted in both cases.
#[derive(Debug)]
pub enum Checkout {
    /// Receipt (and kitchen ticket) are being printed in the background
    Printing(JoinHandle<PrintResult<()>>),
    /// No printer connected; the operator should be told the sale was saved
    PrinterOffline { number: i64, total: i64 },
}

impl Checkout {
    /// Notice shown when there is nothing to print on
    pub fn offline_notice(&self) -> Option<String> {
        match self {
            Self::PrinterOffline { number, total } => Some(format!(
                "Pedido #{} finalizado - {}\n(impressora nao conectada)",
                number,
                format_brl(*total)
            )),
            Self::Printing(_) => None,
        }
    }
}

/// Point-of-sale service
#[derive(Debug)]
pub struct PosService {
    config: Arc<ConfigStore>,
    menu: Arc<MenuStore>,
    orders: Arc<OrderStore>,
    printer: RwLock<Option<Arc<Printer>>>,
}

impl PosService {
    /// Open all stores under the settings' data directory
    ///
    /// No printer is connected yet; call [`connect_printer`](Self::connect_printer).
    #[instrument(skip(settings), fields(data_dir = %settings.data_dir().display()))]
    pub fn open(settings: &Settings) -> PosResult<Self> {
        let config = ConfigStore::load(settings.config_path())?;
        let menu = MenuStore::load(settings.menu_path())?;
        let orders = OrderStore::open(settings.orders_dir())?;
        info!("POS service ready");

        Ok(Self {
            config: Arc::new(config),
            menu: Arc::new(menu),
            orders: Arc::new(orders),
            printer: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn menu(&self) -> &MenuStore {
        &self.menu
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    // ========== Printer ==========

    /// Connect to the configured printer, falling back to detection
    ///
    /// A printer found by detection becomes the configured one. Returns the
    /// address now in use.
    #[instrument(skip(self))]
    pub async fn connect_printer(&self) -> PosResult<String> {
        let configured = self.config.snapshot().printer.device_path;
        let (printer, detected) =
            tokio::task::spawn_blocking(move || open_first_available(&configured)).await??;

        let address = printer.address().to_string();
        if detected {
            let saved = address.clone();
            self.config.update(|config| config.printer.device_path = saved)?;
            info!(address = %address, "Saved detected printer to config");
        }

        self.attach_printer(printer);
        Ok(address)
    }

    /// Close the current printer, then connect again
    pub async fn reconnect_printer(&self) -> PosResult<String> {
        let current = self.printer.write().take();
        if let Some(printer) = current {
            let address = printer.address().to_string();
            let closed = tokio::task::spawn_blocking(move || printer.close()).await?;
            if let Err(e) = closed {
                warn!(address = %address, error = %e, "Closing printer failed");
            }
        }
        self.connect_printer().await
    }

    /// Use an already opened printer, replacing any current one
    pub fn attach_printer(&self, printer: Printer) {
        *self.printer.write() = Some(Arc::new(printer));
    }

    /// Address of the live printer, `None` when disconnected
    pub fn printer_status(&self) -> Option<String> {
        self.live_printer().map(|p| p.address().to_string())
    }

    fn live_printer(&self) -> Option<Arc<Printer>> {
        self.printer
            .read()
            .as_ref()
            .filter(|p| p.is_connected())
            .cloned()
    }

    fn require_printer(&self) -> PosResult<Arc<Printer>> {
        self.live_printer().ok_or(PosError::PrinterNotConnected)
    }

    /// Print the fixed test page
    pub async fn print_test(&self) -> PosResult<()> {
        let printer = self.require_printer()?;
        tokio::task::spawn_blocking(move || printer.print_test()).await??;
        Ok(())
    }

    /// Pulse the cash drawer
    pub async fn open_drawer(&self) -> PosResult<()> {
        let printer = self.require_printer()?;
        tokio::task::spawn_blocking(move || printer.open_drawer()).await??;
        Ok(())
    }

    // ========== Orders ==========

    /// Start an order with the next number from the persisted counter
    pub async fn new_order(&self) -> PosResult<Order> {
        let config = Arc::clone(&self.config);
        let number = tokio::task::spawn_blocking(move || config.next_order_number()).await??;
        debug!(order_number = number, "Order started");
        Ok(Order::new(number))
    }

    /// Close an order as paid, persist it and print its receipt
    ///
    /// Invalid requests are rejected before the order is touched. Once the
    /// order is saved, printing problems never undo the sale: they are
    /// reported through the returned task handle.
    #[instrument(skip(self, order, settlement), fields(order_number = order.number))]
    pub async fn finalize_order(
        &self,
        order: &mut Order,
        settlement: Settlement,
    ) -> PosResult<Checkout> {
        if !order.is_open() {
            return Err(PosError::validation(format!(
                "Order #{} is already {}",
                order.number, order.status
            )));
        }
        if order.items.is_empty() {
            return Err(PosError::validation(format!(
                "Order #{} has no items",
                order.number
            )));
        }

        // Close a copy so a failed save leaves the caller's order open
        let mut closed = order.clone();
        match settlement {
            Settlement::Single {
                method,
                cash_received,
            } => {
                closed.cash_received = cash_received;
                closed.finalize(method);
            }
            Settlement::Split {
                payments,
                cash_received,
            } => {
                if payments.is_empty() {
                    return Err(PosError::validation("Split payment has no parts"));
                }
                let paid: i64 = payments.iter().map(|p| p.amount).sum();
                if paid != closed.total() {
                    return Err(PosError::validation(format!(
                        "Split payments add up to {}, order total is {}",
                        format_brl(paid),
                        format_brl(closed.total())
                    )));
                }
                closed.cash_received = cash_received;
                closed.finalize_split(payments);
            }
        }

        self.persist(&closed).await?;
        *order = closed;
        info!(
            total = order.total(),
            payment = %order.payment,
            split = order.is_split_payment(),
            "Order finalized"
        );

        let Some(printer) = self.live_printer() else {
            warn!("No printer connected, receipt not printed");
            return Ok(Checkout::PrinterOffline {
                number: order.number,
                total: order.total(),
            });
        };

        let config = self.config.snapshot();
        let data = ReceiptData {
            restaurant: &config.restaurant,
            order: &*order,
            chars_per_line: config.printer.width(),
        };
        let receipt = render_receipt(&data);
        let kitchen = config.kitchen_ticket.then(|| render_kitchen_ticket(&data));
        let number = order.number;

        let handle = tokio::task::spawn_blocking(move || {
            print_order_jobs(&printer, number, &receipt, kitchen.as_deref())
        });
        Ok(Checkout::Printing(handle))
    }

    /// Cancel an open order and persist it
    #[instrument(skip(self, order), fields(order_number = order.number))]
    pub async fn cancel_order(&self, order: &mut Order) -> PosResult<()> {
        if !order.is_open() {
            return Err(PosError::validation(format!(
                "Order #{} is already {}",
                order.number, order.status
            )));
        }
        let mut closed = order.clone();
        closed.cancel();
        self.persist(&closed).await?;
        *order = closed;
        info!("Order cancelled");
        Ok(())
    }

    async fn persist(&self, order: &Order) -> PosResult<String> {
        let store = Arc::clone(&self.orders);
        let snapshot = order.clone();
        let date = tokio::task::spawn_blocking(move || store.save_order(&snapshot)).await??;
        Ok(date)
    }

    // ========== Reports ==========

    /// Stored orders of one ISO date, in the order they were saved
    pub async fn day_orders(&self, date: &str) -> PosResult<Vec<Order>> {
        let store = Arc::clone(&self.orders);
        let date = date.to_string();
        let orders = tokio::task::spawn_blocking(move || store.load_day_orders(&date)).await??;
        Ok(orders)
    }

    /// Dates that have stored orders, newest first
    pub async fn order_dates(&self) -> PosResult<Vec<String>> {
        let store = Arc::clone(&self.orders);
        let dates = tokio::task::spawn_blocking(move || store.list_order_dates()).await??;
        Ok(dates)
    }

    pub async fn day_summary(&self, date: &str) -> PosResult<DaySummary> {
        let orders = self.day_orders(date).await?;
        Ok(compute_day_summary(date, &orders))
    }

    /// Print the summary of one day and wait for the job to finish
    #[instrument(skip(self))]
    pub async fn print_day_summary(&self, date: &str) -> PosResult<DaySummary> {
        let printer = self.require_printer()?;
        let summary = self.day_summary(date).await?;

        let config = self.config.snapshot();
        let bytes = render_day_summary(&SummaryReceiptData {
            restaurant: &config.restaurant,
            summary: &summary,
            chars_per_line: config.printer.width(),
        });
        tokio::task::spawn_blocking(move || printer.write(&bytes)).await??;
        info!(orders = summary.total_orders, "Day summary printed");
        Ok(summary)
    }
}

/// Try `configured` first, then every detected address
///
/// The flag is true when the printer came from detection.
fn open_first_available(configured: &str) -> PrintResult<(Printer, bool)> {
    if !configured.is_empty() {
        match Printer::open(configured) {
            Ok(printer) => return Ok((printer, false)),
            Err(e) => warn!(address = configured, error = %e, "Configured printer unavailable"),
        }
    }

    let mut last_error = None;
    for address in detect_printers() {
        if address == configured {
            continue;
        }
        match Printer::open(&address) {
            Ok(printer) => return Ok((printer, true)),
            Err(e) => {
                debug!(address = %address, error = %e, "Detected printer unavailable");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| PrintError::Connection("no printer found".to_string())))
}

/// Receipt first, then the kitchen ticket as a second job under the same lock
fn print_order_jobs(
    printer: &Printer,
    number: i64,
    receipt: &[u8],
    kitchen: Option<&[u8]>,
) -> PrintResult<()> {
    let mut jobs = vec![receipt];
    jobs.extend(kitchen);
    let result = printer.write_jobs(&jobs);

    match &result {
        Ok(()) => info!(order_number = number, kitchen = kitchen.is_some(), "Receipt printed"),
        Err(e) => error!(order_number = number, error = %e, "Receipt printing failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use notinha_printer::DeviceConnection;
    use parking_lot::Mutex;
    use shared::{MenuItem, OrderStatus};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Recorder {
        jobs: Arc<Mutex<Vec<Vec<u8>>>>,
        fail: bool,
    }

    impl DeviceConnection for Recorder {
        fn write(&mut self, data: &[u8]) -> PrintResult<()> {
            if self.fail {
                return Err(PrintError::Offline("paper out".to_string()));
            }
            self.jobs.lock().push(data.to_vec());
            Ok(())
        }

        fn close(&mut self) -> PrintResult<()> {
            Ok(())
        }
    }

    fn service() -> (PosService, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::with_data_dir(dir.path());
        (PosService::open(&settings).unwrap(), dir)
    }

    fn with_recorder(service: &PosService) -> Recorder {
        let recorder = Recorder::default();
        service.attach_printer(Printer::with_connection(
            "/dev/usb/lp0",
            Box::new(recorder.clone()),
        ));
        recorder
    }

    async fn order_with_items(service: &PosService) -> Order {
        let mut order = service.new_order().await.unwrap();
        order.add_item(MenuItem::new("Feijoada", 3500, "Pratos"), 1, "");
        order.add_item(MenuItem::new("Suco", 800, "Bebidas"), 2, "sem gelo");
        order
    }

    #[tokio::test]
    async fn test_order_numbers_are_sequential() {
        let (service, _dir) = service();
        assert_eq!(service.new_order().await.unwrap().number, 1);
        assert_eq!(service.new_order().await.unwrap().number, 2);
        assert_eq!(service.config().snapshot().order_counter, 2);
    }

    #[tokio::test]
    async fn test_finalize_without_printer_returns_notice() {
        let (service, _dir) = service();
        let mut order = order_with_items(&service).await;

        let checkout = service
            .finalize_order(&mut order, Settlement::single(PaymentMethod::Pix))
            .await
            .unwrap();

        assert!(matches!(
            checkout,
            Checkout::PrinterOffline {
                number: 1,
                total: 5100
            }
        ));
        let notice = checkout.offline_notice().unwrap();
        assert!(notice.contains("Pedido #1"));
        assert!(notice.contains("R$ 51,00"));

        assert_eq!(order.status, OrderStatus::Finalized);
        let date = order.closed_date().unwrap();
        let stored = service.day_orders(&date).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].payment, PaymentMethod::Pix);
    }

    #[tokio::test]
    async fn test_finalize_prints_receipt_and_kitchen_ticket() {
        let (service, _dir) = service();
        service
            .config()
            .update(|config| config.kitchen_ticket = true)
            .unwrap();
        let recorder = with_recorder(&service);
        let mut order = order_with_items(&service).await;

        let checkout = service
            .finalize_order(
                &mut order,
                Settlement::Single {
                    method: PaymentMethod::Cash,
                    cash_received: 6000,
                },
            )
            .await
            .unwrap();
        let Checkout::Printing(handle) = checkout else {
            panic!("expected a print task");
        };
        handle.await.unwrap().unwrap();

        assert_eq!(order.cash_change(), 900);
        let jobs = recorder.jobs.lock();
        assert_eq!(jobs.len(), 2);
        let receipt = String::from_utf8_lossy(&jobs[0]);
        assert!(receipt.contains("Troco:"));
        let ticket = String::from_utf8_lossy(&jobs[1]);
        assert!(ticket.contains("*** COZINHA ***"));
        assert!(!ticket.contains("R$"));
    }

    #[tokio::test]
    async fn test_kitchen_ticket_disabled_prints_receipt_only() {
        let (service, _dir) = service();
        let recorder = with_recorder(&service);
        let mut order = order_with_items(&service).await;

        let Checkout::Printing(handle) = service
            .finalize_order(&mut order, Settlement::single(PaymentMethod::Card))
            .await
            .unwrap()
        else {
            panic!("expected a print task");
        };
        handle.await.unwrap().unwrap();
        assert_eq!(recorder.jobs.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_print_failure_keeps_order_saved() {
        let (service, _dir) = service();
        service.attach_printer(Printer::with_connection(
            "/dev/usb/lp0",
            Box::new(Recorder {
                fail: true,
                ..Default::default()
            }),
        ));
        let mut order = order_with_items(&service).await;

        let Checkout::Printing(handle) = service
            .finalize_order(&mut order, Settlement::single(PaymentMethod::Card))
            .await
            .unwrap()
        else {
            panic!("expected a print task");
        };
        assert!(matches!(handle.await.unwrap(), Err(PrintError::Offline(_))));

        let stored = service
            .day_orders(&order.closed_date().unwrap())
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    fn corrupt_today_file(service: &PosService) -> std::path::PathBuf {
        let path = service
            .orders()
            .dir()
            .join(format!("orders_{}.json", OrderStore::today()));
        std::fs::write(&path, "[{").unwrap();
        path
    }

    #[tokio::test]
    async fn test_failed_save_keeps_order_open_for_retry() {
        let (service, _dir) = service();
        let mut order = order_with_items(&service).await;
        let path = corrupt_today_file(&service);

        let result = service
            .finalize_order(
                &mut order,
                Settlement::Single {
                    method: PaymentMethod::Cash,
                    cash_received: 6000,
                },
            )
            .await;
        assert!(matches!(result, Err(PosError::Storage(_))));
        assert!(order.is_open());
        assert_eq!(order.cash_received, 0);
        assert!(order.closed_at.is_none());

        std::fs::remove_file(&path).unwrap();
        let checkout = service
            .finalize_order(
                &mut order,
                Settlement::Single {
                    method: PaymentMethod::Cash,
                    cash_received: 6000,
                },
            )
            .await
            .unwrap();
        assert!(matches!(checkout, Checkout::PrinterOffline { .. }));
        assert_eq!(order.status, OrderStatus::Finalized);
        assert_eq!(order.cash_received, 6000);

        let stored = service
            .day_orders(&order.closed_date().unwrap())
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], order);
    }

    #[tokio::test]
    async fn test_failed_cancel_keeps_order_open() {
        let (service, _dir) = service();
        let mut order = order_with_items(&service).await;
        let path = corrupt_today_file(&service);

        assert!(matches!(
            service.cancel_order(&mut order).await,
            Err(PosError::Storage(_))
        ));
        assert!(order.is_open());

        std::fs::remove_file(&path).unwrap();
        service.cancel_order(&mut order).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_keep_ticket_after_receipt() {
        let (service, _dir) = service();
        service
            .config()
            .update(|config| config.kitchen_ticket = true)
            .unwrap();
        let recorder = with_recorder(&service);

        let mut handles = Vec::new();
        for _ in 0..6 {
            let mut order = order_with_items(&service).await;
            let checkout = service
                .finalize_order(&mut order, Settlement::single(PaymentMethod::Pix))
                .await
                .unwrap();
            let Checkout::Printing(handle) = checkout else {
                panic!("expected a print task");
            };
            handles.push(handle);
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let jobs = recorder.jobs.lock();
        assert_eq!(jobs.len(), 12);
        for pair in jobs.chunks(2) {
            let receipt = String::from_utf8_lossy(&pair[0]);
            let ticket = String::from_utf8_lossy(&pair[1]);
            assert!(receipt.contains("TOTAL:"));
            assert!(ticket.contains("*** COZINHA ***"));
            let number = receipt
                .split("Pedido: #")
                .nth(1)
                .and_then(|rest| rest.split('\n').next())
                .unwrap()
                .to_string();
            assert!(ticket.contains(&format!("Pedido: #{number}\n")));
        }
    }

    #[tokio::test]
    async fn test_split_must_match_total() {
        let (service, _dir) = service();
        let mut order = order_with_items(&service).await;

        let result = service
            .finalize_order(
                &mut order,
                Settlement::Split {
                    payments: vec![
                        PaymentSplit::new(PaymentMethod::Cash, 2000),
                        PaymentSplit::new(PaymentMethod::Pix, 2000),
                    ],
                    cash_received: 2000,
                },
            )
            .await;

        assert!(matches!(result, Err(PosError::Validation(_))));
        assert!(order.is_open());
        assert_eq!(order.cash_received, 0);
        assert!(order.payments.is_empty());
    }

    #[tokio::test]
    async fn test_split_settlement() {
        let (service, _dir) = service();
        let mut order = order_with_items(&service).await;

        service
            .finalize_order(
                &mut order,
                Settlement::Split {
                    payments: vec![
                        PaymentSplit::new(PaymentMethod::Cash, 3000),
                        PaymentSplit::new(PaymentMethod::Pix, 2100),
                    ],
                    cash_received: 5000,
                },
            )
            .await
            .unwrap();

        assert_eq!(order.payment, PaymentMethod::Cash);
        assert_eq!(order.cash_change(), 2000);

        let summary = service
            .day_summary(&order.closed_date().unwrap())
            .await
            .unwrap();
        assert_eq!(summary.total_revenue, 5100);
        assert_eq!(summary.revenue_for(PaymentMethod::Pix), 2100);
    }

    #[tokio::test]
    async fn test_rejects_empty_and_closed_orders() {
        let (service, _dir) = service();

        let mut empty = service.new_order().await.unwrap();
        let result = service
            .finalize_order(&mut empty, Settlement::single(PaymentMethod::Cash))
            .await;
        assert!(matches!(result, Err(PosError::Validation(_))));
        assert!(empty.is_open());

        let mut order = order_with_items(&service).await;
        service.cancel_order(&mut order).await.unwrap();
        let result = service
            .finalize_order(&mut order, Settlement::single(PaymentMethod::Cash))
            .await;
        assert!(matches!(result, Err(PosError::Validation(_))));
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(matches!(
            service.cancel_order(&mut order).await,
            Err(PosError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_order_counts_in_summary() {
        let (service, _dir) = service();
        let mut order = order_with_items(&service).await;
        service.cancel_order(&mut order).await.unwrap();

        let date = order.closed_date().unwrap();
        let summary = service.day_summary(&date).await.unwrap();
        assert_eq!(summary.total_orders, 1);
        assert_eq!(summary.cancelled_orders, 1);
        assert_eq!(summary.total_revenue, 0);
        assert_eq!(service.order_dates().await.unwrap(), vec![date]);
    }

    #[tokio::test]
    async fn test_device_ops_need_printer() {
        let (service, _dir) = service();
        assert_eq!(service.printer_status(), None);
        assert!(matches!(
            service.print_test().await,
            Err(PosError::PrinterNotConnected)
        ));
        assert!(matches!(
            service.open_drawer().await,
            Err(PosError::PrinterNotConnected)
        ));
        assert!(matches!(
            service.print_day_summary("2026-02-05").await,
            Err(PosError::PrinterNotConnected)
        ));
    }

    #[tokio::test]
    async fn test_device_ops_with_printer() {
        let (service, _dir) = service();
        let recorder = with_recorder(&service);
        assert_eq!(service.printer_status().as_deref(), Some("/dev/usb/lp0"));

        service.print_test().await.unwrap();
        service.open_drawer().await.unwrap();
        let summary = service.print_day_summary("2026-02-05").await.unwrap();
        assert_eq!(summary.total_orders, 0);

        let jobs = recorder.jobs.lock();
        assert_eq!(jobs.len(), 3);
        assert!(String::from_utf8_lossy(&jobs[2]).contains("RESUMO DO DIA"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_connect_configured_device_file() {
        let (service, dir) = service();
        let device = dir.path().join("lp0");
        std::fs::File::create(&device).unwrap();
        let address = device.to_string_lossy().to_string();
        let configured = address.clone();
        service
            .config()
            .update(|config| config.printer.device_path = configured)
            .unwrap();

        assert_eq!(service.connect_printer().await.unwrap(), address);
        assert_eq!(service.printer_status(), Some(address.clone()));

        assert_eq!(service.reconnect_printer().await.unwrap(), address);
        service.open_drawer().await.unwrap();
        assert!(std::fs::read(&device).unwrap().ends_with(&[0x1B, 0x70, 0x00, 0x19, 0xFA]));
    }
}
