use std::fmt::Write as _;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use notinha_pos::{Checkout, OrderStore, PosService, Settlement, setup_environment};
use notinha_printer::detect_printers;
use shared::{Order, PaymentMethod, PaymentSplit, format_brl, format_date_br, parse_brl};

#[derive(Parser)]
#[command(name = "notinha")]
#[command(about = "Restaurant point of sale with thermal receipt printing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List printer addresses found on this machine
    Detect,
    /// Print the test page
    TestPrint,
    /// Open the cash drawer
    Drawer,
    /// Show the totals of one day
    Summary {
        /// ISO date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Also print the summary
        #[arg(long)]
        print: bool,
    },
    /// Show every stored order of one day
    History {
        #[arg(long)]
        date: Option<String>,
    },
    /// List dates that have stored orders
    Dates,
    /// List active menu items by category
    Menu,
    /// Ring up and settle an order
    Sell {
        /// Menu item as ID[:QTY[:NOTE]], repeatable
        #[arg(long = "item", value_parser = parse_item_spec, required = true)]
        items: Vec<ItemSpec>,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        table: Option<String>,
        /// Discount in reais, e.g. 5,00
        #[arg(long, value_parser = parse_amount)]
        discount: Option<i64>,
        /// Single payment method (Dinheiro, Cartao, Pix)
        #[arg(long, value_parser = parse_method, conflicts_with = "split")]
        pay: Option<PaymentMethod>,
        /// Split part as METHOD=AMOUNT, repeatable
        #[arg(long, value_parser = parse_split)]
        split: Vec<PaymentSplit>,
        /// Cash handed over by the customer
        #[arg(long, value_parser = parse_amount)]
        received: Option<i64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemSpec {
    id: i64,
    quantity: i32,
    notes: String,
}

fn parse_item_spec(s: &str) -> Result<ItemSpec, String> {
    let mut parts = s.splitn(3, ':');
    let id = parts
        .next()
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|_| format!("invalid item id in {s:?}"))?;
    let quantity = match parts.next() {
        Some(q) if !q.trim().is_empty() => q
            .trim()
            .parse()
            .ok()
            .filter(|q: &i32| *q > 0)
            .ok_or_else(|| format!("invalid quantity in {s:?}"))?,
        _ => 1,
    };
    let notes = parts.next().unwrap_or_default().trim().to_string();
    Ok(ItemSpec {
        id,
        quantity,
        notes,
    })
}

fn parse_amount(s: &str) -> Result<i64, String> {
    parse_brl(s).ok_or_else(|| format!("invalid amount {s:?}"))
}

fn parse_method(s: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::from_label(s).ok_or_else(|| {
        let known: Vec<_> = PaymentMethod::ALL.iter().map(|m| m.label()).collect();
        format!("unknown payment method {s:?}, expected one of {}", known.join(", "))
    })
}

fn parse_split(s: &str) -> Result<PaymentSplit, String> {
    let (method, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected METHOD=AMOUNT, got {s:?}"))?;
    Ok(PaymentSplit::new(parse_method(method)?, parse_amount(amount)?))
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = setup_environment();

    if let Command::Detect = cli.command {
        let found = detect_printers();
        if found.is_empty() {
            println!("Nenhuma impressora encontrada");
        }
        for address in found {
            println!("{address}");
        }
        return Ok(());
    }

    let service = PosService::open(&settings).context("Failed to open data directory")?;

    match cli.command {
        Command::Detect => {}
        Command::TestPrint => {
            connect(&service).await?;
            service.print_test().await?;
            println!("Pagina de teste enviada");
        }
        Command::Drawer => {
            connect(&service).await?;
            service.open_drawer().await?;
        }
        Command::Summary { date, print } => {
            let date = date.unwrap_or_else(OrderStore::today);
            let summary = if print {
                connect(&service).await?;
                service.print_day_summary(&date).await?
            } else {
                service.day_summary(&date).await?
            };

            println!("Resumo de {}", format_date_br(&summary.date));
            println!("Total de pedidos: {}", summary.total_orders);
            println!("Finalizados: {}", summary.finalized_orders);
            println!("Cancelados: {}", summary.cancelled_orders);
            println!("Receita total: {}", format_brl(summary.total_revenue));
            for method in PaymentMethod::ALL {
                let count = summary.orders_for(method);
                if count > 0 {
                    println!(
                        "  {} ({}): {}",
                        method,
                        count,
                        format_brl(summary.revenue_for(method))
                    );
                }
            }
            println!("Ticket medio: {}", format_brl(summary.average_ticket));
        }
        Command::History { date } => {
            let date = date.unwrap_or_else(OrderStore::today);
            let orders = service.day_orders(&date).await?;
            if orders.is_empty() {
                println!("Nenhum pedido em {}", format_date_br(&date));
            }
            for order in &orders {
                println!("{}", order_detail(order));
            }
        }
        Command::Dates => {
            for date in service.order_dates().await? {
                println!("{}", format_date_br(&date));
            }
        }
        Command::Menu => {
            let menu = service.menu().snapshot();
            for category in menu.categories() {
                println!("[{category}]");
                for item in menu.items_by_category(&category) {
                    println!("  {:>4}  {:<32} {}", item.id, item.name, format_brl(item.price));
                }
            }
        }
        Command::Sell {
            items,
            customer,
            table,
            discount,
            pay,
            split,
            received,
        } => {
            let menu = service.menu().snapshot();
            // Resolve items before taking an order number
            let lines = items
                .into_iter()
                .map(|spec| {
                    let id = spec.id;
                    menu.get(id)
                        .filter(|item| item.active)
                        .cloned()
                        .map(|item| (item, spec))
                        .ok_or_else(|| anyhow!("No active menu item with id {id}"))
                })
                .collect::<Result<Vec<_>>>()?;

            let mut order = service.new_order().await?;
            for (item, spec) in lines {
                order.add_item(item, spec.quantity, spec.notes);
            }
            order.customer = customer.unwrap_or_default();
            order.table = table.unwrap_or_default();
            order.discount = discount.unwrap_or_default();

            let cash_received = received.unwrap_or_default();
            let settlement = if split.is_empty() {
                Settlement::Single {
                    method: pay.unwrap_or_default(),
                    cash_received,
                }
            } else {
                Settlement::Split {
                    payments: split,
                    cash_received,
                }
            };

            if service.printer_status().is_none()
                && let Err(e) = service.connect_printer().await
            {
                tracing::warn!(error = %e, "Printer unavailable");
            }

            let checkout = service.finalize_order(&mut order, settlement).await?;
            println!("{}", order_detail(&order));
            match checkout {
                Checkout::Printing(handle) => {
                    if let Err(e) = handle.await? {
                        eprintln!("Pedido salvo, mas a impressao falhou: {e}");
                    }
                }
                offline => {
                    if let Some(notice) = offline.offline_notice() {
                        println!("{notice}");
                    }
                }
            }
        }
    }

    Ok(())
}

async fn connect(service: &PosService) -> Result<()> {
    let address = service
        .connect_printer()
        .await
        .context("Printer not available")?;
    tracing::info!(address = %address, "Using printer");
    Ok(())
}

/// Plain-text order detail for the terminal
fn order_detail(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pedido #{}", order.number);
    let _ = writeln!(out, "Status: {}", order.status);
    let _ = writeln!(out, "Criado: {}", order.created_at.format("%d/%m/%Y %H:%M"));
    if let Some(closed_at) = order.closed_at {
        let _ = writeln!(out, "Fechado: {}", closed_at.format("%d/%m/%Y %H:%M"));
    }
    if !order.customer.is_empty() {
        let _ = writeln!(out, "Cliente: {}", order.customer);
    }
    if !order.table.is_empty() {
        let _ = writeln!(out, "Mesa: {}", order.table);
    }
    if order.is_split_payment() {
        out.push_str("Pagamentos:\n");
        for split in &order.payments {
            let _ = writeln!(out, "  {}: {}", split.method, format_brl(split.amount));
        }
    } else {
        let _ = writeln!(out, "Pagamento: {}", order.payment);
    }

    out.push_str("\n--- Itens ---\n");
    for line in &order.items {
        let _ = writeln!(
            out,
            "{}x {}  {}",
            line.quantity,
            line.item.name,
            format_brl(line.total())
        );
        if !line.notes.is_empty() {
            let _ = writeln!(out, "   * {}", line.notes);
        }
    }

    out.push('\n');
    let _ = writeln!(out, "Subtotal: {}", format_brl(order.subtotal()));
    if order.discount > 0 {
        let _ = writeln!(out, "Desconto: -{}", format_brl(order.discount));
    }
    let _ = writeln!(out, "Total: {}", format_brl(order.total()));
    if order.cash_received > 0 {
        let _ = writeln!(out, "Valor Recebido: {}", format_brl(order.cash_received));
        let _ = writeln!(out, "Troco: {}", format_brl(order.cash_change()));
    }
    out
}
