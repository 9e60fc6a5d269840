//! Kitchen ticket renderer
//!
//! Same order, no money: the kitchen only sees what to prepare.

use notinha_printer::{EscPosBuilder, truncate_width};
use shared::models::paper_width;

use super::layout::format_date_time;
use super::types::ReceiptData;

/// Render the kitchen ticket to ESC/POS bytes
pub fn render_kitchen_ticket(data: &ReceiptData<'_>) -> Vec<u8> {
    let w = paper_width(data.chars_per_line);
    let order = data.order;
    let mut b = EscPosBuilder::new();

    b.center()
        .font_double()
        .bold()
        .line("*** COZINHA ***")
        .font_normal()
        .bold_off()
        .separator('-', w);

    // Double size halves the usable width
    b.left().bold().font_double();
    b.line(&format!("Pedido: #{}", order.number));
    b.line(&format_date_time(&order.created_at));
    if !order.customer.is_empty() {
        let max = (w / 2).saturating_sub(5);
        b.line(&format!("Cliente: {}", truncate_width(&order.customer, max)));
    }
    if !order.table.is_empty() {
        b.line(&format!("Mesa: {}", order.table));
    }
    b.font_normal().bold_off().separator('-', w);

    for line in &order.items {
        let name = truncate_width(&line.item.name, w.saturating_sub(5));
        b.bold()
            .line(&format!("{}x {}", line.quantity, name))
            .bold_off();
        if !line.notes.is_empty() {
            b.line(&format!("  * {}", line.notes));
        }
    }

    b.separator('-', w).feed(4).cut_partial();
    b.build()
}
