//! Day summary renderer

use notinha_printer::EscPosBuilder;
use shared::models::paper_width;
use shared::{PaymentMethod, format_brl, format_date_br};

use super::layout::format_total_line;
use super::types::SummaryReceiptData;

/// Render the end-of-day summary to ESC/POS bytes
pub fn render_day_summary(data: &SummaryReceiptData<'_>) -> Vec<u8> {
    let w = paper_width(data.chars_per_line);
    let s = data.summary;
    let restaurant = data.restaurant;
    let mut b = EscPosBuilder::new();

    // Header
    b.center()
        .font_double()
        .bold()
        .line(&restaurant.name)
        .font_normal()
        .bold_off();
    if !restaurant.address.is_empty() {
        b.line(&restaurant.address);
    }
    if !restaurant.phone.is_empty() {
        b.line(&format!("Tel: {}", restaurant.phone));
    }
    b.separator('-', w);

    b.font_double()
        .bold()
        .line("RESUMO DO DIA")
        .font_normal()
        .bold_off()
        .line(&format_date_br(&s.date))
        .separator('-', w);

    // Counts
    b.left()
        .line(&format_total_line(
            "Total de pedidos:",
            &s.total_orders.to_string(),
            w,
        ))
        .line(&format_total_line(
            "Finalizados:",
            &s.finalized_orders.to_string(),
            w,
        ))
        .line(&format_total_line(
            "Cancelados:",
            &s.cancelled_orders.to_string(),
            w,
        ))
        .separator('-', w);

    b.bold()
        .line(&format_total_line(
            "RECEITA TOTAL:",
            &format_brl(s.total_revenue),
            w,
        ))
        .bold_off()
        .separator('-', w);

    // Payment breakdown
    b.center()
        .bold()
        .line("POR FORMA DE PAGAMENTO")
        .bold_off()
        .left();
    for method in PaymentMethod::ALL {
        let count = s.orders_for(method);
        if count == 0 {
            continue;
        }
        let label = format!("{} ({}):", method, count);
        b.line(&format_total_line(
            &label,
            &format_brl(s.revenue_for(method)),
            w,
        ));
    }
    b.separator('-', w);

    b.line(&format_total_line(
        "Ticket medio:",
        &format_brl(s.average_ticket),
        w,
    ));

    if !restaurant.footer.is_empty() {
        b.separator('-', w).center().line(&restaurant.footer);
    }

    b.feed(4).cut_partial();
    b.build()
}
