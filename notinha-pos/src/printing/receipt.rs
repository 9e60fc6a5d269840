//! Customer receipt renderer

use notinha_printer::EscPosBuilder;
use shared::models::paper_width;
use shared::{Order, RestaurantInfo, format_brl};

use super::layout::{format_date_time, format_item_line, format_total_line};
use super::types::ReceiptData;

/// Render the customer receipt to ESC/POS bytes
pub fn render_receipt(data: &ReceiptData<'_>) -> Vec<u8> {
    let w = paper_width(data.chars_per_line);
    let order = data.order;
    let mut b = EscPosBuilder::new();

    render_header(&mut b, data.restaurant, w);
    render_order_info(&mut b, order, w);
    render_items(&mut b, order, w);
    render_totals(&mut b, order, w);
    render_payment(&mut b, order, w);

    if !data.restaurant.footer.is_empty() {
        b.separator('-', w).center().line(&data.restaurant.footer);
    }

    b.feed(4).cut_partial();
    b.build()
}

/// Restaurant name and identification, centered
fn render_header(b: &mut EscPosBuilder, restaurant: &RestaurantInfo, w: usize) {
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
    if !restaurant.cnpj.is_empty() {
        b.line(&format!("CNPJ: {}", restaurant.cnpj));
    }

    b.separator('-', w);
}

fn render_order_info(b: &mut EscPosBuilder, order: &Order, w: usize) {
    b.left()
        .line(&format_date_time(&order.created_at))
        .line(&format!("Pedido: #{}", order.number));

    if !order.customer.is_empty() {
        b.line(&format!("Cliente: {}", order.customer));
    }
    if !order.table.is_empty() {
        b.line(&format!("Mesa: {}", order.table));
    }

    b.separator('-', w);
}

fn render_items(b: &mut EscPosBuilder, order: &Order, w: usize) {
    b.bold()
        .line(&format_item_line("QTD", "ITEM", "VALOR", w))
        .bold_off();

    for line in &order.items {
        b.line(&format_item_line(
            &format!("{}x", line.quantity),
            &line.item.name,
            &format_brl(line.total()),
            w,
        ));
        if !line.notes.is_empty() {
            b.line(&format!("  * {}", line.notes));
        }
    }

    b.separator('-', w);
}

fn render_totals(b: &mut EscPosBuilder, order: &Order, w: usize) {
    b.line(&format_total_line("Subtotal:", &format_brl(order.subtotal()), w));

    if order.discount > 0 {
        let discount = format!("-{}", format_brl(order.discount));
        b.line(&format_total_line("Desconto:", &discount, w));
    }

    b.bold()
        .line(&format_total_line("TOTAL:", &format_brl(order.total()), w))
        .bold_off();

    b.separator('-', w);
}

fn render_payment(b: &mut EscPosBuilder, order: &Order, w: usize) {
    if order.is_split_payment() {
        b.bold().line("Pagamentos:").bold_off();
        for split in &order.payments {
            b.line(&format!("  {}: {}", split.method, format_brl(split.amount)));
        }
    } else {
        b.line(&format!("Pagamento: {}", order.payment));
    }

    if order.cash_received > 0 {
        b.line(&format_total_line(
            "Valor Recebido:",
            &format_brl(order.cash_received),
            w,
        ));
        b.line(&format_total_line("Troco:", &format_brl(order.cash_change()), w));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printing::contains_text;
    use shared::{MenuItem, PaymentMethod, PaymentSplit};

    fn restaurant() -> RestaurantInfo {
        RestaurantInfo {
            name: "Cantina da Nona".to_string(),
            address: "Rua das Flores, 10".to_string(),
            phone: "(11) 5555-0000".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            footer: "Volte sempre!".to_string(),
        }
    }

    fn sample_order() -> Order {
        let mut order = Order::new(42);
        order.add_item(MenuItem::new("Pizza", 3000, "Pizzas"), 1, "sem cebola");
        order.add_item(MenuItem::new("Suco", 800, "Bebidas"), 2, "");
        order.customer = "Carlos".to_string();
        order.table = "7".to_string();
        order
    }

    fn render(order: &Order, info: &RestaurantInfo) -> Vec<u8> {
        render_receipt(&ReceiptData {
            restaurant: info,
            order,
            chars_per_line: 48,
        })
    }

    #[test]
    fn test_receipt_sections() {
        let mut order = sample_order();
        order.discount = 200;
        order.finalize(PaymentMethod::Card);
        let data = render(&order, &restaurant());

        assert!(data.starts_with(&[0x1B, 0x40, 0x1B, 0x74, 0x10]));
        assert!(data.ends_with(&[0x1B, 0x64, 4, 0x1D, 0x56, 0x01]));

        for expected in [
            "Cantina da Nona",
            "Tel: (11) 5555-0000",
            "CNPJ: 12.345.678/0001-90",
            "Pedido: #42",
            "Cliente: Carlos",
            "Mesa: 7",
            "QTD  ITEM",
            "  * sem cebola",
            "Pagamento: Cartao",
            "Volte sempre!",
        ] {
            assert!(contains_text(&data, expected), "missing {expected:?}");
        }

        let subtotal = format_total_line("Subtotal:", "R$ 46,00", 48);
        let discount = format_total_line("Desconto:", "-R$ 2,00", 48);
        let total = format_total_line("TOTAL:", "R$ 44,00", 48);
        assert!(contains_text(&data, &subtotal));
        assert!(contains_text(&data, &discount));
        assert!(contains_text(&data, &total));
        assert!(!contains_text(&data, "Troco:"));
    }

    #[test]
    fn test_receipt_omits_empty_optional_lines() {
        let mut order = Order::new(1);
        order.add_item(MenuItem::new("Cafe", 550, "Bebidas"), 1, "");
        order.finalize(PaymentMethod::Pix);
        let info = RestaurantInfo {
            address: String::new(),
            phone: String::new(),
            cnpj: String::new(),
            footer: String::new(),
            ..restaurant()
        };
        let data = render(&order, &info);

        for absent in ["Tel:", "CNPJ:", "Cliente:", "Mesa:", "Desconto:", "Volte"] {
            assert!(!contains_text(&data, absent), "unexpected {absent:?}");
        }
    }

    #[test]
    fn test_receipt_split_payment_and_change() {
        let mut order = sample_order();
        order.discount = 200;
        order.finalize_split(vec![
            PaymentSplit::new(PaymentMethod::Cash, 2200),
            PaymentSplit::new(PaymentMethod::Pix, 2200),
        ]);
        order.cash_received = 3000;
        let data = render(&order, &restaurant());

        assert!(contains_text(&data, "Pagamentos:"));
        assert!(contains_text(&data, "  Dinheiro: R$ 22,00"));
        assert!(contains_text(&data, "  Pix: R$ 22,00"));
        assert!(!contains_text(&data, "Pagamento: "));
        assert!(contains_text(
            &data,
            &format_total_line("Valor Recebido:", "R$ 30,00", 48)
        ));
        assert!(contains_text(&data, &format_total_line("Troco:", "R$ 8,00", 48)));
    }

    #[test]
    fn test_receipt_zero_width_uses_default() {
        let mut order = sample_order();
        order.finalize(PaymentMethod::Cash);
        let info = restaurant();
        let default_width = render_receipt(&ReceiptData {
            restaurant: &info,
            order: &order,
            chars_per_line: 0,
        });
        assert_eq!(default_width, render(&order, &info));
    }

    #[test]
    fn test_receipt_encodes_accents() {
        let mut order = Order::new(3);
        order.add_item(MenuItem::new("Pão de queijo", 500, "Salgados"), 1, "");
        order.finalize(PaymentMethod::Cash);
        let data = render(&order, &restaurant());
        assert!(contains_text(&data, "Pão de queijo"));
    }
}
