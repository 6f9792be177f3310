//! Customer notification texts.
//!
//! WhatsApp markup: `*bold*`, `_italic_`.

use std::fmt::Write;

use sentra_core::ProductType;

use crate::models::Order;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";
const NO_PAYMENT_INFO: &str = "Hubungi admin untuk info pembayaran";

/// Confirmation sent to the customer right after checkout.
#[must_use]
pub fn format_order_message(order: &Order, payment_info: Option<&str>) -> String {
    let mut message = String::new();
    let _ = writeln!(message, "🛒 *PESANAN BARU - SENTRA*");
    let _ = writeln!(message, "{RULE}\n");
    let _ = writeln!(message, "📋 *No. Order:* {}\n", order.order_number);
    let _ = writeln!(message, "📦 *Detail Pesanan:*");

    for item in &order.items {
        match item.product_type {
            ProductType::Paket => {
                let _ = writeln!(
                    message,
                    "\n• *{}* (x{}) — Rp {}",
                    item.product_name,
                    item.quantity,
                    item.price.format_id()
                );
                for sub_item in item.items.iter().flatten() {
                    let _ = writeln!(message, "  - {sub_item}");
                }
            }
            ProductType::Satuan => {
                let _ = writeln!(
                    message,
                    "• {} (x{}) — Rp {}",
                    item.product_name,
                    item.quantity,
                    item.line_total().format_id()
                );
            }
        }
    }

    let _ = writeln!(message, "\n{RULE}");
    let _ = writeln!(
        message,
        "💰 *Total: Rp {}*\n",
        order.total_amount.format_id()
    );
    let _ = writeln!(message, "👤 *Nama:* {}", order.customer_name);
    let _ = writeln!(message, "📱 *WhatsApp:* {}", order.whatsapp_number);
    let _ = writeln!(message, "👥 *Kelompok:* {}\n", order.kelompok);
    let _ = writeln!(message, "{RULE}");
    let _ = writeln!(message, "💳 *Cara Pembayaran:*");
    message.push_str(payment_info.unwrap_or(NO_PAYMENT_INFO));
    message.push_str("\n\nTerima kasih telah berbelanja di *Sentra*! 🙏");

    message
}

/// Reminder for an order still awaiting payment.
#[must_use]
pub fn format_follow_up_message(order: &Order) -> String {
    let mut message = String::new();
    let _ = writeln!(message, "🙏 Salam.\n");
    let _ = writeln!(
        message,
        "Ka *{}*, Pesanan Anda dengan rincian produk berikut:\n",
        order.customer_name
    );
    let _ = writeln!(message, "🛒 *Detail Pesanan:*");

    for item in &order.items {
        let _ = writeln!(
            message,
            "• {} (x{}) — Rp {}",
            item.product_name,
            item.quantity,
            item.line_total().format_id()
        );
    }

    let _ = writeln!(
        message,
        "\n💰 *Total: Rp {}*\n",
        order.total_amount.format_id()
    );
    let _ = writeln!(
        message,
        "⏳ masih menunggu konfirmasi. Silakan lakukan pembayaran agar pesanan dapat diproses. Terima kasih! 😊\n"
    );
    let _ = writeln!(
        message,
        "📌 _Abaikan pesan ini jika Anda sudah melakukan pembayaran._\n"
    );
    let _ = writeln!(message, "{RULE}");
    message.push_str("🤖 _Pesan ini dikirim otomatis oleh sistem *Sentra*._");

    message
}
