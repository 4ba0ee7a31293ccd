//! Outbound message templates.

use crate::domain::message::{Markup, OutboundMessage};
use crate::domain::question::{MENU, QuestionRecord};
use rust_decimal::Decimal;
use teloxide::utils::html::escape;

pub const PICK_FROM_MENU: &str = "Please pick a subject from the menu.";
pub const EXPLANATION_UNAVAILABLE: &str =
    "⚠️ The AI explanation is unavailable right now. Please try again later.";

/// Static payee reference embedded in the payment prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    /// UPI virtual payment address.
    pub payee_id: String,
    /// Amount in rupees.
    pub amount: Decimal,
}

impl PaymentDetails {
    pub fn link(&self) -> String {
        format!(
            "upi://pay?pa={}&pn=UPSC%20Mentor&am={}&cu=INR",
            self.payee_id,
            self.amount.round_dp(2)
        )
    }
}

pub fn menu_markup() -> Markup {
    Markup::Menu(
        MENU.iter()
            .map(|row| row.iter().map(|label| label.to_string()).collect())
            .collect(),
    )
}

pub fn welcome() -> OutboundMessage {
    OutboundMessage::rich("📚 <b>UPSC AI Mentor Active</b>\nChoose a subject:")
        .with_markup(menu_markup())
}

/// Dataset text is escaped; only the labels carry markup.
pub fn question(record: &QuestionRecord) -> OutboundMessage {
    OutboundMessage::rich(format!(
        "⏳ <b>Year:</b> {}\n❓ <b>Question:</b> {}",
        record.year,
        escape(&record.text)
    ))
}

/// Model output is escaped, so stray `<` or `&` cannot break rendering.
pub fn explanation(text: &str) -> OutboundMessage {
    OutboundMessage::rich(format!("💡 <b>AI ANALYSIS:</b>\n{}", escape(text)))
}

pub fn explanation_unavailable() -> OutboundMessage {
    OutboundMessage::plain(EXPLANATION_UNAVAILABLE)
}

pub fn pick_from_menu() -> OutboundMessage {
    OutboundMessage::plain(PICK_FROM_MENU)
}

/// Sent as plain text so the link is shown verbatim.
pub fn payment_prompt(payment: &PaymentDetails) -> OutboundMessage {
    OutboundMessage::plain(format!(
        "🔒 You have used all of your free questions.\n\
         Unlock unlimited questions for ₹{amount}:\n{link}\n\
         Access is activated once the payment is confirmed.",
        amount = payment.amount.round_dp(2),
        link = payment.link()
    ))
}

pub fn paid_status_changed(user: u64, paid: bool) -> OutboundMessage {
    let status = if paid { "paid" } else { "unpaid" };
    OutboundMessage::plain(format!("✅ User {user} is now marked as {status}."))
}
