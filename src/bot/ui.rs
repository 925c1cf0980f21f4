//! Central keyboard construction and the button labels it dispatches on.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

pub const BTN_REFER: &str = "Refer & Earn 🎁";
pub const BTN_BUY: &str = "Buy Credits 💰";
pub const BTN_ACCOUNT: &str = "My Account 📊";
pub const BTN_HELP: &str = "Help ❓";
pub const BTN_ADD_CREDIT: &str = "Add Credit 👤";
pub const BTN_BROADCAST: &str = "Broadcast 📢";
pub const BTN_MEMBER_STATUS: &str = "Member Status 👥";

/// The persistent reply keyboard. Admin rows are appended for allow-listed
/// users only.
pub fn main_menu(admin: bool) -> KeyboardMarkup {
    let mut rows = vec![
        vec![
            KeyboardButton::new(BTN_REFER),
            KeyboardButton::new(BTN_BUY),
        ],
        vec![
            KeyboardButton::new(BTN_ACCOUNT),
            KeyboardButton::new(BTN_HELP),
        ],
    ];
    if admin {
        rows.push(vec![
            KeyboardButton::new(BTN_ADD_CREDIT),
            KeyboardButton::new(BTN_BROADCAST),
        ]);
        rows.push(vec![KeyboardButton::new(BTN_MEMBER_STATUS)]);
    }
    KeyboardMarkup::new(rows).resize_keyboard()
}
