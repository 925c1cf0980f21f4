//! Inbound update handling: gate first, then the active scene, then
//! command/button dispatch.

use std::sync::Arc;

use tracing::{info, warn};

use crate::bot::ui;
use crate::constants::{REFERRAL_REWARD, STARTING_CREDITS};
use crate::error::BotResult;
use crate::ledger::UserProfile;
use crate::model::AppState;

pub async fn handle_update(
    state: Arc<AppState>,
    user: UserProfile,
    chat_id: i64,
    text: &str,
) -> BotResult<()> {
    // The gate runs before everything else; a denial has already messaged
    // the user, so there is nothing further to do here.
    if state.gate.authorize(user.user_id, chat_id).await.is_err() {
        return Ok(());
    }

    // An active scene owns the whole message, including /cancel.
    if state.scenes.handle_text(user.user_id, chat_id, text).await? {
        return Ok(());
    }

    let trimmed = text.trim();
    if let Some(payload) = command_payload(trimmed, "/start") {
        let referrer_id = payload.parse::<i64>().ok();
        return start(&state, &user, chat_id, referrer_id).await;
    }
    if let Some(args) = command_payload(trimmed, "/addcredit") {
        return add_credit_line(&state, &user, chat_id, args).await;
    }

    match trimmed {
        ui::BTN_ACCOUNT => account(&state, &user, chat_id).await,
        ui::BTN_HELP => help(&state, chat_id).await,
        ui::BTN_REFER => refer(&state, &user, chat_id).await,
        ui::BTN_BUY => buy(&state, chat_id).await,
        ui::BTN_MEMBER_STATUS => member_status(&state, &user, chat_id).await,
        ui::BTN_ADD_CREDIT => state.scenes.enter_add_credit(user.user_id, chat_id).await,
        ui::BTN_BROADCAST => state.scenes.enter_broadcast(user.user_id, chat_id).await,
        query => state.lookup.run(user.user_id, chat_id, query).await,
    }
}

/// A command must stand alone or be followed by whitespace-separated
/// arguments; `/startle` is not `/start`.
fn command_payload<'a>(text: &'a str, command: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(command)?;
    if rest.is_empty() || rest.starts_with(' ') {
        Some(rest.trim())
    } else {
        None
    }
}

fn account_summary(user: &UserProfile, account: &crate::store::accounts::Account) -> String {
    format!(
        "🎯 Welcome, {}!\n\n💳 Your Credits: {}\n📊 Total Searches: {}\n🗓️ Member Since: {}",
        user.first_name,
        account.credits,
        account.searches,
        account.joined_at.format("%d/%m/%Y")
    )
}

/// `/start [referrer_id]`: idempotent registration, referral reward, then
/// the account summary with the main menu.
async fn start(
    state: &Arc<AppState>,
    user: &UserProfile,
    chat_id: i64,
    referrer_id: Option<i64>,
) -> BotResult<()> {
    let admin = state.config.is_admin(user.user_id);
    let registration = state
        .ledger
        .register_if_absent(user.clone(), referrer_id)
        .await?;

    if registration.created {
        info!(target: "bot", user_id = user.user_id, "new account registered");
        if let Some(referral) = &registration.referral {
            let note = format!(
                "🎉 1 Referral Received!\nYour new balance is now {} credits.",
                referral.new_balance
            );
            if let Err(err) = state.messenger.send(referral.referrer_id, &note).await {
                warn!(target: "bot", referrer = referral.referrer_id, error = %err, "failed to notify referrer");
            }
        }
        notify_admins_of_signup(state, user).await;
        state
            .messenger
            .send(
                chat_id,
                &format!(
                    "🎉 Welcome aboard, {}!\n\nAs a new member, you've received {} free credits.",
                    user.first_name, STARTING_CREDITS
                ),
            )
            .await?;
    }

    state
        .messenger
        .send_menu(chat_id, &account_summary(user, &registration.account), admin)
        .await?;
    Ok(())
}

/// New-member alert to every admin; per-admin failures are isolated.
async fn notify_admins_of_signup(state: &Arc<AppState>, user: &UserProfile) {
    let mut note = format!(
        "🎉 New Member Alert!\n\nName: {}\nProfile ID: {}",
        user.first_name, user.user_id
    );
    if let Some(username) = &user.username {
        note.push_str(&format!("\nUsername: @{username}"));
    }
    for admin_id in &state.config.admin_ids {
        if let Err(err) = state.messenger.send(*admin_id, &note).await {
            warn!(target: "bot", admin = admin_id, error = %err, "failed to notify admin of signup");
        }
    }
}

async fn account(state: &Arc<AppState>, user: &UserProfile, chat_id: i64) -> BotResult<()> {
    match state.store.get(user.user_id).await? {
        Some(account) => {
            state
                .messenger
                .send_menu(
                    chat_id,
                    &account_summary(user, &account),
                    state.config.is_admin(user.user_id),
                )
                .await?;
        }
        None => {
            state
                .messenger
                .send(chat_id, "Please press /start to register.")
                .await?;
        }
    }
    Ok(())
}

async fn help(state: &Arc<AppState>, chat_id: i64) -> BotResult<()> {
    state
        .messenger
        .send(
            chat_id,
            &format!(
                "❓ Help & Support Center\n\n🔍 How to Use:\n• Send a phone number to get its report.\n• Each search costs 1 credit.\n\n🎁 Referral Program:\n• Get {REFERRAL_REWARD} credit per successful referral.\n\n👤 Support: {}",
                state.config.support_handle
            ),
        )
        .await?;
    Ok(())
}

async fn refer(state: &Arc<AppState>, user: &UserProfile, chat_id: i64) -> BotResult<()> {
    state
        .messenger
        .send(
            chat_id,
            &format!(
                "Invite friends and earn credits! 🎁\n\nYour link: https://t.me/{}?start={}",
                state.bot_username, user.user_id
            ),
        )
        .await?;
    Ok(())
}

async fn buy(state: &Arc<AppState>, chat_id: i64) -> BotResult<()> {
    state
        .messenger
        .send(
            chat_id,
            &format!(
                "💰 Buy Credits - Price List\n━━━━━━━━━━━━━━━━━━━━━━━━\n💎 STARTER - 25 Credits (₹49)\n🔥 BASIC - 100 Credits (₹149)\n⭐ PRO - 500 Credits (₹499)\n━━━━━━━━━━━━━━━━━━━━━━━━\n💬 Contact admin to buy: {}",
                state.config.support_handle
            ),
        )
        .await?;
    Ok(())
}

/// Total registered accounts; admin-only, silently ignored otherwise.
async fn member_status(state: &Arc<AppState>, user: &UserProfile, chat_id: i64) -> BotResult<()> {
    if !state.config.is_admin(user.user_id) {
        return Ok(());
    }
    let total = state.store.count().await?;
    state
        .messenger
        .send(
            chat_id,
            &format!("📊 Bot Member Status\n\nTotal Members: {total}"),
        )
        .await?;
    Ok(())
}

/// One-line variant of the guided credit grant: `/addcredit <id> <amount>`.
/// Silently ignored for non-admins, like scene entry.
async fn add_credit_line(
    state: &Arc<AppState>,
    user: &UserProfile,
    chat_id: i64,
    args: &str,
) -> BotResult<()> {
    if !state.config.is_admin(user.user_id) {
        return Ok(());
    }
    let mut parts = args.split_whitespace();
    let parsed = match (
        parts.next().map(str::parse::<i64>),
        parts.next().map(str::parse::<i64>),
        parts.next(),
    ) {
        (Some(Ok(target_id)), Some(Ok(amount)), None) => Some((target_id, amount)),
        _ => None,
    };
    let Some((target_id, amount)) = parsed else {
        state
            .messenger
            .send(chat_id, "Usage: /addcredit <user_id> <amount>")
            .await?;
        return Ok(());
    };
    state.scenes.grant_and_confirm(chat_id, target_id, amount).await
}
