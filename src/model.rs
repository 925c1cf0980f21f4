//! The shared application state handed to every handler invocation.

use std::sync::Arc;

use crate::config::Config;
use crate::gate::MembershipGate;
use crate::ledger::CreditLedger;
use crate::lookup::orchestrator::LookupOrchestrator;
use crate::messaging::Messenger;
use crate::scenes::ConversationEngine;
use crate::store::accounts::AccountStore;

/// The central, shared state of the application. An `Arc<AppState>` is
/// injected into the dispatcher and cloned into every handler.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn AccountStore>,
    pub messenger: Arc<dyn Messenger>,
    pub ledger: CreditLedger,
    pub gate: MembershipGate,
    pub scenes: ConversationEngine,
    pub lookup: LookupOrchestrator,
    /// Bot username, fetched once at startup, for referral deep links.
    pub bot_username: String,
}
