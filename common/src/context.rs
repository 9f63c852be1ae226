use crate::models::Currency;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Shared slot holding the display currency for the session.
///
/// Cloning yields another handle onto the same slot. Readers that need to
/// react to changes hold a receiver from [`CurrencyContext::subscribe`].
#[derive(Debug, Clone)]
pub struct CurrencyContext {
    sender: Arc<watch::Sender<Currency>>,
}

impl Default for CurrencyContext {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl CurrencyContext {
    pub fn new(initial: Currency) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> Currency {
        *self.sender.borrow()
    }

    /// Selects a currency. Returns whether the selection changed; subscribers
    /// are only notified on an actual change.
    pub fn set(&self, currency: Currency) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == currency {
                false
            } else {
                *current = currency;
                true
            }
        });

        if changed {
            info!("Display currency set to {}", currency.iso_code());
        }

        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<Currency> {
        self.sender.subscribe()
    }
}
