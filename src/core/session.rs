//! Converter session state
//!
//! A [`ConverterSession`] owns everything the converter shows: the loaded rates,
//! the amount being typed, both currency selections, the last result and the
//! active language. Conversions read only from this state, so they can be driven
//! and tested without any terminal attached.

use crate::core::converter::{self, Conversion, ConversionSkipped};
use crate::core::i18n::Language;
use crate::core::loader::{self, LoadState, PendingLoad};
use crate::core::rates::{RateProvider, RateTable, UpdateWindow};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_AMOUNT: &str = "1";

pub struct ConverterSession {
    state: LoadState,
    pending: Option<PendingLoad>,
    amount: String,
    from: String,
    to: String,
    result: Option<Conversion>,
    language: Language,
}

impl ConverterSession {
    pub fn new(language: Language) -> Self {
        Self {
            state: LoadState::new(),
            pending: None,
            amount: DEFAULT_AMOUNT.to_string(),
            from: String::new(),
            to: String::new(),
            result: None,
            language,
        }
    }

    /// Kicks off the one rate fetch of this session. Later calls are ignored.
    pub fn start_loading(&mut self, provider: Arc<dyn RateProvider>) {
        if self.pending.is_some() || !self.state.is_loading() {
            debug!("Rate load already started");
            return;
        }
        self.pending = Some(loader::spawn_load(provider));
    }

    /// Applies the load outcome if it has arrived. Returns true once loading is over.
    pub fn poll_load(&mut self) -> bool {
        if let Some(pending) = self.pending.as_mut() {
            if let Some(outcome) = pending.try_take() {
                self.state.apply(outcome);
                self.pending = None;
            }
        }
        !self.state.is_loading()
    }

    /// Waits for the in-flight load, if any, and applies its outcome.
    pub async fn wait_loaded(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.state.apply(pending.wait().await);
        }
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.amount = amount.trim().to_string();
    }

    /// Picks the source currency. Only codes in [`Self::currency_options`] are
    /// accepted; anything else leaves the selection unchanged and returns false.
    pub fn select_from(&mut self, code: &str) -> bool {
        match self.offered_code(code) {
            Some(code) => {
                self.from = code.to_string();
                true
            }
            None => false,
        }
    }

    /// Picks the target currency, with the same rules as [`Self::select_from`].
    pub fn select_to(&mut self, code: &str) -> bool {
        match self.offered_code(code) {
            Some(code) => {
                self.to = code.to_string();
                true
            }
            None => false,
        }
    }

    fn offered_code(&self, code: &str) -> Option<&'static str> {
        let code = code.trim().to_uppercase();
        let offered = self.currency_options().into_iter().find(|c| *c == code);
        if offered.is_none() {
            debug!(%code, "Currency not selectable");
        }
        offered
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Converts the current amount between the selected currencies.
    ///
    /// A skipped conversion clears any previously shown result.
    pub fn convert(&mut self) -> Result<&Conversion, ConversionSkipped> {
        match converter::try_convert(&self.amount, &self.from, &self.to, self.state.rates()) {
            Ok(value) => {
                debug!(amount = %self.amount, from = %self.from, to = %self.to, value, "Converted");
                Ok(&*self.result.insert(Conversion {
                    amount: self.amount.clone(),
                    from: self.from.clone(),
                    to: self.to.clone(),
                    value,
                }))
            }
            Err(skipped) => {
                debug!(reason = %skipped, "Conversion skipped");
                self.result = None;
                Err(skipped)
            }
        }
    }

    /// Currencies offered in both selectors; empty until rates are loaded.
    pub fn currency_options(&self) -> Vec<&'static str> {
        converter::available_currencies(self.state.rates())
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    pub fn rates(&self) -> &RateTable {
        self.state.rates()
    }

    pub fn update_window(&self) -> Option<&UpdateWindow> {
        self.state.update_window()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn result(&self) -> Option<&Conversion> {
        self.result.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Default for ConverterSession {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::tests::{MockRateProvider, sample_snapshot};
    use std::sync::atomic::Ordering;

    async fn loaded_session() -> ConverterSession {
        let mut session = ConverterSession::new(Language::Ru);
        session.start_loading(Arc::new(MockRateProvider::succeeding()));
        session.wait_loaded().await;
        session
    }

    #[test]
    fn test_new_session_defaults() {
        let session = ConverterSession::default();
        assert!(session.is_loading());
        assert!(!session.is_loaded());
        assert_eq!(session.amount(), "1");
        assert_eq!(session.from(), "");
        assert_eq!(session.to(), "");
        assert!(session.result().is_none());
        assert!(session.currency_options().is_empty());
        assert_eq!(session.language(), Language::Ru);
    }

    #[tokio::test]
    async fn test_end_to_end_conversion() {
        let mut session = loaded_session().await;
        assert!(session.is_loaded());
        assert_eq!(session.currency_options(), vec!["USD", "KZT"]);
        assert_eq!(session.update_window().unwrap().last_update, "A");

        session.set_amount("100");
        session.select_from("USD");
        session.select_to("kzt");
        let conversion = session.convert().unwrap();
        assert_eq!(conversion.value, 45050.0);
        assert_eq!(conversion.to_string(), "100 USD = 45050 KZT");
        assert_eq!(session.result().unwrap().to, "KZT");
    }

    #[tokio::test]
    async fn test_skipped_conversion_clears_previous_result() {
        let mut session = loaded_session().await;
        session.select_from("USD");
        session.select_to("KZT");
        assert!(session.convert().is_ok());

        session.set_amount("");
        assert_eq!(session.convert(), Err(ConversionSkipped::InvalidAmount));
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_convert_before_selection_is_skipped() {
        let mut session = loaded_session().await;
        assert_eq!(session.convert(), Err(ConversionSkipped::MissingSelection));
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_failed_load_leaves_selectors_empty() {
        let mut session = ConverterSession::new(Language::Kz);
        session.start_loading(Arc::new(MockRateProvider::failing()));
        session.wait_loaded().await;

        assert!(!session.is_loading());
        assert!(!session.is_loaded());
        assert!(session.rates().is_empty());
        assert!(session.currency_options().is_empty());

        assert!(!session.select_from("USD"));
        assert!(!session.select_to("KZT"));
        assert_eq!(session.from(), "");
        assert_eq!(session.convert(), Err(ConversionSkipped::MissingSelection));
    }

    #[test]
    fn test_nothing_selectable_while_loading() {
        let mut session = ConverterSession::default();
        assert!(!session.select_from("USD"));
        assert!(!session.select_to("KZT"));
        assert_eq!(session.from(), "");
        assert_eq!(session.to(), "");
    }

    #[tokio::test]
    async fn test_codes_outside_allow_list_are_not_selectable() {
        let mut snapshot = sample_snapshot();
        snapshot.rates = [("USD", 1.0), ("KZT", 450.5), ("GBP", 0.79)]
            .into_iter()
            .collect();
        let mut session = ConverterSession::new(Language::Ru);
        session.start_loading(Arc::new(MockRateProvider::returning(snapshot)));
        session.wait_loaded().await;
        assert_eq!(session.currency_options(), vec!["USD", "KZT"]);

        session.set_amount("100");
        assert!(!session.select_from("GBP"));
        assert!(session.select_to("USD"));
        assert_eq!(session.from(), "");
        assert_eq!(session.convert(), Err(ConversionSkipped::MissingSelection));

        // A rejected code keeps the earlier selection
        assert!(session.select_from("kzt"));
        assert!(!session.select_from("gbp"));
        assert_eq!(session.from(), "KZT");
        assert!(session.convert().is_ok());
    }

    #[tokio::test]
    async fn test_load_starts_only_once() {
        let provider = Arc::new(MockRateProvider::succeeding());
        let mut session = ConverterSession::default();
        session.start_loading(provider.clone());
        session.start_loading(provider.clone());
        session.wait_loaded().await;
        session.start_loading(provider.clone());
        session.wait_loaded().await;

        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_poll_load_applies_outcome_when_ready() {
        let mut session = ConverterSession::default();
        session.start_loading(Arc::new(MockRateProvider::succeeding()));
        while !session.poll_load() {
            tokio::task::yield_now().await;
        }
        assert!(session.is_loaded());
        assert!(session.poll_load());
    }

    #[test]
    fn test_language_toggle() {
        let mut session = ConverterSession::default();
        session.set_language(Language::Kz);
        assert_eq!(session.language(), Language::Kz);
        session.set_language(Language::Ru);
        session.set_language(Language::Ru);
        assert_eq!(session.language(), Language::Ru);
        assert_eq!(session.amount(), "1");
        assert!(session.result().is_none());
    }
}
