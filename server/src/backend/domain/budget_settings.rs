//! Process-wide monthly budget setting.
//!
//! The configured budget is the default for the lifetime of the process. The
//! bot and the HTTP API may replace it with a runtime override, which is held
//! in memory only and disappears on restart.

use std::sync::{Arc, PoisonError, RwLock};

use shared::BudgetSource;
use tracing::info;

use super::models::ValidationError;

#[derive(Debug)]
struct BudgetState {
    default: f64,
    runtime_override: Option<f64>,
}

/// Cloneable handle shared by every caller that needs the effective budget
#[derive(Debug, Clone)]
pub struct BudgetSettings {
    state: Arc<RwLock<BudgetState>>,
}

impl BudgetSettings {
    pub fn new(default: f64) -> Self {
        Self {
            state: Arc::new(RwLock::new(BudgetState {
                default,
                runtime_override: None,
            })),
        }
    }

    /// The override if one is set, otherwise the configured default
    pub fn monthly_budget(&self) -> f64 {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.runtime_override.unwrap_or(state.default)
    }

    pub fn source(&self) -> BudgetSource {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match state.runtime_override {
            Some(_) => BudgetSource::RuntimeOverride,
            None => BudgetSource::Default,
        }
    }

    pub fn set_override(&self, amount: f64) -> Result<(), ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.runtime_override = Some(amount);
        info!("💰 Monthly budget overridden to {:.2}", amount);
        Ok(())
    }

    /// Drop the override and go back to the configured default
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.runtime_override = None;
        info!("💰 Monthly budget reset to default {:.2}", state.default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let settings = BudgetSettings::new(12000.0);
        assert_eq!(settings.monthly_budget(), 12000.0);
        assert_eq!(settings.source(), BudgetSource::Default);
    }

    #[test]
    fn test_override_and_reset() {
        let settings = BudgetSettings::new(12000.0);
        settings.set_override(15000.0).unwrap();
        assert_eq!(settings.monthly_budget(), 15000.0);
        assert_eq!(settings.source(), BudgetSource::RuntimeOverride);

        settings.reset();
        assert_eq!(settings.monthly_budget(), 12000.0);
        assert_eq!(settings.source(), BudgetSource::Default);
    }

    #[test]
    fn test_rejects_invalid_override() {
        let settings = BudgetSettings::new(12000.0);
        assert_eq!(settings.set_override(0.0), Err(ValidationError::NonPositiveAmount));
        assert_eq!(settings.set_override(-5.0), Err(ValidationError::NonPositiveAmount));
        assert_eq!(settings.set_override(f64::NAN), Err(ValidationError::NonFiniteAmount));
        assert_eq!(settings.monthly_budget(), 12000.0);
    }

    #[test]
    fn test_clones_share_state() {
        let settings = BudgetSettings::new(12000.0);
        let handle = settings.clone();
        handle.set_override(9000.0).unwrap();
        assert_eq!(settings.monthly_budget(), 9000.0);
    }
}
