//! The orchestrator: detect → classify → solve → verify, bounded by a retry
//! budget. The loop is deliberately best-effort — a challenge that never
//! appears, or one that survives every attempt, both end in `Ok(())` so the
//! caller's scraping flow continues; only solver-account problems (bad key,
//! dead service, transport failure) abort it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiClient, SolverClient};
use crate::classify::{challenge_is_absent, challenge_is_present, identify_challenge};
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::ChallengeType;
use crate::driver::Driver;
use crate::strategies;

pub struct Solver {
    driver: Arc<dyn Driver>,
    client: Arc<dyn SolverClient>,
    config: SolverConfig,
}

impl Solver {
    /// Wire a driver to the hosted solver service.
    pub fn new(driver: Arc<dyn Driver>, config: SolverConfig) -> Result<Self, SolverError> {
        let client = Arc::new(ApiClient::new(&config)?);
        Ok(Self {
            driver,
            client,
            config,
        })
    }

    /// Same orchestrator over a custom solver client.
    pub fn with_client(
        driver: Arc<dyn Driver>,
        client: Arc<dyn SolverClient>,
        config: SolverConfig,
    ) -> Self {
        Self {
            driver,
            client,
            config,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Detect, classify, and clear whatever challenge is on screen. Returns
    /// `Ok(())` when no challenge appears within the detection window, when a
    /// solve attempt verifiably dismisses it, or when the retry budget runs
    /// out; fatal solver-service errors are the only early exit.
    pub async fn solve_captcha_if_present(&self) -> Result<(), SolverError> {
        // Challenge flows sometimes open in a fresh window; a failure to probe
        // for one is not worth aborting over.
        match self.driver.switch_to_popup_if_present().await {
            Ok(true) => debug!("rebound to a popup window"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "popup probe failed, staying on current window"),
        }

        for attempt in 0..self.config.retries {
            if !challenge_is_present(self.driver.as_ref(), self.config.detect_timeout).await? {
                info!("no challenge present");
                return Ok(());
            }

            let challenge_type =
                identify_challenge(self.driver.as_ref(), &self.config).await?;
            if challenge_type == ChallengeType::None {
                // Still verify below: a variant we cannot name may have
                // dismissed itself while the classifier was polling.
                warn!(attempt, "challenge markers present but variant unrecognized");
            } else {
                info!(attempt, %challenge_type, "attempting solve");
                if let Err(e) = strategies::dispatch(
                    challenge_type,
                    self.driver.as_ref(),
                    self.client.as_ref(),
                    &self.config,
                )
                .await
                {
                    if e.is_fatal() {
                        return Err(e);
                    }
                    debug!(attempt, error = %e, "attempt failed, retrying");
                    continue;
                }
            }

            if challenge_is_absent(self.driver.as_ref(), self.config.verify_timeout).await? {
                info!(attempt, "challenge cleared");
                return Ok(());
            }
            debug!(attempt, "challenge still on screen after solve attempt");
        }
        warn!("retry budget exhausted, continuing anyway");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn solver_is_shareable_across_tasks() {
        assert_send_sync::<Solver>();
    }
}
