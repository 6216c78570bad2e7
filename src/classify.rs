//! Challenge presence and type detection.
//!
//! The classifier polls the page at a fixed interval for each variant's
//! distinguishing markers, re-resolving iframe presence on every iteration
//! because the storefront mounts and unmounts the iframe dynamically. The
//! priority order is a fixed total order over the variants, so two
//! simultaneously matching marker sets always classify the same way.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::ChallengeType;
use crate::driver::Driver;
use crate::selectors;

/// Highest priority first. TwoImage sits last: it is the newest variant and
/// its markers are the weakest.
const CLASSIFICATION_ORDER: &[(ChallengeType, &[&str])] = &[
    (ChallengeType::Puzzle, selectors::PUZZLE_UNIQUE_IDENTIFIERS),
    (
        ChallengeType::ArcedSlide,
        selectors::ARCED_SLIDE_UNIQUE_IDENTIFIERS,
    ),
    (
        ChallengeType::SemanticShapes,
        selectors::SEMANTIC_SHAPES_UNIQUE_IDENTIFIERS,
    ),
    (
        ChallengeType::ThreeByThree,
        selectors::THREE_BY_THREE_UNIQUE_IDENTIFIERS,
    ),
    (
        ChallengeType::SwapTwo,
        selectors::SWAP_TWO_UNIQUE_IDENTIFIERS,
    ),
    (
        ChallengeType::TwoImage,
        selectors::TWO_IMAGE_UNIQUE_IDENTIFIERS,
    ),
];

const PRESENCE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Whether any element of the selector list is currently visible.
pub async fn any_selector_in_list_present(
    driver: &dyn Driver,
    selector_list: &[&str],
    frame: Option<&str>,
) -> Result<bool, SolverError> {
    for selector in selector_list {
        if driver.any_visible(selector, frame).await? {
            debug!(selector, "detected selector from list");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether a challenge is nested one iframe deep right now.
pub async fn iframe_present(driver: &dyn Driver) -> Result<bool, SolverError> {
    driver.any_visible("iframe", None).await
}

/// Poll until any presence indicator shows up or the timeout elapses.
pub async fn challenge_is_present(
    driver: &dyn Driver,
    timeout: Duration,
) -> Result<bool, SolverError> {
    let deadline = Instant::now() + timeout;
    loop {
        if any_selector_in_list_present(driver, selectors::CAPTCHA_PRESENCE_INDICATORS, None)
            .await?
        {
            debug!("challenge is present");
            return Ok(true);
        }
        if Instant::now() >= deadline {
            debug!("no challenge appeared within the timeout");
            return Ok(false);
        }
        sleep(PRESENCE_POLL_INTERVAL).await;
    }
}

/// Poll until every presence indicator is gone or the timeout elapses.
pub async fn challenge_is_absent(
    driver: &dyn Driver,
    timeout: Duration,
) -> Result<bool, SolverError> {
    let deadline = Instant::now() + timeout;
    loop {
        if !any_selector_in_list_present(driver, selectors::CAPTCHA_PRESENCE_INDICATORS, None)
            .await?
        {
            debug!("challenge is absent");
            return Ok(true);
        }
        if Instant::now() >= deadline {
            debug!("challenge still present at timeout");
            return Ok(false);
        }
        sleep(PRESENCE_POLL_INTERVAL).await;
    }
}

/// Bounded poll for the active challenge variant. Returns the `None` sentinel
/// when the budget runs out, so an unrecognized variant degrades to a warning
/// instead of crashing the session.
pub async fn identify_challenge(
    driver: &dyn Driver,
    config: &SolverConfig,
) -> Result<ChallengeType, SolverError> {
    for _ in 0..config.classify_max_polls {
        let frame = if iframe_present(driver).await? {
            Some("iframe")
        } else {
            None
        };
        for (challenge_type, markers) in CLASSIFICATION_ORDER {
            if any_selector_in_list_present(driver, markers, frame).await? {
                debug!(%challenge_type, "classified challenge");
                return Ok(*challenge_type);
            }
        }
        sleep(config.classify_interval).await;
    }
    warn!("classification budget exhausted without a match");
    Ok(ChallengeType::None)
}
