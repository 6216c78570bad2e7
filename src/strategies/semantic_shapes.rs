//! Image + free-text challenge. The page fights back two ways: a loading
//! overlay can silently swallow clicks, and the challenge can auto-refresh
//! while a solve request is in flight. Every click is therefore verified by
//! counting the widget's click markers, and the challenge text is re-read
//! after the solver responds so a stale answer is never applied.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::api::SolverClient;
use crate::classify::{challenge_is_present, iframe_present};
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::{ChallengeType, SemanticShapesRequest};
use crate::diagnostics::maybe_dump_request;
use crate::driver::Driver;
use crate::selectors;

use super::{click_proportional, element_image_b64, required_text};

const ATTEMPTS: u32 = 3;
/// Clicks at slightly perturbed offsets before giving up on one point.
const CLICK_RETRIES: u32 = 3;

pub async fn solve(
    driver: &dyn Driver,
    client: &dyn SolverClient,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    for attempt in 0..ATTEMPTS {
        let frame = if iframe_present(driver).await? {
            Some("iframe")
        } else {
            None
        };

        // Let the entrance animation and loading spinner finish.
        for i in (1..=3).rev() {
            debug!(attempt, "gathering shapes evidence in {i}");
            sleep(Duration::from_secs(1)).await;
        }

        let image_b64 = element_image_b64(driver, selectors::SEMANTIC_SHAPES_IMAGE, frame).await?;
        let challenge =
            required_text(driver, selectors::SEMANTIC_SHAPES_CHALLENGE_TEXT, frame).await?;
        let request = SemanticShapesRequest {
            image_b64,
            challenge: challenge.clone(),
        };
        maybe_dump_request(config, ChallengeType::SemanticShapes, &request);

        let response = match client.semantic_shapes(&request).await {
            Ok(response) => response,
            Err(SolverError::BadRequest(msg)) => {
                debug!(error = msg, "solver could not answer, refreshing challenge");
                refresh(driver, frame).await?;
                sleep(Duration::from_secs(3)).await;
                continue;
            }
            Err(e) => return Err(e),
        };

        // The page may have refreshed the challenge while the request was in
        // flight; an answer must never be applied against a stale challenge.
        let challenge_now =
            required_text(driver, selectors::SEMANTIC_SHAPES_CHALLENGE_TEXT, frame).await?;
        if challenge_now != challenge {
            debug!("challenge text changed mid-request, discarding answer");
            refresh(driver, frame).await?;
            continue;
        }

        for point in &response.proportional_points {
            let markers_before = driver
                .count(selectors::SEMANTIC_SHAPES_CLICK_MARKER, frame)
                .await?;
            for nudge in 0..CLICK_RETRIES {
                let offset = f64::from(nudge) / 50.0;
                click_proportional(
                    driver,
                    selectors::SEMANTIC_SHAPES_IMAGE,
                    point.proportion_x + offset,
                    point.proportion_y + offset,
                    frame,
                )
                .await?;
                let markers_now = driver
                    .count(selectors::SEMANTIC_SHAPES_CLICK_MARKER, frame)
                    .await?;
                if markers_now > markers_before {
                    debug!("click registered, a new marker appeared");
                    break;
                }
                debug!("no new marker, clicking again at a nudged offset");
            }
            sleep(Duration::from_secs(1)).await;
        }

        for i in (1..=5).rev() {
            debug!("validating answer in {i}");
            sleep(Duration::from_secs(1)).await;
        }

        if challenge_is_present(driver, Duration::from_secs(1)).await? {
            debug!("challenge survived the answer, likely an unclickable region; refreshing");
            refresh(driver, frame).await?;
            continue;
        }
        debug!("solved semantic shapes");
        return Ok(());
    }
    debug!("semantic shapes retries exhausted");
    Ok(())
}

async fn refresh(driver: &dyn Driver, frame: Option<&str>) -> Result<(), SolverError> {
    driver
        .click_nth(selectors::SEMANTIC_SHAPES_REFRESH_BUTTON, 0, frame)
        .await
}
