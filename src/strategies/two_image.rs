//! Two-image challenge: a pair of pictures and an instruction like "in figure
//! 1, click the items shown in figure 2, from left to right". The phrasing is
//! parsed, never guessed: any wording the parser does not recognize gets the
//! challenge refreshed for a new one.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::api::SolverClient;
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::{ChallengeType, TwoImageRequest};
use crate::diagnostics::maybe_dump_request;
use crate::driver::Driver;
use crate::parsers::{two_image_challenge_is_supported, two_image_target, TwoImageTarget};
use crate::selectors;

use super::{click_proportional, element_image_b64, required_text};

const ATTEMPTS: u32 = 3;

pub async fn solve(
    driver: &dyn Driver,
    client: &dyn SolverClient,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    for attempt in 0..ATTEMPTS {
        let challenge = required_text(driver, selectors::TWO_IMAGE_CHALLENGE_TEXT, None).await?;
        if !two_image_challenge_is_supported(&challenge) {
            debug!(attempt, text = challenge, "unsupported phrasing, refreshing");
            refresh(driver).await?;
            sleep(Duration::from_secs(3)).await;
            continue;
        }
        let target_selector = match two_image_target(&challenge) {
            Ok(TwoImageTarget::First) => selectors::TWO_IMAGE_FIRST_IMAGE,
            Ok(TwoImageTarget::Second) => selectors::TWO_IMAGE_SECOND_IMAGE,
            Err(SolverError::UnsupportedPhrasing(msg)) => {
                debug!(attempt, error = msg, "figure markers missing, refreshing");
                refresh(driver).await?;
                sleep(Duration::from_secs(3)).await;
                continue;
            }
            Err(e) => return Err(e),
        };

        let request = TwoImageRequest {
            image_one_b64: element_image_b64(driver, selectors::TWO_IMAGE_FIRST_IMAGE, None)
                .await?,
            image_two_b64: element_image_b64(driver, selectors::TWO_IMAGE_SECOND_IMAGE, None)
                .await?,
            challenge: challenge.clone(),
        };
        maybe_dump_request(config, ChallengeType::TwoImage, &request);

        let response = match client.two_image(&request).await {
            Ok(response) => response,
            Err(SolverError::BadRequest(msg)) => {
                debug!(attempt, error = msg, "solver could not answer, refreshing");
                refresh(driver).await?;
                sleep(Duration::from_secs(3)).await;
                continue;
            }
            Err(e) => return Err(e),
        };

        for point in &response.proportional_points {
            click_proportional(
                driver,
                target_selector,
                point.proportion_x,
                point.proportion_y,
                None,
            )
            .await?;
            sleep(Duration::from_secs(1)).await;
        }
        debug!("applied two-image answer");
        return Ok(());
    }
    debug!("two-image retries exhausted");
    Ok(())
}

async fn refresh(driver: &dyn Driver) -> Result<(), SolverError> {
    driver
        .click_nth(selectors::TWO_IMAGE_REFRESH_BUTTON, 0, None)
        .await
}
