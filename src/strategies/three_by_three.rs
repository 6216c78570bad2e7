//! 3x3 grid: nine panel images read in row-major order plus the quoted
//! object list parsed out of the challenge sentence. The solver returns panel
//! indices to click in sequence, then the grid's confirm button seals it.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::api::{image_src_to_b64, SolverClient};
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::{ChallengeType, ThreeByThreeRequest};
use crate::diagnostics::maybe_dump_request;
use crate::driver::Driver;
use crate::parsers::objects_of_interest;
use crate::selectors;

use super::{click_proportional, required_text};

const PANEL_COUNT: usize = 9;

pub async fn solve(
    driver: &dyn Driver,
    client: &dyn SolverClient,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    let sources = driver
        .attribute_of_all(selectors::THREE_BY_THREE_IMAGE, "src", None)
        .await?;
    if sources.len() != PANEL_COUNT {
        return Err(SolverError::Evidence(format!(
            "expected {PANEL_COUNT} grid images, found {}",
            sources.len()
        )));
    }
    let mut images = Vec::with_capacity(PANEL_COUNT);
    for (i, src) in sources.into_iter().enumerate() {
        let src = src
            .ok_or_else(|| SolverError::Evidence(format!("grid image {i} had no src attribute")))?;
        images.push(image_src_to_b64(&src).await?);
    }

    let challenge_text = required_text(driver, selectors::THREE_BY_THREE_TEXT, None).await?;
    let objects = objects_of_interest(&challenge_text);
    if objects.is_empty() {
        return Err(SolverError::Evidence(format!(
            "no quoted object names in challenge text: {challenge_text}"
        )));
    }

    let request = ThreeByThreeRequest {
        objects_of_interest: objects,
        images,
    };
    maybe_dump_request(config, ChallengeType::ThreeByThree, &request);
    let response = client.three_by_three(&request).await?;

    for &index in &response.solution_indices {
        if index >= PANEL_COUNT {
            return Err(SolverError::Contract(format!(
                "solution index {index} outside the 3x3 grid"
            )));
        }
    }
    for &index in &response.solution_indices {
        debug!(index, "clicking grid panel");
        driver
            .click_nth(selectors::THREE_BY_THREE_IMAGE, index, None)
            .await?;
        sleep(Duration::from_millis(1337)).await;
    }
    click_proportional(driver, selectors::THREE_BY_THREE_CONFIRM_BUTTON, 0.5, 0.5, None).await
}
