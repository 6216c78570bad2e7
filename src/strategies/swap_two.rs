//! Swap-two: one scrambled image; the answer is a single drag that swaps two
//! tiles back into place. The response must contain exactly two points —
//! validated before any pointer event is issued.

use crate::api::SolverClient;
use crate::classify::iframe_present;
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::{ChallengeType, SwapTwoRequest};
use crate::diagnostics::maybe_dump_request;
use crate::driver::Driver;
use crate::selectors;

use super::{drag_proportional, element_image_b64};

pub async fn solve(
    driver: &dyn Driver,
    client: &dyn SolverClient,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    let frame = if iframe_present(driver).await? {
        Some("iframe")
    } else {
        None
    };
    let request = SwapTwoRequest {
        image_b64: element_image_b64(driver, selectors::SWAP_TWO_IMAGE, frame).await?,
    };
    maybe_dump_request(config, ChallengeType::SwapTwo, &request);
    let response = client.swap_two(&request).await?;
    drag_proportional(driver, selectors::SWAP_TWO_IMAGE, &response, frame).await
}
