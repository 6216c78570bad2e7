//! Straight slide puzzle. Quirk: the widget only renders its real piece
//! images after the handle has already moved a few pixels, so evidence is
//! gathered mid-drag, never before pressing.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::api::SolverClient;
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::{ChallengeType, PuzzleRequest};
use crate::diagnostics::maybe_dump_request;
use crate::driver::Driver;
use crate::geometry::box_center;
use crate::selectors;

use super::{element_image_b64, required_bounding_box};

/// How far the handle must travel before the widget swaps in the real images.
const IMAGE_RENDER_DISTANCE: u32 = 10;

pub async fn solve(
    driver: &dyn Driver,
    client: &dyn SolverClient,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    let button = required_bounding_box(driver, selectors::PUZZLE_BUTTON, None).await?;
    let (start_x, start_y) = box_center(&button);
    driver.pointer_move(start_x, start_y).await?;
    driver.pointer_down(start_x, start_y).await?;

    // Eased pre-drag: logarithmic y-drift keeps the path from being a
    // perfectly straight machine line.
    for pixel in 1..=IMAGE_RENDER_DISTANCE {
        let x = start_x + f64::from(pixel);
        let y = start_y + f64::from(pixel).ln_1p();
        driver.pointer_move(x, y).await?;
        sleep(Duration::from_millis(20)).await;
    }
    debug!("pre-dragged {IMAGE_RENDER_DISTANCE} pixels, images are now live");

    let request = PuzzleRequest {
        puzzle_image_b64: element_image_b64(driver, selectors::PUZZLE_PUZZLE_IMAGE, None).await?,
        piece_image_b64: element_image_b64(driver, selectors::PUZZLE_PIECE_IMAGE, None).await?,
    };
    maybe_dump_request(config, ChallengeType::Puzzle, &request);
    let response = client.puzzle(&request).await?;

    // The slide track's own markup varies by locale and its width is
    // unreliable; the background image's rendered width always matches the
    // track, so the ratio is resolved against the image.
    let image = required_bounding_box(driver, selectors::PUZZLE_PUZZLE_IMAGE, None).await?;
    let target_distance = (response.slide_x_proportion * image.width).round() as u32;
    debug!(target_distance, "continuing drag to solver's answer");

    for pixel in IMAGE_RENDER_DISTANCE..=target_distance {
        let x = start_x + f64::from(pixel);
        let y = start_y + f64::from(pixel).ln_1p();
        driver.pointer_move(x, y).await?;
        sleep(Duration::from_millis(10)).await;
    }
    sleep(Duration::from_millis(500)).await;
    driver
        .pointer_up(start_x + f64::from(target_distance), start_y)
        .await?;
    debug!("released puzzle handle");
    Ok(())
}
