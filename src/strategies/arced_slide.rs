//! The arced slide: the piece travels an arc (with rotation) that is not
//! linearly related to the handle position, and nothing in the static DOM
//! exposes that mapping. The strategy recovers it empirically — press the
//! handle and sweep it across the track, recording a trajectory sample at
//! each step — then ships images plus trajectory to the solver and replays
//! the returned offset with a human-style overshoot.

use tracing::debug;

use crate::api::SolverClient;
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::{ArcedSlideRequest, ChallengeType, Rect, TrajectorySample};
use crate::diagnostics::maybe_dump_request;
use crate::driver::Driver;
use crate::geometry::{box_center, is_stationary, rotation_from_transform, to_proportional};
use crate::selectors;

use super::{
    drag_horizontal_with_overshoot, element_image_b64, move_to_element_center, required_attribute,
    required_bounding_box, wait_for_element_stable,
};

/// Consecutive stationary detections before the sweep concludes the piece hit
/// its travel limit. Sampling past that point is wasted and looks robotic.
const STATIONARY_LIMIT: u32 = 10;

/// Minimum swept pixels before the stationarity check arms, so a slow piece
/// start is not mistaken for the travel limit.
const STATIONARY_ARM_DISTANCE: f64 = 100.0;

pub async fn solve(
    driver: &dyn Driver,
    client: &dyn SolverClient,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    if !driver
        .any_visible(selectors::ARCED_SLIDE_PUZZLE_IMAGE, None)
        .await?
    {
        debug!("went to solve arced slide but the puzzle image is not present");
        return Ok(());
    }

    let (start_x, start_y) =
        move_to_element_center(driver, selectors::ARCED_SLIDE_BUTTON, None).await?;
    driver.pointer_down(start_x, start_y).await?;

    // Track width comes from the background image, not the bar element — the
    // bar's markup varies by locale, the image always spans the track.
    let puzzle_box = required_bounding_box(driver, selectors::ARCED_SLIDE_PUZZLE_IMAGE, None).await?;
    let trajectory = sweep_trajectory(driver, config, start_x, start_y, &puzzle_box).await?;

    let request = ArcedSlideRequest {
        puzzle_image_b64: element_image_b64(driver, selectors::ARCED_SLIDE_PUZZLE_IMAGE, None)
            .await?,
        piece_image_b64: element_image_b64(driver, selectors::ARCED_SLIDE_PIECE_IMAGE, None)
            .await?,
        slide_piece_trajectory: trajectory,
    };
    maybe_dump_request(config, ChallengeType::ArcedSlide, &request);
    let solution = client.arced_slide(&request).await?;
    debug!(
        pixels = solution.pixels_from_slider_origin,
        "replaying solver's answer"
    );

    // The pointer currently sits at the end of the sweep; the replay glide
    // starts from the handle origin coordinates regardless.
    drag_horizontal_with_overshoot(
        driver,
        start_x,
        start_y,
        solution.pixels_from_slider_origin as f64,
    )
    .await
}

/// Drag the handle across the track in `mouse_step_size` increments,
/// sampling piece rotation and position at each stop. The pointer path is
/// diagonal (y drifts up with x) because a ruler-straight horizontal drag is
/// a bot signature. Exits early once the piece stops moving for
/// `STATIONARY_LIMIT` consecutive samples.
async fn sweep_trajectory(
    driver: &dyn Driver,
    config: &SolverConfig,
    start_x: f64,
    start_y: f64,
    puzzle_box: &Rect,
) -> Result<Vec<TrajectorySample>, SolverError> {
    let step = config.mouse_step_size.max(1);
    let track_width = puzzle_box.width;
    let arm_after = (STATIONARY_ARM_DISTANCE / f64::from(step)) as usize;

    let mut trajectory: Vec<TrajectorySample> = Vec::new();
    let mut stationary_streak = 0u32;
    let mut distance = 0u32;
    while f64::from(distance) < track_width {
        driver
            .pointer_move(start_x + f64::from(distance), start_y - f64::from(distance))
            .await?;
        wait_for_element_stable(driver, selectors::ARCED_SLIDE_PIECE_CONTAINER, None).await?;
        trajectory.push(sample_at(driver, distance, puzzle_box).await?);

        if trajectory.len() > arm_after {
            if is_stationary(&trajectory) {
                stationary_streak += 1;
            } else {
                stationary_streak = 0;
            }
            if stationary_streak >= STATIONARY_LIMIT {
                debug!(distance, "piece hit its travel limit, ending sweep early");
                break;
            }
        }
        distance += step;
    }
    debug!(samples = trajectory.len(), "trajectory sweep complete");
    Ok(trajectory)
}

/// One trajectory observation: piece rotation from its inline style, piece
/// center proportional to the puzzle image box (not the viewport).
async fn sample_at(
    driver: &dyn Driver,
    distance: u32,
    puzzle_box: &Rect,
) -> Result<TrajectorySample, SolverError> {
    let piece_box =
        required_bounding_box(driver, selectors::ARCED_SLIDE_PIECE_CONTAINER, None).await?;
    let style =
        required_attribute(driver, selectors::ARCED_SLIDE_PIECE_CONTAINER, "style", None).await?;
    let (center_x, center_y) = box_center(&piece_box);
    let piece_center = to_proportional(
        center_x - puzzle_box.x,
        center_y - puzzle_box.y,
        puzzle_box.width,
        puzzle_box.height,
    );
    Ok(TrajectorySample {
        pixels_from_slider_origin: distance,
        piece_rotation_angle: rotation_from_transform(&style),
        piece_center,
    })
}
