//! Per-challenge solving strategies plus the pointer/evidence helpers they
//! share. Every strategy has the same contract: mutate page state so that, on
//! success, the challenge dismisses itself — success is observed externally
//! by the orchestrator re-checking presence, never by a return value.

pub mod arced_slide;
pub mod puzzle;
pub mod semantic_shapes;
pub mod swap_two;
pub mod three_by_three;
pub mod two_image;

use std::time::Duration;

use rand::distr::{Distribution, Uniform};
use tokio::time::sleep;
use tracing::debug;

use crate::api::{image_src_to_b64, SolverClient};
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::{ChallengeType, MultiPointResponse, Rect};
use crate::driver::Driver;
use crate::geometry::box_center;

/// Dispatch to the strategy matching the classified type.
pub async fn dispatch(
    challenge_type: ChallengeType,
    driver: &dyn Driver,
    client: &dyn SolverClient,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    match challenge_type {
        ChallengeType::Puzzle => puzzle::solve(driver, client, config).await,
        ChallengeType::ArcedSlide => arced_slide::solve(driver, client, config).await,
        ChallengeType::SemanticShapes => semantic_shapes::solve(driver, client, config).await,
        ChallengeType::ThreeByThree => three_by_three::solve(driver, client, config).await,
        ChallengeType::SwapTwo => swap_two::solve(driver, client, config).await,
        ChallengeType::TwoImage => two_image::solve(driver, client, config).await,
        ChallengeType::None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Evidence helpers — every missing piece of DOM state is an Evidence error
// that aborts the current attempt and bubbles to the orchestrator.
// ---------------------------------------------------------------------------

pub(crate) async fn required_bounding_box(
    driver: &dyn Driver,
    selector: &str,
    frame: Option<&str>,
) -> Result<Rect, SolverError> {
    driver
        .bounding_box(selector, frame)
        .await?
        .ok_or_else(|| SolverError::Evidence(format!("no bounding box for {selector}")))
}

pub(crate) async fn required_attribute(
    driver: &dyn Driver,
    selector: &str,
    name: &str,
    frame: Option<&str>,
) -> Result<String, SolverError> {
    driver
        .attribute(selector, name, frame)
        .await?
        .ok_or_else(|| SolverError::Evidence(format!("{selector} had no {name} attribute")))
}

pub(crate) async fn required_text(
    driver: &dyn Driver,
    selector: &str,
    frame: Option<&str>,
) -> Result<String, SolverError> {
    driver
        .text_content(selector, frame)
        .await?
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SolverError::Evidence(format!("{selector} had no text content")))
}

/// Base64 payload of an `<img>` element's `src`.
pub(crate) async fn element_image_b64(
    driver: &dyn Driver,
    selector: &str,
    frame: Option<&str>,
) -> Result<String, SolverError> {
    let src = required_attribute(driver, selector, "src", frame).await?;
    image_src_to_b64(&src).await
}

// ---------------------------------------------------------------------------
// Pointer helpers
// ---------------------------------------------------------------------------

/// A short human-ish pause, 90-900 ms.
pub(crate) async fn organic_pause() {
    let ms = {
        let mut rng = rand::rng();
        Uniform::new(90u64, 900).unwrap().sample(&mut rng)
    };
    sleep(Duration::from_millis(ms)).await;
}

/// Move the pointer in small interpolated steps so the motion reads as a
/// drag, not a teleport.
pub(crate) async fn pointer_glide(
    driver: &dyn Driver,
    from: (f64, f64),
    to: (f64, f64),
    steps: u32,
) -> Result<(), SolverError> {
    let steps = steps.max(1);
    for i in 1..=steps {
        let t = f64::from(i) / f64::from(steps);
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        driver.pointer_move(x, y).await?;
        sleep(Duration::from_millis(5)).await;
    }
    Ok(())
}

/// Press, settle, release at a point.
pub(crate) async fn click_at(driver: &dyn Driver, x: f64, y: f64) -> Result<(), SolverError> {
    driver.pointer_move(x, y).await?;
    organic_pause().await;
    driver.pointer_down(x, y).await?;
    sleep(Duration::from_millis(13)).await;
    driver.pointer_up(x, y).await?;
    organic_pause().await;
    Ok(())
}

/// Click inside an element at a point given as fractions of its size.
pub(crate) async fn click_proportional(
    driver: &dyn Driver,
    selector: &str,
    proportion_x: f64,
    proportion_y: f64,
    frame: Option<&str>,
) -> Result<(), SolverError> {
    let rect = required_bounding_box(driver, selector, frame).await?;
    let x = rect.x + proportion_x * rect.width;
    let y = rect.y + proportion_y * rect.height;
    click_at(driver, x, y).await?;
    debug!(selector, x, y, "clicked proportional point");
    Ok(())
}

/// Press at the first point, drag to the second, release — both given as
/// proportions of the element's box. Exactly two points is a hard contract:
/// anything else fails before a single pointer event is issued.
pub(crate) async fn drag_proportional(
    driver: &dyn Driver,
    selector: &str,
    points: &MultiPointResponse,
    frame: Option<&str>,
) -> Result<(), SolverError> {
    let [start, end] = points.proportional_points.as_slice() else {
        return Err(SolverError::Contract(format!(
            "expected exactly 2 proportional points, got {}",
            points.proportional_points.len()
        )));
    };
    let rect = required_bounding_box(driver, selector, frame).await?;
    let start_x = rect.x + start.proportion_x * rect.width;
    let start_y = rect.y + start.proportion_y * rect.height;
    let end_x = rect.x + end.proportion_x * rect.width;
    let end_y = rect.y + end.proportion_y * rect.height;
    driver.pointer_move(start_x, start_y).await?;
    driver.pointer_down(start_x, start_y).await?;
    pointer_glide(driver, (start_x, start_y), (end_x, end_y), 100).await?;
    driver.pointer_up(end_x, end_y).await?;
    debug!(start_x, start_y, end_x, end_y, "dragged between points");
    Ok(())
}

/// Move the pointer to an element's center; returns the center.
pub(crate) async fn move_to_element_center(
    driver: &dyn Driver,
    selector: &str,
    frame: Option<&str>,
) -> Result<(f64, f64), SolverError> {
    let rect = required_bounding_box(driver, selector, frame).await?;
    let (x, y) = box_center(&rect);
    driver.pointer_move(x, y).await?;
    Ok((x, y))
}

/// Glide to `start + distance`, overshoot 1-4 px on both axes, correct back,
/// then release — mimicking human overcorrection at the end of a drag.
pub(crate) async fn drag_horizontal_with_overshoot(
    driver: &dyn Driver,
    start_x: f64,
    start_y: f64,
    distance: f64,
) -> Result<(), SolverError> {
    let target = (start_x + distance, start_y);
    pointer_glide(driver, (start_x, start_y), target, 100).await?;
    let overshoot = {
        let mut rng = rand::rng();
        Uniform::new_inclusive(1u32, 4).unwrap().sample(&mut rng)
    } as f64;
    let past = (target.0 + overshoot, target.1 + overshoot);
    pointer_glide(driver, target, past, 25).await?;
    pointer_glide(driver, past, target, 15).await?;
    sleep(Duration::from_millis(200)).await;
    driver.pointer_up(target.0, target.1).await?;
    Ok(())
}

/// Wait until an element's bounding box stops changing between two reads, or
/// give up after a bounded number of probes. Used by the arced-slide sweep:
/// the piece animates after every handle move.
pub(crate) async fn wait_for_element_stable(
    driver: &dyn Driver,
    selector: &str,
    frame: Option<&str>,
) -> Result<(), SolverError> {
    let mut previous = required_bounding_box(driver, selector, frame).await?;
    for _ in 0..20 {
        sleep(Duration::from_millis(50)).await;
        let current = required_bounding_box(driver, selector, frame).await?;
        if current == previous {
            return Ok(());
        }
        previous = current;
    }
    debug!(selector, "element never settled, proceeding with last position");
    Ok(())
}
