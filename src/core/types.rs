use serde::{Deserialize, Serialize};

/// The challenge variants the storefront rotates through. `None` is the
/// sentinel returned when classification exhausts its polling budget without
/// a match — the orchestrator logs it and re-verifies instead of crashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeType {
    Puzzle,
    ArcedSlide,
    SemanticShapes,
    ThreeByThree,
    SwapTwo,
    TwoImage,
    None,
}

impl ChallengeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeType::Puzzle => "puzzle",
            ChallengeType::ArcedSlide => "arced_slide",
            ChallengeType::SemanticShapes => "semantic_shapes",
            ChallengeType::ThreeByThree => "three_by_three",
            ChallengeType::SwapTwo => "swap_two",
            ChallengeType::TwoImage => "two_image",
            ChallengeType::None => "none",
        }
    }
}

impl std::fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewport-pixel rectangle: origin plus size, as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A point expressed as fractions of its container's width and height.
/// Resolution-independent; must be recomputed after any container resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProportionalPoint {
    pub proportion_x: f64,
    pub proportion_y: f64,
}

/// One observation from the arced-slide sweep: where the drag handle was
/// (raw pixels from its origin) and where the puzzle piece ended up
/// (proportional center within the puzzle image, plus its CSS rotation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectorySample {
    pub pixels_from_slider_origin: u32,
    pub piece_rotation_angle: f64,
    pub piece_center: ProportionalPoint,
}

// ---------------------------------------------------------------------------
// Wire objects, one request/response pair per challenge type. Field names are
// snake_case internally and camelCase on the wire.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRequest {
    pub puzzle_image_b64: String,
    pub piece_image_b64: String,
}

/// Location of the slide answer as a fraction of the slide track width.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleResponse {
    pub slide_x_proportion: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcedSlideRequest {
    pub puzzle_image_b64: String,
    pub piece_image_b64: String,
    pub slide_piece_trajectory: Vec<TrajectorySample>,
}

/// The answer is an absolute pixel offset from the drag handle's origin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcedSlideResponse {
    pub pixels_from_slider_origin: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticShapesRequest {
    pub image_b64: String,
    pub challenge: String,
}

/// Ordered click (or drag) targets inside the challenge image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPointResponse {
    pub proportional_points: Vec<ProportionalPoint>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeByThreeRequest {
    /// Target object names, in the order they must be clicked.
    pub objects_of_interest: Vec<String>,
    /// The nine panel images in row-major order (rows top to bottom).
    pub images: Vec<String>,
}

/// Row-major panel indices (0-8) to click in sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeByThreeResponse {
    pub solution_indices: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTwoRequest {
    pub image_b64: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoImageRequest {
    pub image_one_b64: String,
    pub image_two_b64: String,
    pub challenge: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_fields_are_camel_case() {
        let sample = TrajectorySample {
            pixels_from_slider_origin: 25,
            piece_rotation_angle: 12.5,
            piece_center: ProportionalPoint {
                proportion_x: 0.4,
                proportion_y: 0.6,
            },
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"pixelsFromSliderOrigin\":25"));
        assert!(json.contains("\"pieceRotationAngle\":12.5"));
        assert!(json.contains("\"proportionX\":0.4"));
    }

    #[test]
    fn puzzle_response_parses_wire_shape() {
        let resp: PuzzleResponse = serde_json::from_str(r#"{"slideXProportion":0.5}"#).unwrap();
        assert_eq!(resp.slide_x_proportion, 0.5);
    }

    #[test]
    fn multi_point_response_parses_wire_shape() {
        let resp: MultiPointResponse = serde_json::from_str(
            r#"{"proportionalPoints":[{"proportionX":0.1,"proportionY":0.9}]}"#,
        )
        .unwrap();
        assert_eq!(resp.proportional_points.len(), 1);
        assert_eq!(resp.proportional_points[0].proportion_y, 0.9);
    }
}
