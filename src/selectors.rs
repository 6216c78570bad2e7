//! CSS selector tables for the storefront's challenge widgets. Pure
//! configuration data — the hashed class fragments change when the site ships
//! a new bundle, so everything lives here and nowhere else.

pub const ARCED_SLIDE_PUZZLE_IMAGE: &str = "#slider > img";
pub const ARCED_SLIDE_PIECE_CONTAINER: &str = "#img-button";
pub const ARCED_SLIDE_PIECE_IMAGE: &str = "#img-button > img";
pub const ARCED_SLIDE_BUTTON: &str = "#slide-button";
pub const ARCED_SLIDE_UNIQUE_IDENTIFIERS: &[&str] = &[
    ".handleBar-vT4I5",
    ".vT4I57cQ",
    "div[style=\"width: 414px;\"] #slider",
    "div[style=\"width: 410px;\"] #slider",
];

pub const PUZZLE_BUTTON: &str = "#slide-button";
pub const PUZZLE_PUZZLE_IMAGE: &str = "#slider > img";
pub const PUZZLE_PIECE_IMAGE: &str = "#img-button > img";
pub const PUZZLE_UNIQUE_IDENTIFIERS: &[&str] = &["#Slider"];

// Occasionally the shapes challenge arrives nested one iframe deep; the
// classifier re-resolves iframe presence on every poll.
pub const SEMANTIC_SHAPES_IFRAME: &str = ".iframe-3eaNR";
pub const SEMANTIC_SHAPES_CHALLENGE_TEXT: &str = ".picture-text-2Alt0";
pub const SEMANTIC_SHAPES_IMAGE: &str = "#captchaImg";
pub const SEMANTIC_SHAPES_REFRESH_BUTTON: &str = ".refresh-27d6x";
/// Markers the widget paints where a click registered. Counted before and
/// after each click to detect clicks swallowed by the loading overlay.
pub const SEMANTIC_SHAPES_CLICK_MARKER: &str = ".redDot-1vVqb";
pub const SEMANTIC_SHAPES_UNIQUE_IDENTIFIERS: &[&str] = &[SEMANTIC_SHAPES_IFRAME];

pub const THREE_BY_THREE_IMAGE: &str = "img.loaded";
pub const THREE_BY_THREE_TEXT: &str = "div[class^=baseDialog] div[class^=subTitle]";
pub const THREE_BY_THREE_CONFIRM_BUTTON: &str = "div[class^=baseDialog] div[role=button]:has(span)";
pub const THREE_BY_THREE_UNIQUE_IDENTIFIERS: &[&str] = &["#imageSemantics img.loaded"];

pub const SWAP_TWO_IMAGE: &str = "#swapPuzzleImg";
pub const SWAP_TWO_UNIQUE_IDENTIFIERS: &[&str] = &["#swapPuzzleImg"];

pub const TWO_IMAGE_FIRST_IMAGE: &str = ".imgOne-1Cg9p img";
pub const TWO_IMAGE_SECOND_IMAGE: &str = ".imgTwo-2Rsvq img";
pub const TWO_IMAGE_CHALLENGE_TEXT: &str = ".twoImageTip-3nLhk";
pub const TWO_IMAGE_REFRESH_BUTTON: &str = ".refresh-27d6x";
pub const TWO_IMAGE_UNIQUE_IDENTIFIERS: &[&str] = &[".imgOne-1Cg9p", ".imgTwo-2Rsvq"];

/// Any of these visible means some challenge is on screen.
pub const CAPTCHA_PRESENCE_INDICATORS: &[&str] = &[
    "#imageSemantics img.loaded",
    "#slide-button",
    "#Slider",
    "#slider",
    "#swapPuzzleImg",
    ".imgOne-1Cg9p",
    SEMANTIC_SHAPES_IFRAME,
];
