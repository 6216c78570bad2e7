//! Automated solving of the storefront's verification challenges.
//!
//! The crate drives a real browser session, figures out which challenge
//! variant is on screen, gathers the evidence that variant needs (screenshots,
//! trajectories, challenge text), sends it to the hosted solver service, and
//! replays the answer as human-ish pointer input.
//!
//! Two browser bindings are supported behind one [`Driver`] trait: CDP via
//! `chromiumoxide` ([`CdpDriver`]) and WebDriver via `thirtyfour`
//! ([`WebDriverAdapter`]). The async [`Solver`] is the main entry point;
//! [`blocking::Solver`] wraps it for synchronous callers.

pub mod api;
pub mod blocking;
pub mod classify;
pub mod core;
pub mod diagnostics;
pub mod driver;
pub mod geometry;
pub mod parsers;
pub mod selectors;
pub mod solver;
pub mod strategies;

pub use api::{ApiClient, SolverClient};
pub use crate::core::config::SolverConfig;
pub use crate::core::error::SolverError;
pub use crate::core::types::{
    ArcedSlideRequest, ArcedSlideResponse, ChallengeType, MultiPointResponse, ProportionalPoint,
    PuzzleRequest, PuzzleResponse, Rect, SemanticShapesRequest, SwapTwoRequest,
    ThreeByThreeRequest, ThreeByThreeResponse, TrajectorySample, TwoImageRequest,
};
pub use driver::{CdpDriver, Driver, WebDriverAdapter};
pub use solver::Solver;
