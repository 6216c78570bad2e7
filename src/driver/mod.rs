//! Capability interface over the browser automation layer. The core never
//! talks to a browser library directly — strategies and the classifier hold a
//! `&dyn Driver`, so each is testable against a scripted fake and the same
//! state machines run over CDP and WebDriver alike.
//!
//! Every locator-style call takes an optional iframe selector because the
//! storefront sometimes nests a familiar challenge one iframe deep, and the
//! iframe can appear or disappear between calls.

pub mod cdp;
pub mod webdriver;

use async_trait::async_trait;

use crate::core::error::SolverError;
use crate::core::types::Rect;

pub use cdp::CdpDriver;
pub use webdriver::WebDriverAdapter;

/// One browser/DOM round trip per call; every method may suspend.
#[async_trait]
pub trait Driver: Send + Sync {
    /// True iff at least one element matching `selector` is rendered visible.
    async fn any_visible(
        &self,
        selector: &str,
        frame: Option<&str>,
    ) -> Result<bool, SolverError>;

    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str, frame: Option<&str>) -> Result<usize, SolverError>;

    /// Bounding box of the first match, in top-document viewport pixels
    /// (iframe offsets already applied). `None` when nothing matches or the
    /// element has no layout.
    async fn bounding_box(
        &self,
        selector: &str,
        frame: Option<&str>,
    ) -> Result<Option<Rect>, SolverError>;

    /// Attribute of the first match; `None` when the element or attribute is
    /// absent.
    async fn attribute(
        &self,
        selector: &str,
        name: &str,
        frame: Option<&str>,
    ) -> Result<Option<String>, SolverError>;

    /// The attribute for every match, in DOM order.
    async fn attribute_of_all(
        &self,
        selector: &str,
        name: &str,
        frame: Option<&str>,
    ) -> Result<Vec<Option<String>>, SolverError>;

    /// Text content of the first match.
    async fn text_content(
        &self,
        selector: &str,
        frame: Option<&str>,
    ) -> Result<Option<String>, SolverError>;

    /// Click the `index`-th match (DOM order) at its center.
    async fn click_nth(
        &self,
        selector: &str,
        index: usize,
        frame: Option<&str>,
    ) -> Result<(), SolverError>;

    // Raw pointer primitives, in top-document viewport pixels. Pointer state
    // (pressed/released) persists across calls so a drag is
    // move → down → move… → up.
    async fn pointer_move(&self, x: f64, y: f64) -> Result<(), SolverError>;
    async fn pointer_down(&self, x: f64, y: f64) -> Result<(), SolverError>;
    async fn pointer_up(&self, x: f64, y: f64) -> Result<(), SolverError>;

    /// Some challenge flows open in a secondary window; rebind the session to
    /// the newest one when present. Returns whether a switch happened.
    async fn switch_to_popup_if_present(&self) -> Result<bool, SolverError>;
}
