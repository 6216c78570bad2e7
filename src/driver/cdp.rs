//! CDP binding over `chromiumoxide`. DOM queries run as injected JavaScript
//! against the live page; pointer input goes through `Input.dispatchMouseEvent`
//! so the page sees trusted-looking events rather than synthetic DOM clicks.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
};
use chromiumoxide::{Browser, Page};
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::error::SolverError;
use crate::core::types::Rect;

use super::Driver;

pub struct CdpDriver {
    page: Mutex<Page>,
    /// Whether the left button is currently held. Moves dispatched while held
    /// must carry the button, or the page sees `buttons == 0` and drag
    /// handlers ignore them.
    pressed: AtomicBool,
    /// Needed only for popup discovery; without it `switch_to_popup_if_present`
    /// is a no-op.
    browser: Option<Browser>,
}

impl CdpDriver {
    pub fn new(page: Page) -> Self {
        Self {
            page: Mutex::new(page),
            pressed: AtomicBool::new(false),
            browser: None,
        }
    }

    /// Popup/tab switching requires enumerating the browser's targets.
    pub fn with_browser(page: Page, browser: Browser) -> Self {
        Self {
            page: Mutex::new(page),
            pressed: AtomicBool::new(false),
            browser: Some(browser),
        }
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, js: String) -> Result<T, SolverError> {
        let page = self.page.lock().await;
        let value = page
            .evaluate(js)
            .await
            .map_err(|e| SolverError::Driver(format!("cdp evaluate failed: {e}")))?;
        value
            .into_value::<T>()
            .map_err(|e| SolverError::Driver(format!("cdp result had unexpected shape: {e}")))
    }

    async fn dispatch_mouse(
        &self,
        event_type: DispatchMouseEventType,
        x: f64,
        y: f64,
    ) -> Result<(), SolverError> {
        let held = self.pressed.load(Ordering::Acquire);
        let params = mouse_event_params(event_type, x, y, held)?;
        let page = self.page.lock().await;
        page.execute(params)
            .await
            .map_err(|e| SolverError::Driver(format!("cdp mouse dispatch failed: {e}")))?;
        Ok(())
    }
}

/// Build the `Input.dispatchMouseEvent` params. Presses and releases always
/// name the left button; a move names it only while the button is held, so
/// mid-drag moves read as dragging and hover moves stay button-less.
fn mouse_event_params(
    event_type: DispatchMouseEventType,
    x: f64,
    y: f64,
    held: bool,
) -> Result<DispatchMouseEventParams, SolverError> {
    let mut builder = DispatchMouseEventParams::builder()
        .r#type(event_type.clone())
        .x(x)
        .y(y);
    match event_type {
        DispatchMouseEventType::MousePressed | DispatchMouseEventType::MouseReleased => {
            builder = builder.button(MouseButton::Left).click_count(1);
        }
        DispatchMouseEventType::MouseMoved if held => {
            builder = builder.button(MouseButton::Left).buttons(1);
        }
        _ => {}
    }
    builder
        .build()
        .map_err(|e| SolverError::Driver(format!("mouse event build failed: {e}")))
}

/// Quote a string as a JavaScript literal.
fn js_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Script prologue binding `doc` (the search document), `off` (the iframe's
/// viewport offset) and `els` (all matches). Cross-origin iframes yield an
/// inaccessible `contentDocument` and resolve as "no matches".
fn query_prologue(selector: &str, frame: Option<&str>) -> String {
    let sel = js_str(selector);
    match frame {
        Some(frame_sel) => {
            let fr = js_str(frame_sel);
            format!(
                "const fr = document.querySelector({fr});\n\
                 const doc = fr ? fr.contentDocument : null;\n\
                 const fb = fr ? fr.getBoundingClientRect() : {{ x: 0, y: 0 }};\n\
                 const off = {{ x: fb.x, y: fb.y }};\n\
                 const els = doc ? Array.from(doc.querySelectorAll({sel})) : [];"
            )
        }
        None => format!(
            "const doc = document;\n\
             const off = {{ x: 0, y: 0 }};\n\
             const els = Array.from(doc.querySelectorAll({sel}));"
        ),
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn any_visible(&self, selector: &str, frame: Option<&str>) -> Result<bool, SolverError> {
        let js = format!(
            "(() => {{\n{}\n\
             for (const el of els) {{\n\
               const view = el.ownerDocument.defaultView || window;\n\
               const st = view.getComputedStyle(el);\n\
               if (st.display === 'none' || st.visibility === 'hidden') continue;\n\
               const r = el.getBoundingClientRect();\n\
               if (r.width > 0 && r.height > 0) return true;\n\
             }}\n\
             return false;\n}})()",
            query_prologue(selector, frame)
        );
        self.eval(js).await
    }

    async fn count(&self, selector: &str, frame: Option<&str>) -> Result<usize, SolverError> {
        let js = format!(
            "(() => {{\n{}\nreturn els.length;\n}})()",
            query_prologue(selector, frame)
        );
        self.eval(js).await
    }

    async fn bounding_box(
        &self,
        selector: &str,
        frame: Option<&str>,
    ) -> Result<Option<Rect>, SolverError> {
        let js = format!(
            "(() => {{\n{}\n\
             if (els.length === 0) return null;\n\
             const r = els[0].getBoundingClientRect();\n\
             return {{ x: r.x + off.x, y: r.y + off.y, width: r.width, height: r.height }};\n\
             }})()",
            query_prologue(selector, frame)
        );
        self.eval(js).await
    }

    async fn attribute(
        &self,
        selector: &str,
        name: &str,
        frame: Option<&str>,
    ) -> Result<Option<String>, SolverError> {
        let attr = js_str(name);
        let js = format!(
            "(() => {{\n{}\n\
             if (els.length === 0) return null;\n\
             return els[0].getAttribute({attr});\n}})()",
            query_prologue(selector, frame)
        );
        self.eval(js).await
    }

    async fn attribute_of_all(
        &self,
        selector: &str,
        name: &str,
        frame: Option<&str>,
    ) -> Result<Vec<Option<String>>, SolverError> {
        let attr = js_str(name);
        let js = format!(
            "(() => {{\n{}\n\
             return els.map((el) => el.getAttribute({attr}));\n}})()",
            query_prologue(selector, frame)
        );
        self.eval(js).await
    }

    async fn text_content(
        &self,
        selector: &str,
        frame: Option<&str>,
    ) -> Result<Option<String>, SolverError> {
        let js = format!(
            "(() => {{\n{}\n\
             if (els.length === 0) return null;\n\
             return els[0].textContent;\n}})()",
            query_prologue(selector, frame)
        );
        self.eval(js).await
    }

    async fn click_nth(
        &self,
        selector: &str,
        index: usize,
        frame: Option<&str>,
    ) -> Result<(), SolverError> {
        let js = format!(
            "(() => {{\n{}\n\
             if (els.length <= {index}) return null;\n\
             const r = els[{index}].getBoundingClientRect();\n\
             return {{ x: r.x + off.x, y: r.y + off.y, width: r.width, height: r.height }};\n\
             }})()",
            query_prologue(selector, frame)
        );
        let rect: Option<Rect> = self.eval(js).await?;
        let rect = rect.ok_or_else(|| {
            SolverError::Evidence(format!("no element at index {index} for selector {selector}"))
        })?;
        let x = rect.x + rect.width / 2.0;
        let y = rect.y + rect.height / 2.0;
        self.pointer_move(x, y).await?;
        self.pointer_down(x, y).await?;
        self.pointer_up(x, y).await
    }

    async fn pointer_move(&self, x: f64, y: f64) -> Result<(), SolverError> {
        self.dispatch_mouse(DispatchMouseEventType::MouseMoved, x, y)
            .await
    }

    async fn pointer_down(&self, x: f64, y: f64) -> Result<(), SolverError> {
        self.dispatch_mouse(DispatchMouseEventType::MousePressed, x, y)
            .await?;
        self.pressed.store(true, Ordering::Release);
        Ok(())
    }

    async fn pointer_up(&self, x: f64, y: f64) -> Result<(), SolverError> {
        self.pressed.store(false, Ordering::Release);
        self.dispatch_mouse(DispatchMouseEventType::MouseReleased, x, y)
            .await
    }

    async fn switch_to_popup_if_present(&self) -> Result<bool, SolverError> {
        let Some(browser) = &self.browser else {
            return Ok(false);
        };
        let pages = browser
            .pages()
            .await
            .map_err(|e| SolverError::Driver(format!("could not list pages: {e}")))?;
        let mut current = self.page.lock().await;
        let current_id = current.target_id().clone();
        match pages.into_iter().last() {
            Some(newest) if *newest.target_id() != current_id => {
                debug!("popup present, rebinding session to newest page");
                *current = newest;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_while_held_carries_the_left_button() {
        let params = mouse_event_params(DispatchMouseEventType::MouseMoved, 5.0, 6.0, true).unwrap();
        assert!(matches!(params.button, Some(MouseButton::Left)));
        assert_eq!(params.buttons, Some(1));
    }

    #[test]
    fn hover_move_is_button_less() {
        let params =
            mouse_event_params(DispatchMouseEventType::MouseMoved, 5.0, 6.0, false).unwrap();
        assert!(params.button.is_none());
        assert!(params.buttons.is_none());
    }

    #[test]
    fn press_and_release_name_the_button_with_click_count() {
        for event_type in [
            DispatchMouseEventType::MousePressed,
            DispatchMouseEventType::MouseReleased,
        ] {
            let params = mouse_event_params(event_type, 0.0, 0.0, true).unwrap();
            assert!(matches!(params.button, Some(MouseButton::Left)));
            assert_eq!(params.click_count, Some(1));
        }
    }
}
