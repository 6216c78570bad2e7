//! WebDriver binding over `thirtyfour`, for sessions driven through a
//! Selenium-compatible endpoint instead of raw CDP. Same contract as
//! [`CdpDriver`](super::CdpDriver): per-call iframe scoping, top-document
//! pixel coordinates, persistent pointer state across calls.

use async_trait::async_trait;
use thirtyfour::prelude::*;
use tracing::debug;

use crate::core::error::SolverError;
use crate::core::types::Rect;

use super::Driver;

pub struct WebDriverAdapter {
    driver: WebDriver,
}

impl WebDriverAdapter {
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// Hand the underlying session back (e.g. to `quit()` it).
    pub fn into_inner(self) -> WebDriver {
        self.driver
    }

    /// Enter the iframe and return its viewport offset, so element rects can
    /// be reported in top-document coordinates like the CDP binding does.
    async fn enter(&self, frame: Option<&str>) -> Result<(f64, f64), SolverError> {
        let Some(frame_sel) = frame else {
            return Ok((0.0, 0.0));
        };
        let frame_el = self
            .driver
            .find(By::Css(frame_sel))
            .await
            .map_err(drv_err)?;
        let rect = frame_el.rect().await.map_err(drv_err)?;
        frame_el.enter_frame().await.map_err(drv_err)?;
        Ok((rect.x, rect.y))
    }

    async fn leave(&self, frame: Option<&str>) -> Result<(), SolverError> {
        if frame.is_some() {
            self.driver.enter_default_frame().await.map_err(drv_err)?;
        }
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<WebElement>, SolverError> {
        self.driver
            .find_all(By::Css(selector))
            .await
            .map_err(drv_err)
    }
}

fn drv_err(e: WebDriverError) -> SolverError {
    SolverError::Driver(format!("webdriver call failed: {e}"))
}

#[async_trait]
impl Driver for WebDriverAdapter {
    async fn any_visible(&self, selector: &str, frame: Option<&str>) -> Result<bool, SolverError> {
        self.enter(frame).await?;
        let result: Result<bool, SolverError> = async {
            for el in self.find_all(selector).await? {
                if el.is_displayed().await.map_err(drv_err)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        .await;
        self.leave(frame).await?;
        result
    }

    async fn count(&self, selector: &str, frame: Option<&str>) -> Result<usize, SolverError> {
        self.enter(frame).await?;
        let result = self.find_all(selector).await.map(|els| els.len());
        self.leave(frame).await?;
        result
    }

    async fn bounding_box(
        &self,
        selector: &str,
        frame: Option<&str>,
    ) -> Result<Option<Rect>, SolverError> {
        let (off_x, off_y) = self.enter(frame).await?;
        let result: Result<Option<Rect>, SolverError> = async {
            let els = self.find_all(selector).await?;
            let Some(el) = els.first() else {
                return Ok(None);
            };
            let rect = el.rect().await.map_err(drv_err)?;
            Ok(Some(Rect {
                x: rect.x + off_x,
                y: rect.y + off_y,
                width: rect.width,
                height: rect.height,
            }))
        }
        .await;
        self.leave(frame).await?;
        result
    }

    async fn attribute(
        &self,
        selector: &str,
        name: &str,
        frame: Option<&str>,
    ) -> Result<Option<String>, SolverError> {
        self.enter(frame).await?;
        let result: Result<Option<String>, SolverError> = async {
            let els = self.find_all(selector).await?;
            match els.first() {
                Some(el) => el.attr(name).await.map_err(drv_err),
                None => Ok(None),
            }
        }
        .await;
        self.leave(frame).await?;
        result
    }

    async fn attribute_of_all(
        &self,
        selector: &str,
        name: &str,
        frame: Option<&str>,
    ) -> Result<Vec<Option<String>>, SolverError> {
        self.enter(frame).await?;
        let result: Result<Vec<Option<String>>, SolverError> = async {
            let mut values = Vec::new();
            for el in self.find_all(selector).await? {
                values.push(el.attr(name).await.map_err(drv_err)?);
            }
            Ok(values)
        }
        .await;
        self.leave(frame).await?;
        result
    }

    async fn text_content(
        &self,
        selector: &str,
        frame: Option<&str>,
    ) -> Result<Option<String>, SolverError> {
        self.enter(frame).await?;
        let result: Result<Option<String>, SolverError> = async {
            let els = self.find_all(selector).await?;
            match els.first() {
                Some(el) => el.text().await.map(Some).map_err(drv_err),
                None => Ok(None),
            }
        }
        .await;
        self.leave(frame).await?;
        result
    }

    async fn click_nth(
        &self,
        selector: &str,
        index: usize,
        frame: Option<&str>,
    ) -> Result<(), SolverError> {
        self.enter(frame).await?;
        let result: Result<(), SolverError> = async {
            let els = self.find_all(selector).await?;
            let el = els.get(index).ok_or_else(|| {
                SolverError::Evidence(format!(
                    "no element at index {index} for selector {selector}"
                ))
            })?;
            el.click().await.map_err(drv_err)
        }
        .await;
        self.leave(frame).await?;
        result
    }

    async fn pointer_move(&self, x: f64, y: f64) -> Result<(), SolverError> {
        self.driver
            .action_chain()
            .move_to(x as i64, y as i64)
            .perform()
            .await
            .map_err(drv_err)
    }

    async fn pointer_down(&self, x: f64, y: f64) -> Result<(), SolverError> {
        self.driver
            .action_chain()
            .move_to(x as i64, y as i64)
            .click_and_hold()
            .perform()
            .await
            .map_err(drv_err)
    }

    async fn pointer_up(&self, x: f64, y: f64) -> Result<(), SolverError> {
        self.driver
            .action_chain()
            .move_to(x as i64, y as i64)
            .release()
            .perform()
            .await
            .map_err(drv_err)
    }

    async fn switch_to_popup_if_present(&self) -> Result<bool, SolverError> {
        let current = self.driver.window().await.map_err(drv_err)?;
        let handles = self.driver.windows().await.map_err(drv_err)?;
        match handles.into_iter().last() {
            Some(newest) if newest != current => {
                debug!("popup present, switching to newest window");
                self.driver
                    .switch_to_window(newest)
                    .await
                    .map_err(drv_err)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
