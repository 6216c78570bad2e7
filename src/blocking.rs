//! Synchronous facade for callers that are not running inside a tokio
//! runtime. Owns a single-threaded runtime and blocks on the async
//! orchestrator; must not be constructed from async context.

use std::sync::Arc;

use crate::api::SolverClient;
use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::driver::Driver;
use crate::solver;

pub struct Solver {
    inner: solver::Solver,
    runtime: tokio::runtime::Runtime,
}

impl Solver {
    pub fn new(driver: Arc<dyn Driver>, config: SolverConfig) -> Result<Self, SolverError> {
        Ok(Self {
            inner: solver::Solver::new(driver, config)?,
            runtime: build_runtime()?,
        })
    }

    pub fn with_client(
        driver: Arc<dyn Driver>,
        client: Arc<dyn SolverClient>,
        config: SolverConfig,
    ) -> Result<Self, SolverError> {
        Ok(Self {
            inner: solver::Solver::with_client(driver, client, config),
            runtime: build_runtime()?,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        self.inner.config()
    }

    pub fn solve_captcha_if_present(&self) -> Result<(), SolverError> {
        self.runtime.block_on(self.inner.solve_captcha_if_present())
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime, SolverError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
