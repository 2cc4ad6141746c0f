//! Encoder configuration

use crate::seeds::SeedPolicy;
use crate::state::MIN_CLOSED_VERTICES;
use progmesh_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters of a [`crate::ProgressiveEncoder`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderParams {
    /// Number of levels to produce.
    pub iterations: usize,
    pub seeds: SeedPolicy,
    /// Keep a candidate vertex whose fan would repeat an existing edge.
    pub preserve_manifold: bool,
    /// Stop once the active vertex count is at or below this.
    pub min_vertices: usize,
    /// Check the mesh invariants before serializing each level.
    pub validate_levels: bool,
}

impl Default for EncoderParams {
    fn default() -> Self {
        Self {
            iterations: 2,
            seeds: SeedPolicy::legacy(),
            preserve_manifold: true,
            min_vertices: MIN_CLOSED_VERTICES,
            validate_levels: true,
        }
    }
}

impl EncoderParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(
        iterations: usize,
        seeds: SeedPolicy,
        preserve_manifold: bool,
        min_vertices: usize,
        validate_levels: bool,
    ) -> Self {
        Self {
            iterations,
            seeds,
            preserve_manifold,
            min_vertices,
            validate_levels,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seeds(mut self, seeds: SeedPolicy) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidData(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.min_vertices < MIN_CLOSED_VERTICES {
            return Err(Error::InvalidData(format!(
                "min_vertices must be at least {MIN_CLOSED_VERTICES}, got {}",
                self.min_vertices
            )));
        }
        Ok(())
    }
}
