// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyhedron configuration
//!
//! Read from `polyhedron.toml` when present, then overridden by
//! `POLYHEDRON_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up by [`PolyhedronConfig::load`]
pub const CONFIG_FILE: &str = "polyhedron.toml";

/// Capacity reserved up front by [`Polyhedron::from_config`](crate::Polyhedron::from_config)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReserveHints {
    pub vertices: usize,
    pub halfedges: usize,
    pub facets: usize,
}

/// How delegated edits are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Level passed to `is_valid` (1 and up also checks border normalization)
    pub level: u8,
    /// Log every failed check
    pub verbose: bool,
    /// Validate after every delegate run. On by default. Turning it off
    /// drops the guarantee that a delegate hands back a valid structure:
    /// the caller takes over that check, e.g. for trusted bulk loads.
    pub check_delegate: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            level: 0,
            verbose: false,
            check_delegate: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyhedronConfig {
    pub reserve: ReserveHints,
    pub validation: ValidationConfig,
}

impl PolyhedronConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: PolyhedronConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `POLYHEDRON_*` overrides looked up through `var`
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(level) = var("POLYHEDRON_VALIDATION_LEVEL") {
            self.validation.level = level
                .trim()
                .parse()
                .with_context(|| format!("Invalid POLYHEDRON_VALIDATION_LEVEL: {level:?}"))?;
        }

        if let Some(verbose) = var("POLYHEDRON_VALIDATION_VERBOSE") {
            self.validation.verbose = verbose.trim().parse().unwrap_or(false);
        }

        if let Some(check) = var("POLYHEDRON_CHECK_DELEGATE") {
            self.validation.check_delegate = check.trim().parse().unwrap_or(true);
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
