//! Handler for `depsight insight`.

use std::path::PathBuf;

use miette::Result;

use depsight_core::config::{ColorChoice, GlobalConfig, VersionSchemeKind};
use depsight_ops::ops_insight::{self, InsightOptions};

pub fn exec(
    snapshot: PathBuf,
    configuration: Option<String>,
    dependency: Option<String>,
    color: Option<ColorChoice>,
    version_scheme: Option<VersionSchemeKind>,
) -> Result<()> {
    let config = match GlobalConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to load global config, using defaults: {e}");
            GlobalConfig::default()
        }
    };

    let opts = InsightOptions {
        snapshot,
        configuration,
        dependency,
        color,
        version_scheme,
    };

    ops_insight::insight(&opts, &config, &mut std::io::stdout().lock())
}
