//! Operation: explain where a dependency comes from in one configuration.

use std::io::Write;
use std::path::PathBuf;

use depsight_core::config::{ColorChoice, GlobalConfig, VersionSchemeKind};
use depsight_diagnostics::failure::classify;
use depsight_diagnostics::insight::InsightReporter;
use depsight_diagnostics::renderer::{GraphRenderer, RenderOptions};
use depsight_diagnostics::spec::DependencyNotation;
use depsight_resolver::failure::ResolveError;
use depsight_resolver::ordering::{MavenOrdering, SemverOrdering, VersionOrder};
use depsight_resolver::snapshot::Snapshot;
use depsight_util::errors::InsightError;
use depsight_util::term::{self, StyledOutput};

/// Options for `depsight insight`.
#[derive(Debug, Default)]
pub struct InsightOptions {
    /// Resolution snapshot written by the graph builder.
    pub snapshot: PathBuf,
    pub configuration: Option<String>,
    /// Dependency notation, e.g. `org.slf4j:slf4j-api`.
    pub dependency: Option<String>,
    /// Overrides `[report] color` from the global config.
    pub color: Option<ColorChoice>,
    /// Overrides `[report] version-scheme` from the global config.
    pub version_scheme: Option<VersionSchemeKind>,
}

/// Both inputs must be present before anything is loaded. Every missing one
/// is named.
fn validate(opts: &InsightOptions) -> miette::Result<(&str, &str)> {
    let mut missing = Vec::new();
    if opts.configuration.is_none() {
        missing.push(
            "Dependency insight report cannot be generated because the input configuration was not specified.",
        );
    }
    if opts.dependency.is_none() {
        missing.push(
            "Dependency insight report cannot be generated because the dependency to show was not specified.",
        );
    }
    match (opts.configuration.as_deref(), opts.dependency.as_deref()) {
        (Some(configuration), Some(dependency)) => Ok((configuration, dependency)),
        _ => Err(InsightError::InvalidUserData {
            message: format!(
                "{}\nIt can be specified from the command line, e.g: 'depsight insight --configuration someConf --dependency someDep'",
                missing.join("\n")
            ),
        }
        .into()),
    }
}

fn ordering_for(scheme: VersionSchemeKind) -> Box<dyn VersionOrder> {
    match scheme {
        VersionSchemeKind::Maven => Box::new(MavenOrdering::maven()),
        VersionSchemeKind::Semver => Box::new(SemverOrdering::semver()),
    }
}

fn output_for(color: ColorChoice) -> StyledOutput {
    match color {
        ColorChoice::Auto => StyledOutput::for_terminal(),
        ColorChoice::Always => StyledOutput::colored(),
        ColorChoice::Never => StyledOutput::plain(),
    }
}

fn write_out(out: &mut impl Write, buffer: &StyledOutput) -> miette::Result<()> {
    out.write_all(buffer.as_str().as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| InsightError::Io(e).into())
}

/// Produce the insight report for one dependency of one configuration and
/// write it to `out`.
///
/// A failure of the whole configuration is explained first when its shape is
/// known, and then returned as the error.
pub fn insight(
    opts: &InsightOptions,
    config: &GlobalConfig,
    out: &mut impl Write,
) -> miette::Result<()> {
    let (configuration, dependency) = validate(opts)?;
    let notation = DependencyNotation::parse(dependency)?;

    let snapshot = Snapshot::from_path(&opts.snapshot)?;
    let Some(resolved) = snapshot.configuration(configuration) else {
        let available: Vec<&str> = snapshot.configuration_names().collect();
        return Err(InsightError::InvalidUserData {
            message: format!(
                "configuration '{configuration}' not found in {} (available: {})",
                opts.snapshot.display(),
                if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                }
            ),
        }
        .into());
    };

    let mut buffer = output_for(opts.color.unwrap_or(config.report.color));

    if let Some(cause) = &resolved.failure {
        let error = ResolveError::new(configuration, cause.clone());
        tracing::debug!("configuration '{configuration}' failed to resolve: {cause}");
        return match classify(&error, &notation) {
            Ok(explanation) => {
                explanation.render(&mut buffer);
                write_out(out, &buffer)?;
                Err(error.into())
            }
            Err(unexplained) => Err(unexplained.into()),
        };
    }

    term::status("Analyzing", &format!("configuration '{configuration}'"));
    let graph = resolved.build_graph(configuration)?;
    let failed = graph
        .all_dependencies()
        .iter()
        .filter(|d| d.outcome.failure().is_some())
        .count();
    if failed > 0 {
        term::status_warn(
            "Warning",
            &format!("{failed} dependencies of '{configuration}' failed to resolve"),
        );
    }

    let ordering = ordering_for(opts.version_scheme.unwrap_or(config.report.version_scheme));
    let reporter = InsightReporter::new(ordering.as_ref(), configuration);
    let roots = reporter.generate_report(&graph, &notation);
    if roots.is_empty() {
        buffer
            .text(format!(
                "No dependencies matching given input were found in configuration '{configuration}'"
            ))
            .println();
        return write_out(out, &buffer);
    }

    let renderer = GraphRenderer::new(RenderOptions {
        configuration_attributes: resolved.attributes.clone(),
        trailer: config.report.trailer.clone(),
    });
    renderer.render_into(&roots, &mut buffer);
    write_out(out, &buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_every_missing_input() {
        let err = validate(&InsightOptions::default()).unwrap_err().to_string();
        assert!(err.contains("input configuration was not specified"));
        assert!(err.contains("dependency to show was not specified"));
    }

    #[test]
    fn validation_names_only_missing_dependency() {
        let opts = InsightOptions {
            configuration: Some("runtimeClasspath".into()),
            ..InsightOptions::default()
        };
        let err = validate(&opts).unwrap_err().to_string();
        assert!(!err.contains("input configuration"));
        assert!(err.contains("dependency to show was not specified"));
    }

    #[test]
    fn scheme_selection() {
        assert_eq!(
            ordering_for(VersionSchemeKind::Maven).compare("1.0", "1.0.0"),
            std::cmp::Ordering::Equal
        );
        assert_eq!(
            ordering_for(VersionSchemeKind::Semver).compare("1.0", "1.0.0"),
            std::cmp::Ordering::Less
        );
    }
}
