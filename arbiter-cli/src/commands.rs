//! Subcommand handlers. Each returns the text to print on stdout.

use crate::{Commands, ConfigAction};
use arbiter_core::dataset::load_arff;
use arbiter_core::{
    AlgorithmCategory, AlgorithmKind, AlgorithmRegistry, AllowList, ArbiterConfig, Catalog,
    CapabilityProbe, OutputFormat, TierResolver, locate_distribution,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Everything a handler needs besides its own arguments.
pub struct Context {
    pub config: ArbiterConfig,
    pub workspace: PathBuf,
}

impl Context {
    pub fn new(config: ArbiterConfig, workspace: PathBuf) -> Self {
        Self { config, workspace }
    }

    /// The catalog directory: configured, or found next to the executable.
    pub fn params_dir(&self) -> PathBuf {
        if let Some(dir) = &self.config.catalog.params_dir {
            return dir.clone();
        }
        let start = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.workspace.clone());
        let lookup = locate_distribution(&start);
        if !lookup.detected {
            warn!(
                start = %start.display(),
                "Could not auto-detect the catalog location; set catalog.params_dir or pass --params-dir"
            );
        }
        lookup.params_dir()
    }

    fn render_json<T: Serialize>(&self, value: &T) -> anyhow::Result<String> {
        let mut json = if self.config.output.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        json.push('\n');
        Ok(json)
    }
}

pub fn handle_command(command: Commands, ctx: &Context) -> anyhow::Result<String> {
    match command {
        Commands::Resolve {
            dataset,
            allow,
            format,
        } => {
            let allow_list = match allow {
                Some(ids) => Some(ids.into_iter().collect::<AllowList>()),
                None => ctx.config.catalog.allow_list(),
            };
            let format = format.unwrap_or(ctx.config.output.format);
            handle_resolve(ctx, &dataset, allow_list.as_ref(), format)
        }
        Commands::List { category } => handle_list(ctx, category),
        Commands::Algorithms => handle_algorithms(ctx),
        Commands::Config { action } => handle_config(ctx, action),
    }
}

fn handle_resolve(
    ctx: &Context,
    dataset: &Path,
    allow_list: Option<&AllowList>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let data = load_arff(dataset)?;
    let registry = arbiter_algorithms::builtin_registry()?;
    let probe = CapabilityProbe::new(&registry).catch_panics(ctx.config.probe.catch_panics);
    let resolver = TierResolver::new(probe, ctx.params_dir());

    let report = resolver.resolve_all(&data, allow_list)?;
    tracing::info!(
        dataset = %dataset.display(),
        admissible = report.total(),
        "Resolution finished"
    );

    match format {
        OutputFormat::Text => Ok(report.to_text()),
        OutputFormat::Json => ctx.render_json(&report),
    }
}

fn handle_list(ctx: &Context, category: AlgorithmCategory) -> anyhow::Result<String> {
    let catalog = Catalog::new(ctx.params_dir());
    let candidates = catalog.list_candidates(category, None)?;
    match ctx.config.output.format {
        OutputFormat::Text => Ok(candidates
            .iter()
            .map(|c| format!("{}\n", c.identifier))
            .collect()),
        OutputFormat::Json => ctx.render_json(&candidates),
    }
}

#[derive(Serialize)]
struct RegisteredAlgorithm {
    identifier: String,
    kind: AlgorithmKind,
}

fn registered(registry: &AlgorithmRegistry) -> Vec<RegisteredAlgorithm> {
    [
        AlgorithmKind::Classifier,
        AlgorithmKind::Filter,
        AlgorithmKind::AttributeEvaluator,
        AlgorithmKind::AttributeSearch,
    ]
    .into_iter()
    .flat_map(|kind| {
        registry
            .identifiers(kind)
            .into_iter()
            .map(move |identifier| RegisteredAlgorithm { identifier, kind })
    })
    .collect()
}

fn handle_algorithms(ctx: &Context) -> anyhow::Result<String> {
    let registry = arbiter_algorithms::builtin_registry()?;
    let algorithms = registered(&registry);
    match ctx.config.output.format {
        OutputFormat::Text => Ok(algorithms
            .iter()
            .map(|a| format!("{:<20} {}\n", a.kind.to_string(), a.identifier))
            .collect()),
        OutputFormat::Json => ctx.render_json(&algorithms),
    }
}

fn handle_config(ctx: &Context, action: ConfigAction) -> anyhow::Result<String> {
    match action {
        ConfigAction::Init => {
            let config_path = arbiter_core::config::workspace_config_path(&ctx.workspace);
            if config_path.exists() {
                return Ok(format!(
                    "Configuration file already exists at: {}\n",
                    config_path.display()
                ));
            }
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            let toml_str = toml::to_string_pretty(&ArbiterConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            Ok(format!(
                "Created default configuration at: {}\n",
                config_path.display()
            ))
        }
        ConfigAction::Show => Ok(toml::to_string_pretty(&ctx.config)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const IRIS_LIKE: &str = "\
@relation tiny
@attribute a numeric
@attribute b {x, y}
@attribute class {c1, c2}
@data
1.0,x,c1
2.0,y,c2
3.0,?,c1
";

    fn workspace_with_catalog() -> TempDir {
        let dir = TempDir::new().unwrap();
        let params = dir.path().join("params");
        for category in AlgorithmCategory::ALL {
            std::fs::create_dir_all(params.join(category.partition())).unwrap();
        }
        let files = [
            ("base", "weka.classifiers.trees.J48"),
            ("base", "weka.classifiers.functions.LinearRegression"),
            ("meta", "weka.classifiers.meta.AdaBoostM1"),
            ("baseFilters", "weka.filters.unsupervised.attribute.Normalize"),
        ];
        for (partition, id) in files {
            std::fs::write(params.join(partition).join(format!("{}.params", id)), b"").unwrap();
        }
        std::fs::write(dir.path().join("tiny.arff"), IRIS_LIKE).unwrap();
        dir
    }

    fn context(dir: &TempDir) -> Context {
        let mut config = ArbiterConfig::default();
        config.catalog.params_dir = Some(dir.path().join("params"));
        Context::new(config, dir.path().to_path_buf())
    }

    fn resolve(ctx: &Context, dir: &TempDir, format: Option<OutputFormat>) -> String {
        handle_command(
            Commands::Resolve {
                dataset: dir.path().join("tiny.arff"),
                allow: None,
                format,
            },
            ctx,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_text() {
        let dir = workspace_with_catalog();
        let out = resolve(&context(&dir), &dir, None);
        assert!(out.contains("Base classifiers (1)\n  weka.classifiers.trees.J48\n"));
        assert!(out.contains("Meta classifiers (1)\n  weka.classifiers.meta.AdaBoostM1\n"));
        assert!(out.contains("Filter dependency: weka.filters.unsupervised.attribute.Normalize"));
    }

    #[test]
    fn test_resolve_json() {
        let dir = workspace_with_catalog();
        let out = resolve(&context(&dir), &dir, Some(OutputFormat::Json));
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["classifiers"]["dependency"], "weka.classifiers.trees.J48");
        assert_eq!(json["classifiers"]["base"][0]["category"], "base_classifier");
    }

    #[test]
    fn test_resolve_with_allow_list() {
        let dir = workspace_with_catalog();
        let out = handle_command(
            Commands::Resolve {
                dataset: dir.path().join("tiny.arff"),
                allow: Some(vec!["weka.classifiers.functions.LinearRegression".into()]),
                format: None,
            },
            &context(&dir),
        )
        .unwrap();
        assert!(out.contains("Base classifiers (0)\n"));
        assert!(out.contains("Classifier dependency: weka.classifiers.AbstractClassifier"));
    }

    #[test]
    fn test_resolve_missing_catalog_fails() {
        let dir = workspace_with_catalog();
        std::fs::remove_dir_all(dir.path().join("params").join("ensemble")).unwrap();
        let result = handle_command(
            Commands::Resolve {
                dataset: dir.path().join("tiny.arff"),
                allow: None,
                format: None,
            },
            &context(&dir),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_list_category() {
        let dir = workspace_with_catalog();
        let out = handle_command(
            Commands::List {
                category: AlgorithmCategory::BaseClassifier,
            },
            &context(&dir),
        )
        .unwrap();
        assert_eq!(
            out,
            "weka.classifiers.functions.LinearRegression\nweka.classifiers.trees.J48\n"
        );
    }

    #[test]
    fn test_algorithms_lists_fallbacks() {
        let dir = TempDir::new().unwrap();
        let out = handle_command(Commands::Algorithms, &context(&dir)).unwrap();
        assert!(out.contains("weka.classifiers.AbstractClassifier"));
        assert!(out.contains("weka.filters.AllFilter"));
        assert!(out.contains("attribute search"));
    }

    #[test]
    fn test_config_init_creates_file() {
        let dir = TempDir::new().unwrap();
        let ctx = Context::new(ArbiterConfig::default(), dir.path().to_path_buf());
        let out = handle_command(
            Commands::Config {
                action: ConfigAction::Init,
            },
            &ctx,
        )
        .unwrap();
        assert!(out.starts_with("Created default configuration"));

        let content = std::fs::read_to_string(dir.path().join(".arbiter").join("config.toml")).unwrap();
        let parsed: ArbiterConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, ArbiterConfig::default());

        let again = handle_command(
            Commands::Config {
                action: ConfigAction::Init,
            },
            &ctx,
        )
        .unwrap();
        assert!(again.starts_with("Configuration file already exists"));
    }
}
