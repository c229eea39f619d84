use super::MetricEntry;
use crate::Result;
use crate::compiler::{BucketPolicy, CompileOptions};
use crate::decl::MetricDeclaration;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{EnrichableExt, IntoAppError, app_err, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use strum::Display;

const LOG_TARGET: &str = "  manifest";

/// The default manifest, embedded from `default_manifest.toml`
pub const DEFAULT_MANIFEST_TOML: &str = include_str!("../../default_manifest.toml");

/// File names searched for, in order, when no manifest path is given
pub const MANIFEST_CANDIDATES: &[&str] = &["facadegen.toml", "facadegen.yml", "facadegen.yaml", "facadegen.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ManifestFormat {
    #[strum(serialize = "TOML")]
    Toml,

    #[strum(serialize = "YAML")]
    Yaml,

    #[strum(serialize = "JSON")]
    Json,
}

impl ManifestFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        match path.extension() {
            Some("toml") => Ok(Self::Toml),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => bail!("unsupported manifest format for '{path}', expected a .toml, .yml, .yaml or .json file"),
        }
    }
}

/// Code generation options a manifest can carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestOptions {
    #[serde(default)]
    pub bucket_policy: BucketPolicy,

    /// Crate generated code links against; `None` leaves the choice to the emitter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_crate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub options: ManifestOptions,

    #[serde(default, rename = "metric")]
    pub metrics: Vec<MetricEntry>,
}

impl Manifest {
    /// Load a manifest from an explicit path, or search `base_dir` for one
    ///
    /// # Errors
    ///
    /// Returns an error if no manifest is found, or if it cannot be read or parsed
    pub fn load(base_dir: &Utf8Path, manifest_path: Option<&Utf8Path>) -> Result<Self> {
        let path = match manifest_path {
            Some(path) => path.to_path_buf(),
            None => Self::find(base_dir)?,
        };

        Self::load_file(&path)
    }

    /// Search `base_dir` for the first of [`MANIFEST_CANDIDATES`] that exists
    pub fn find(base_dir: &Utf8Path) -> Result<Utf8PathBuf> {
        MANIFEST_CANDIDATES
            .iter()
            .map(|name| base_dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| app_err!("no manifest found in '{base_dir}', expected one of {}", MANIFEST_CANDIDATES.join(", ")))
    }

    pub fn load_file(path: &Utf8Path) -> Result<Self> {
        let format = ManifestFormat::from_path(path)?;
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading manifest '{path}'"))?;

        match Self::from_str(&text, format) {
            Ok(manifest) => {
                log::debug!(target: LOG_TARGET, "Loaded {} metric entries from '{path}'", manifest.metrics.len());
                Ok(manifest)
            }
            Err(e) => Err(e.enrich_with(|| format!("could not load manifest '{path}'"))),
        }
    }

    /// Parse manifest text without touching the file system
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or contains unknown fields
    pub fn from_str(text: &str, format: ManifestFormat) -> Result<Self> {
        let manifest = match format {
            ManifestFormat::Toml => toml::from_str(text).into_app_err("parsing TOML manifest")?,
            ManifestFormat::Yaml => serde_yaml::from_str(text).into_app_err("parsing YAML manifest")?,
            ManifestFormat::Json => serde_json::from_str(text).into_app_err("parsing JSON manifest")?,
        };

        Ok(manifest)
    }

    /// All declarations, in file order
    #[must_use]
    pub fn declarations(&self) -> Vec<MetricDeclaration> {
        self.metrics.iter().map(MetricEntry::to_declaration).collect()
    }

    #[must_use]
    pub const fn compile_options(&self) -> CompileOptions {
        CompileOptions::with_bucket_policy(self.options.bucket_policy)
    }

    /// Write the default manifest
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_MANIFEST_TOML).into_app_err_with(|| format!("writing default manifest to '{output_path}'"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::decl::{BucketSpec, MetricType};

    const SAMPLE_TOML: &str = r#"
        [options]
        bucket_policy = "lenient"
        runtime_crate = "my_runtime"

        [[metric]]
        namespace = "sample"
        ident = "Error"
        type = "counter"
        labels = ["label1", "label2"]

        [[metric]]
        namespace = "sample"
        ident = "Timing"
        type = "histogram"
        name = "testHisto"
        help = "my help"
        exponential_buckets = { start = 1.0, factor = 2.0, count = 16 }
    "#;

    fn utf8_path(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_default_manifest_compiles() {
        let manifest = Manifest::from_str(DEFAULT_MANIFEST_TOML, ManifestFormat::Toml).unwrap();
        assert!(!manifest.metrics.is_empty());

        let facades = compile(&manifest.declarations(), &manifest.compile_options()).unwrap();
        assert!(!facades.is_empty());
    }

    #[test]
    fn test_toml_manifest() {
        let manifest = Manifest::from_str(SAMPLE_TOML, ManifestFormat::Toml).unwrap();

        assert_eq!(manifest.options.bucket_policy, BucketPolicy::Lenient);
        assert_eq!(manifest.options.runtime_crate.as_deref(), Some("my_runtime"));

        let decls = manifest.declarations();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].raw_labels, ["label1", "label2"]);
        assert_eq!(decls[1].raw_name.as_deref(), Some("testHisto"));
        assert_eq!(
            decls[1].bucket_specs,
            [BucketSpec::Exponential {
                start: 1.0,
                factor: 2.0,
                count: 16
            }]
        );
    }

    #[test]
    fn test_yaml_and_json_manifests() {
        let yaml = "
metric:
  - namespace: sample
    ident: NumThreads
    type: gauge
    name: testGauge
";
        let manifest = Manifest::from_str(yaml, ManifestFormat::Yaml).unwrap();
        assert_eq!(manifest.metrics[0].metric_type, MetricType::Gauge);
        assert_eq!(manifest.options, ManifestOptions::default());

        let json = r#"{ "metric": [ { "ident": "Timing3", "type": "Histogram", "buckets": [1.0, 2.0, 3.0] } ] }"#;
        let manifest = Manifest::from_str(json, ManifestFormat::Json).unwrap();
        assert_eq!(manifest.metrics[0].buckets.as_deref(), Some([1.0, 2.0, 3.0].as_slice()));
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let _ = Manifest::from_str("[option]\nbucket_policy = \"strict\"\n", ManifestFormat::Toml).unwrap_err();
        let _ = Manifest::from_str("[options]\nbucket_policy = \"loose\"\n", ManifestFormat::Toml).unwrap_err();
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ManifestFormat::from_path(Utf8Path::new("a/facadegen.toml")).unwrap(), ManifestFormat::Toml);
        assert_eq!(ManifestFormat::from_path(Utf8Path::new("m.yml")).unwrap(), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Utf8Path::new("m.yaml")).unwrap(), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Utf8Path::new("m.json")).unwrap(), ManifestFormat::Json);
        let _ = ManifestFormat::from_path(Utf8Path::new("m.ini")).unwrap_err();
        let _ = ManifestFormat::from_path(Utf8Path::new("manifest")).unwrap_err();
    }

    #[test]
    fn test_load_searches_candidates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = utf8_path(&dir);

        let _ = Manifest::load(&base, None).unwrap_err();

        fs::write(base.join("facadegen.json"), r#"{ "metric": [ { "ident": "FromJson", "type": "counter" } ] }"#).unwrap();
        assert_eq!(Manifest::load(&base, None).unwrap().metrics[0].ident, "FromJson");

        fs::write(base.join("facadegen.toml"), "[[metric]]\nident = \"FromToml\"\ntype = \"counter\"\n").unwrap();
        assert_eq!(Manifest::load(&base, None).unwrap().metrics[0].ident, "FromToml");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let base = utf8_path(&dir);
        let path = base.join("custom.toml");
        fs::write(&path, SAMPLE_TOML).unwrap();

        let manifest = Manifest::load(&base, Some(&path)).unwrap();
        assert_eq!(manifest.metrics.len(), 2);

        let missing = base.join("missing.toml");
        let _ = Manifest::load(&base, Some(&missing)).unwrap_err();
    }

    #[test]
    fn test_save_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = utf8_path(&dir).join("facadegen.toml");

        Manifest::save_default(&path).unwrap();
        let loaded = Manifest::load_file(&path).unwrap();
        assert_eq!(loaded, Manifest::from_str(DEFAULT_MANIFEST_TOML, ManifestFormat::Toml).unwrap());
    }
}
