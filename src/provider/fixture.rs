//! Offline catalog served from a JSON file.
//!
//! ```json
//! {
//!   "modules": [{
//!     "name": "Alpha",
//!     "version": "1.0.0",
//!     "commands": [{
//!       "name": "gf",
//!       "kind": "alias",
//!       "definition": "Get-Foo",
//!       "summary": "Gets foo.",
//!       "documents": { "examples": "EXAMPLE 1\n  gf" },
//!       "parameters": [{ "name": "Path", "common": false, "help": "-Path <String>" }],
//!       "online": "https://example.org/gf"
//!     }]
//!   }]
//! }
//! ```

use crate::model::{
    DocumentCategory, Entry, Parameter, ProviderError, SubEntry, SubEntryKind,
};
use crate::provider::{text_to_lines, Catalog, ContentProvider};
use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    modules: Vec<ModuleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleRecord {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    commands: Vec<CommandRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandRecord {
    name: String,
    #[serde(default = "default_kind")]
    kind: SubEntryKind,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    documents: Documents,
    #[serde(default)]
    parameters: Vec<ParameterRecord>,
    #[serde(default)]
    online: Option<String>,
}

fn default_kind() -> SubEntryKind {
    SubEntryKind::Primary
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Documents {
    #[serde(default)]
    examples: Option<String>,
    #[serde(default)]
    detailed: Option<String>,
    #[serde(default)]
    full: Option<String>,
}

impl Documents {
    fn get(&self, category: DocumentCategory) -> Option<&str> {
        match category {
            DocumentCategory::Examples => self.examples.as_deref(),
            DocumentCategory::Detailed => self.detailed.as_deref(),
            DocumentCategory::Full => self.full.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterRecord {
    name: String,
    #[serde(default)]
    common: bool,
    /// Short description shown when no full help exists.
    #[serde(default)]
    description: Option<String>,
    /// Full help returned by `fetch_parameter_help`.
    #[serde(default)]
    help: String,
}

/// Serves modules, commands and help text from a parsed catalog file.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    catalog: CatalogFile,
    opener: Option<String>,
}

impl FixtureProvider {
    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let text = std::fs::read_to_string(path)?;
        let provider = Self::from_json(&text, &path.display().to_string())?;
        info!(
            path = %path.display(),
            modules = provider.catalog.modules.len(),
            "fixture catalog loaded"
        );
        Ok(provider)
    }

    /// Parse a catalog from JSON text. `origin` names the source in errors.
    pub fn from_json(text: &str, origin: &str) -> Result<Self, ProviderError> {
        let catalog = serde_json::from_str(text).map_err(|source| ProviderError::Decode {
            context: origin.to_string(),
            source,
        })?;
        Ok(Self {
            catalog,
            opener: None,
        })
    }

    /// Use `program <url>` to open online help instead of the platform opener.
    pub fn with_opener(mut self, program: impl Into<String>) -> Self {
        self.opener = Some(program.into());
        self
    }

    fn module(&self, name: &str) -> Option<&ModuleRecord> {
        self.catalog.modules.iter().find(|m| m.name == name)
    }

    fn command(&self, sub_entry: &SubEntry) -> Result<&CommandRecord, ProviderError> {
        self.module(&sub_entry.source_module)
            .and_then(|m| m.commands.iter().find(|c| c.name == sub_entry.name))
            .ok_or_else(|| {
                ProviderError::missing(format!(
                    "command '{}' in module '{}'",
                    sub_entry.name, sub_entry.source_module
                ))
            })
    }

    fn launch(&self, url: &str) -> Result<(), ProviderError> {
        let (program, leading): (String, &[&str]) = match &self.opener {
            Some(program) => (program.clone(), &[]),
            None => platform_opener(),
        };
        debug!(%program, %url, "launching opener");
        Command::new(&program)
            .args(leading)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|source| ProviderError::Spawn { program, source })
    }
}

fn platform_opener() -> (String, &'static [&'static str]) {
    if cfg!(target_os = "windows") {
        ("cmd".to_string(), &["/C", "start", ""])
    } else if cfg!(target_os = "macos") {
        ("open".to_string(), &[])
    } else {
        ("xdg-open".to_string(), &[])
    }
}

impl Catalog for FixtureProvider {
    fn list_entries(&self, filter: Option<&str>) -> Result<Vec<Entry>, ProviderError> {
        let needle = filter.unwrap_or_default().trim().to_lowercase();
        Ok(self
            .catalog
            .modules
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .map(|m| Entry::new(m.name.clone(), m.version.clone()))
            .collect())
    }
}

impl ContentProvider for FixtureProvider {
    fn list_sub_entries(&self, entry: &Entry) -> Result<Vec<SubEntry>, ProviderError> {
        let module = self
            .module(entry.name())
            .ok_or_else(|| ProviderError::missing(format!("module '{}'", entry.name())))?;
        Ok(module
            .commands
            .iter()
            .map(|c| {
                SubEntry::new(c.name.clone(), c.kind, module.name.clone())
                    .with_definition(c.definition.clone())
                    .with_summary(c.summary.clone())
            })
            .collect())
    }

    fn fetch_document(
        &self,
        sub_entry: &SubEntry,
        category: DocumentCategory,
    ) -> Result<Vec<String>, ProviderError> {
        let command = self.command(sub_entry)?;
        command
            .documents
            .get(category)
            .map(text_to_lines)
            .ok_or_else(|| {
                ProviderError::missing(format!("{category} help for '{}'", sub_entry.name))
            })
    }

    fn list_parameters(&self, sub_entry: &SubEntry) -> Result<Vec<Parameter>, ProviderError> {
        let command = self.command(sub_entry)?;
        Ok(command
            .parameters
            .iter()
            .map(|p| {
                let parameter = Parameter::new(p.name.clone(), p.common);
                match &p.description {
                    Some(description) => parameter.with_help_text(description.clone()),
                    None => parameter,
                }
            })
            .collect())
    }

    fn fetch_parameter_help(
        &self,
        sub_entry: &SubEntry,
        parameter: &Parameter,
    ) -> Result<String, ProviderError> {
        let command = self.command(sub_entry)?;
        command
            .parameters
            .iter()
            .find(|p| p.name == parameter.name)
            .map(|p| p.help.clone())
            .ok_or_else(|| {
                ProviderError::missing(format!(
                    "parameter '{}' of '{}'",
                    parameter.name, sub_entry.name
                ))
            })
    }

    fn open_online_document(&self, sub_entry: &SubEntry) -> Result<(), ProviderError> {
        let command = self.command(sub_entry)?;
        let url = command
            .online
            .as_deref()
            .ok_or_else(|| {
                ProviderError::missing(format!("online help for '{}'", sub_entry.name))
            })?;
        self.launch(url)
    }
}
