//! Live catalog backed by a PowerShell executable.
//!
//! Every call spawns `<shell> -NoProfile -NonInteractive -Command <script>`.
//! Listings come back as `ConvertTo-Json` output; help documents as plain
//! `Out-String` text.

use crate::model::{
    DocumentCategory, Entry, Parameter, ProviderError, SubEntry, SubEntryKind,
};
use crate::provider::{text_to_lines, Catalog, ContentProvider};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::process::Command;
use tracing::debug;

/// Width passed to `Out-String` so help text is not wrapped at 80 columns.
const HELP_WIDTH: u16 = 200;

/// Shells out to PowerShell for module, command and help data.
#[derive(Debug, Clone)]
pub struct PwshProvider {
    shell: String,
}

impl PwshProvider {
    /// Provider running `shell` (usually `pwsh` or `powershell`).
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Executable this provider spawns.
    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Run `script` and return its stdout.
    ///
    /// `label` names the operation in errors.
    fn run(&self, label: &str, script: &str) -> Result<String, ProviderError> {
        debug!(shell = %self.shell, %label, "running script");
        let out = Command::new(&self.shell)
            .args(["-NoProfile", "-NonInteractive", "-Command", script])
            .output()
            .map_err(|source| ProviderError::Spawn {
                program: self.shell.clone(),
                source,
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            return Err(ProviderError::CommandFailed {
                command: label.to_string(),
                status: out.status.code(),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    fn run_json<T: DeserializeOwned>(
        &self,
        label: &str,
        script: &str,
    ) -> Result<Vec<T>, ProviderError> {
        let stdout = self.run(label, script)?;
        decode_rows(&stdout, label)
    }
}

// ===== Script construction =====

/// Quote `value` as a PowerShell single-quoted string literal.
///
/// Embedded quotes are doubled. Control characters and empty names are
/// rejected, so a name can never break out of the literal.
pub fn quote(value: &str) -> Result<String, ProviderError> {
    if value.trim().is_empty() || value.chars().any(char::is_control) {
        return Err(ProviderError::InvalidName(value.to_string()));
    }
    Ok(format!("'{}'", value.replace('\'', "''")))
}

fn list_modules_script(filter: Option<&str>) -> Result<String, ProviderError> {
    let name = match filter.map(str::trim).filter(|f| !f.is_empty()) {
        Some(filter) => format!(" -Name {}", quote(&format!("*{filter}*"))?),
        None => String::new(),
    };
    Ok(format!(
        "Get-Module -ListAvailable{name} | Sort-Object Name -Unique | \
         Select-Object Name, @{{n='Version';e={{$_.Version.ToString()}}}} | \
         ConvertTo-Json -Compress"
    ))
}

fn list_commands_script(module: &str) -> Result<String, ProviderError> {
    Ok(format!(
        "Get-Command -Module {} | Sort-Object Name | \
         Select-Object Name, Source, \
         @{{n='CommandType';e={{$_.CommandType.ToString()}}}}, \
         @{{n='Definition';e={{if ($_.CommandType -eq 'Alias') {{ $_.Definition }}}}}}, \
         @{{n='Synopsis';e={{(Get-Help -Name $_.Name -ErrorAction SilentlyContinue).Synopsis}}}} | \
         ConvertTo-Json -Compress",
        quote(module)?
    ))
}

fn help_script(command: &str, category: DocumentCategory) -> Result<String, ProviderError> {
    Ok(format!(
        "Get-Help -Name {} -{category} | Out-String -Width {HELP_WIDTH}",
        quote(command)?
    ))
}

fn list_parameters_script(command: &str) -> Result<String, ProviderError> {
    Ok(format!(
        "$common = [System.Management.Automation.Cmdlet]::CommonParameters + \
         [System.Management.Automation.Cmdlet]::OptionalCommonParameters; \
         (Get-Command -Name {}).Parameters.Values | \
         Select-Object Name, @{{n='IsCommon';e={{$common -contains $_.Name}}}} | \
         ConvertTo-Json -Compress",
        quote(command)?
    ))
}

fn parameter_help_script(command: &str, parameter: &str) -> Result<String, ProviderError> {
    Ok(format!(
        "Get-Help -Name {} -Parameter {} | Out-String -Width {HELP_WIDTH}",
        quote(command)?,
        quote(parameter)?
    ))
}

fn online_script(command: &str) -> Result<String, ProviderError> {
    Ok(format!("Get-Help -Name {} -Online", quote(command)?))
}

// ===== JSON decoding =====

/// `ConvertTo-Json` emits a bare object for a single result.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ModuleRow {
    name: String,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CommandRow {
    name: String,
    #[serde(default)]
    command_type: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    synopsis: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParameterRow {
    name: String,
    #[serde(default)]
    is_common: bool,
}

/// Decode `ConvertTo-Json` output. Empty output means no rows.
fn decode_rows<T: DeserializeOwned>(
    stdout: &str,
    context: &str,
) -> Result<Vec<T>, ProviderError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let rows: OneOrMany<T> =
        serde_json::from_str(trimmed).map_err(|source| ProviderError::Decode {
            context: context.to_string(),
            source,
        })?;
    Ok(match rows {
        OneOrMany::Many(rows) => rows,
        OneOrMany::One(row) => vec![row],
    })
}

/// Cmdlets are primary, aliases are aliases, everything else is derived.
fn kind_for(command_type: Option<&str>) -> SubEntryKind {
    match command_type {
        Some(t) if t.eq_ignore_ascii_case("cmdlet") => SubEntryKind::Primary,
        Some(t) if t.eq_ignore_ascii_case("alias") => SubEntryKind::Alias,
        _ => SubEntryKind::Derived,
    }
}

fn command_to_sub_entry(row: CommandRow, module: &str) -> SubEntry {
    let kind = kind_for(row.command_type.as_deref());
    let source = row
        .source
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| module.to_string());
    let mut sub_entry = SubEntry::new(row.name, kind, source);
    if let Some(definition) = row.definition.filter(|d| !d.trim().is_empty()) {
        sub_entry = sub_entry.with_definition(definition);
    }
    if let Some(summary) = row.synopsis.as_deref().and_then(first_line) {
        sub_entry = sub_entry.with_summary(summary);
    }
    sub_entry
}

/// First non-blank line, trimmed. Help synopses can span several lines.
fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

// ===== Trait implementations =====

impl Catalog for PwshProvider {
    fn list_entries(&self, filter: Option<&str>) -> Result<Vec<Entry>, ProviderError> {
        let script = list_modules_script(filter)?;
        let rows: Vec<ModuleRow> = self.run_json("Get-Module -ListAvailable", &script)?;
        Ok(rows
            .into_iter()
            .map(|row| Entry::new(row.name, row.version))
            .collect())
    }
}

impl ContentProvider for PwshProvider {
    fn list_sub_entries(&self, entry: &Entry) -> Result<Vec<SubEntry>, ProviderError> {
        let script = list_commands_script(entry.name())?;
        let label = format!("Get-Command -Module {}", entry.name());
        let rows: Vec<CommandRow> = self.run_json(&label, &script)?;
        Ok(rows
            .into_iter()
            .map(|row| command_to_sub_entry(row, entry.name()))
            .collect())
    }

    fn fetch_document(
        &self,
        sub_entry: &SubEntry,
        category: DocumentCategory,
    ) -> Result<Vec<String>, ProviderError> {
        let script = help_script(&sub_entry.name, category)?;
        let label = format!("Get-Help {} -{category}", sub_entry.name);
        Ok(text_to_lines(&self.run(&label, &script)?))
    }

    fn list_parameters(&self, sub_entry: &SubEntry) -> Result<Vec<Parameter>, ProviderError> {
        let script = list_parameters_script(&sub_entry.name)?;
        let label = format!("Get-Command {} parameters", sub_entry.name);
        let rows: Vec<ParameterRow> = self.run_json(&label, &script)?;
        Ok(rows
            .into_iter()
            .map(|row| Parameter::new(row.name, row.is_common))
            .collect())
    }

    fn fetch_parameter_help(
        &self,
        sub_entry: &SubEntry,
        parameter: &Parameter,
    ) -> Result<String, ProviderError> {
        let script = parameter_help_script(&sub_entry.name, &parameter.name)?;
        let label = format!("Get-Help {} -Parameter {}", sub_entry.name, parameter.name);
        self.run(&label, &script)
    }

    fn open_online_document(&self, sub_entry: &SubEntry) -> Result<(), ProviderError> {
        let script = online_script(&sub_entry.name)?;
        let label = format!("Get-Help {} -Online", sub_entry.name);
        self.run(&label, &script).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_doubles_single_quotes() {
        assert_eq!(quote("Get-Foo").ok().as_deref(), Some("'Get-Foo'"));
        assert_eq!(quote("it's").ok().as_deref(), Some("'it''s'"));
    }

    #[test]
    fn quote_rejects_control_characters_and_blank() {
        assert!(matches!(quote("a\nb"), Err(ProviderError::InvalidName(_))));
        assert!(matches!(quote("x\u{1b}[2J"), Err(ProviderError::InvalidName(_))));
        assert!(matches!(quote("  "), Err(ProviderError::InvalidName(_))));
    }

    #[test]
    fn module_script_wraps_filter_in_wildcards() {
        let script = list_modules_script(Some("Az")).expect("valid");
        assert!(script.starts_with("Get-Module -ListAvailable -Name '*Az*' |"), "{script}");

        let all = list_modules_script(Some("  ")).expect("valid");
        assert!(all.starts_with("Get-Module -ListAvailable |"), "{all}");
    }

    #[test]
    fn help_script_uses_category_switch() {
        let script = help_script("Get-Foo", DocumentCategory::Detailed).expect("valid");
        assert_eq!(script, "Get-Help -Name 'Get-Foo' -Detailed | Out-String -Width 200");
    }

    #[test]
    fn parameter_help_script_quotes_both_names() {
        let script = parameter_help_script("Get-Foo", "Path").expect("valid");
        assert_eq!(
            script,
            "Get-Help -Name 'Get-Foo' -Parameter 'Path' | Out-String -Width 200"
        );
    }

    #[test]
    fn decode_accepts_single_object() {
        let rows: Vec<ModuleRow> =
            decode_rows(r#"{"Name":"Pester","Version":"5.5.0"}"#, "modules").expect("decodes");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Pester");
        assert_eq!(rows[0].version.as_deref(), Some("5.5.0"));
    }

    #[test]
    fn decode_accepts_array_and_empty_output() {
        let rows: Vec<ParameterRow> = decode_rows(
            r#"[{"Name":"Path","IsCommon":false},{"Name":"Verbose","IsCommon":true}]"#,
            "parameters",
        )
        .expect("decodes");
        assert_eq!(rows.len(), 2);
        assert!(rows[1].is_common);

        let none: Vec<ParameterRow> = decode_rows("\r\n", "parameters").expect("decodes");
        assert!(none.is_empty());
    }

    #[test]
    fn decode_error_names_context() {
        let err = decode_rows::<ModuleRow>("not json", "Get-Module").expect_err("invalid");
        assert!(
            matches!(err, ProviderError::Decode { ref context, .. } if context == "Get-Module")
        );
    }

    #[test]
    fn command_types_map_to_kinds() {
        assert_eq!(kind_for(Some("Cmdlet")), SubEntryKind::Primary);
        assert_eq!(kind_for(Some("Alias")), SubEntryKind::Alias);
        assert_eq!(kind_for(Some("Function")), SubEntryKind::Derived);
        assert_eq!(kind_for(None), SubEntryKind::Derived);
    }

    #[test]
    fn alias_row_keeps_definition_and_module() {
        let row = CommandRow {
            name: "gf".into(),
            command_type: Some("Alias".into()),
            source: Some(String::new()),
            definition: Some("Get-Foo".into()),
            synopsis: None,
        };
        let sub_entry = command_to_sub_entry(row, "Alpha");
        assert_eq!(sub_entry.kind, SubEntryKind::Alias);
        assert_eq!(sub_entry.source_module, "Alpha");
        assert_eq!(sub_entry.alias_target(), Some("Get-Foo"));
    }

    #[test]
    fn command_synopsis_becomes_summary() {
        let rows: Vec<CommandRow> = decode_rows(
            r#"{"Name":"Get-Foo","CommandType":"Cmdlet","Source":"Alpha",
                "Synopsis":"\r\nGets foo items.\r\n    More text."}"#,
            "commands",
        )
        .expect("decodes");
        let row = rows.into_iter().next().expect("one row");
        let sub_entry = command_to_sub_entry(row, "Alpha");
        assert_eq!(sub_entry.summary, "Gets foo items.");
    }

    #[test]
    fn missing_or_blank_synopsis_leaves_summary_empty() {
        let rows: Vec<CommandRow> = decode_rows(
            r#"[{"Name":"a","CommandType":"Function"},
               {"Name":"b","CommandType":"Function","Synopsis":"  "},
               {"Name":"c","CommandType":"Function","Synopsis":null}]"#,
            "commands",
        )
        .expect("decodes");
        for row in rows {
            assert_eq!(command_to_sub_entry(row, "Alpha").summary, "");
        }
    }

    #[test]
    fn command_script_selects_synopsis() {
        let script = list_commands_script("Alpha").expect("valid");
        assert!(script.starts_with("Get-Command -Module 'Alpha' |"), "{script}");
        assert!(script.contains("n='Synopsis'"), "{script}");
    }

    #[test]
    fn missing_shell_is_a_spawn_error() {
        let provider = PwshProvider::new("psnav-test-no-such-shell");
        let err = provider.list_entries(None).expect_err("cannot spawn");
        assert!(matches!(
            err,
            ProviderError::Spawn { ref program, .. } if program == "psnav-test-no-such-shell"
        ));
    }

    #[test]
    fn invalid_name_fails_before_spawning() {
        let provider = PwshProvider::new("psnav-test-no-such-shell");
        let entry = Entry::new("bad\nname", None);
        assert!(matches!(
            provider.list_sub_entries(&entry),
            Err(ProviderError::InvalidName(_))
        ));
    }
}
