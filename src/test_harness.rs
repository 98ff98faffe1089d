//! Test doubles for driving the navigator without a terminal or a shell.
//!
//! - [`FakeProvider`] serves canned catalog data and records every call
//! - [`ScriptedKeys`] replays a fixed key sequence, then presses Escape
//! - [`FailingRenderer`] errors on draw, for fault-path tests

use crate::model::{
    DocumentCategory, Entry, NavKey, Parameter, ProviderError, SubEntry, SubEntryKind,
};
use crate::provider::{Catalog, ContentProvider};
use crate::view::frame::FrameDescription;
use crate::view::{KeySource, Renderer, TuiError};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;

/// Convert a ratatui buffer to a string, one row per line.
///
/// Trailing spaces and blank rows are dropped to keep assertions readable.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListEntries(Option<String>),
    ListSubEntries(String),
    FetchDocument(String, DocumentCategory),
    ListParameters(String),
    FetchParameterHelp(String, String),
    OpenOnline(String),
}

/// In-memory catalog that records what the navigator asked for.
///
/// Anything not configured answers with an empty result.
#[derive(Debug, Default)]
pub struct FakeProvider {
    entries: Vec<Entry>,
    sub_entries: HashMap<String, Vec<SubEntry>>,
    documents: HashMap<(String, DocumentCategory), Vec<String>>,
    failing_documents: HashSet<(String, DocumentCategory)>,
    parameters: HashMap<String, Vec<Parameter>>,
    parameter_help: HashMap<(String, String), String>,
    failing_sub_entries: bool,
    failing_online: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries `Alpha` and `Beta`; `Alpha` holds `Get-Foo` and its alias `gf`.
    ///
    /// `gf` has a three-line Examples document; Detailed help of `Get-Foo`
    /// always fails.
    pub fn alpha_beta() -> Self {
        Self::new()
            .with_entries(&["Alpha", "Beta"])
            .with_sub_entries(
                "Alpha",
                vec![
                    SubEntry::new("Get-Foo", SubEntryKind::Primary, "Alpha"),
                    SubEntry::new("gf", SubEntryKind::Alias, "Alpha").with_definition("Get-Foo"),
                ],
            )
            .with_document(
                "gf",
                DocumentCategory::Examples,
                &["EXAMPLE 1", "    gf -Name bar", "Gets bar."],
            )
            .failing_document("Get-Foo", DocumentCategory::Detailed)
            .with_parameters(
                "Get-Foo",
                vec![
                    Parameter::new("Verbose", true),
                    Parameter::new("Name", false).with_help_text("The name to get."),
                    Parameter::new("Path", false),
                ],
            )
            .with_parameter_help("Get-Foo", "Path", "-Path <String>\n    Where to look.")
    }

    pub fn with_entries(mut self, names: &[&str]) -> Self {
        self.entries = names.iter().map(|name| Entry::new(*name, None)).collect();
        self
    }

    pub fn with_sub_entries(mut self, entry: &str, sub_entries: Vec<SubEntry>) -> Self {
        self.sub_entries.insert(entry.to_string(), sub_entries);
        self
    }

    pub fn with_document(
        mut self,
        command: &str,
        category: DocumentCategory,
        lines: &[&str],
    ) -> Self {
        self.documents.insert(
            (command.to_string(), category),
            lines.iter().map(|line| line.to_string()).collect(),
        );
        self
    }

    pub fn failing_document(mut self, command: &str, category: DocumentCategory) -> Self {
        self.failing_documents.insert((command.to_string(), category));
        self
    }

    pub fn with_parameters(mut self, command: &str, parameters: Vec<Parameter>) -> Self {
        self.parameters.insert(command.to_string(), parameters);
        self
    }

    pub fn with_parameter_help(mut self, command: &str, parameter: &str, text: &str) -> Self {
        self.parameter_help
            .insert((command.to_string(), parameter.to_string()), text.to_string());
        self
    }

    pub fn failing_sub_entries(mut self) -> Self {
        self.failing_sub_entries = true;
        self
    }

    pub fn failing_online(mut self) -> Self {
        self.failing_online = true;
        self
    }

    /// Replace the entry list served by later `list_entries` calls.
    pub fn set_entries(&mut self, names: &[&str]) {
        self.entries = names.iter().map(|name| Entry::new(*name, None)).collect();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Catalog for FakeProvider {
    fn list_entries(&self, filter: Option<&str>) -> Result<Vec<Entry>, ProviderError> {
        self.record(Call::ListEntries(filter.map(str::to_string)));
        let needle = filter.unwrap_or_default().to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.name().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

impl ContentProvider for FakeProvider {
    fn list_sub_entries(&self, entry: &Entry) -> Result<Vec<SubEntry>, ProviderError> {
        self.record(Call::ListSubEntries(entry.name().to_string()));
        if self.failing_sub_entries {
            return Err(ProviderError::missing(format!("module {}", entry.name())));
        }
        Ok(self.sub_entries.get(entry.name()).cloned().unwrap_or_default())
    }

    fn fetch_document(
        &self,
        sub_entry: &SubEntry,
        category: DocumentCategory,
    ) -> Result<Vec<String>, ProviderError> {
        self.record(Call::FetchDocument(sub_entry.name.clone(), category));
        let key = (sub_entry.name.clone(), category);
        if self.failing_documents.contains(&key) {
            return Err(ProviderError::CommandFailed {
                command: format!("Get-Help {} -{category}", sub_entry.name),
                status: Some(1),
                stderr: "help topic unavailable".to_string(),
            });
        }
        Ok(self.documents.get(&key).cloned().unwrap_or_default())
    }

    fn list_parameters(&self, sub_entry: &SubEntry) -> Result<Vec<Parameter>, ProviderError> {
        self.record(Call::ListParameters(sub_entry.name.clone()));
        Ok(self.parameters.get(&sub_entry.name).cloned().unwrap_or_default())
    }

    fn fetch_parameter_help(
        &self,
        sub_entry: &SubEntry,
        parameter: &Parameter,
    ) -> Result<String, ProviderError> {
        self.record(Call::FetchParameterHelp(
            sub_entry.name.clone(),
            parameter.name.clone(),
        ));
        Ok(self
            .parameter_help
            .get(&(sub_entry.name.clone(), parameter.name.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn open_online_document(&self, sub_entry: &SubEntry) -> Result<(), ProviderError> {
        self.record(Call::OpenOnline(sub_entry.name.clone()));
        if self.failing_online {
            return Err(ProviderError::missing(format!("online help for {}", sub_entry.name)));
        }
        Ok(())
    }
}

/// Key source replaying a fixed script.
///
/// Once the script runs out every poll yields Escape, so a loop under test
/// always terminates.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<NavKey>,
    polls: usize,
    acknowledged: usize,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = NavKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Keys for typing `text` into a filter.
    pub fn typed(text: &str) -> Vec<NavKey> {
        text.chars().filter_map(NavKey::filter_char).collect()
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn acknowledged(&self) -> usize {
        self.acknowledged
    }
}

impl KeySource for ScriptedKeys {
    fn poll_key(&mut self) -> Result<Option<NavKey>, TuiError> {
        self.polls += 1;
        Ok(Some(self.keys.pop_front().unwrap_or(NavKey::Escape)))
    }

    fn wait_for_any_key(&mut self) -> Result<(), TuiError> {
        self.acknowledged += 1;
        Ok(())
    }
}

/// Renderer whose draws fail after `healthy_draws` successful ones.
#[derive(Debug, Default)]
pub struct FailingRenderer {
    pub healthy_draws: usize,
    pub frames: Vec<FrameDescription>,
}

impl Renderer for FailingRenderer {
    fn viewport_rows(&mut self) -> Result<u16, TuiError> {
        Ok(24)
    }

    fn draw(&mut self, frame: &FrameDescription) -> Result<(), TuiError> {
        if self.frames.len() >= self.healthy_draws && !frame.is_fault() {
            return Err(TuiError::Io(io::Error::other("backend gone")));
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}
