#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use dojo_admin::cli::forms::{PromptContext, PromptResponse, StepInteraction};
use dojo_admin::domain::ids::SequentialIds;
use dojo_admin::domain::lookup::{ReferenceData, ReferenceTables};
use dojo_admin::storage::JsonStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_dir() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Store in an isolated directory with deterministic `prefix-N` ids.
pub fn setup_store() -> JsonStore {
    JsonStore::new(Some(temp_dir()))
        .expect("create json store")
        .with_ids(Arc::new(SequentialIds::new()))
}

pub fn demo_references() -> ReferenceTables {
    ReferenceData::demo().into()
}

/// One scripted answer, matched to prompts by label.
#[derive(Debug, Clone)]
pub enum Answer {
    Text(&'static str),
    Choice(usize),
    Many(Vec<usize>),
    Yes(bool),
    Keep,
    Back,
    Cancel,
}

/// Answers prompts from per-label queues. Unscripted prompts keep their
/// current value; after `limit` prompts every answer is a cancel so a
/// stuck wizard cannot loop forever.
pub struct ScriptedInteraction {
    answers: HashMap<String, VecDeque<Answer>>,
    pub asked: Vec<String>,
    pub shown: Vec<String>,
    limit: usize,
}

impl ScriptedInteraction {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            asked: Vec::new(),
            shown: Vec::new(),
            limit: 200,
        }
    }

    pub fn answer(mut self, label: &str, answer: Answer) -> Self {
        self.answers
            .entry(label.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    pub fn saw(&self, line: &str) -> bool {
        self.shown.iter().any(|shown| shown.contains(line))
    }

    fn next(&mut self, context: &PromptContext<'_>) -> Answer {
        self.asked.push(context.label.to_string());
        if self.asked.len() > self.limit {
            return Answer::Cancel;
        }
        self.answers
            .get_mut(context.label)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Answer::Keep)
    }
}

fn control<T>(answer: Answer) -> PromptResponse<T> {
    match answer {
        Answer::Back => PromptResponse::Back,
        Answer::Cancel => PromptResponse::Cancel,
        _ => PromptResponse::Keep,
    }
}

impl StepInteraction for ScriptedInteraction {
    fn text(&mut self, context: &PromptContext<'_>) -> PromptResponse<String> {
        match self.next(context) {
            Answer::Text(value) => PromptResponse::Value(value.to_string()),
            other => control(other),
        }
    }

    fn choose(&mut self, context: &PromptContext<'_>, _options: &[String]) -> PromptResponse<usize> {
        match self.next(context) {
            Answer::Choice(index) => PromptResponse::Value(index),
            other => control(other),
        }
    }

    fn choose_many(
        &mut self,
        context: &PromptContext<'_>,
        _options: &[String],
        _selected: &[bool],
    ) -> PromptResponse<Vec<usize>> {
        match self.next(context) {
            Answer::Many(indices) => PromptResponse::Value(indices),
            other => control(other),
        }
    }

    fn confirm(&mut self, context: &PromptContext<'_>, _default: bool) -> PromptResponse<bool> {
        match self.next(context) {
            Answer::Yes(value) => PromptResponse::Value(value),
            other => control(other),
        }
    }

    fn show(&mut self, lines: &[String]) {
        self.shown.extend(lines.iter().cloned());
    }
}
