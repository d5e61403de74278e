//! Interactive ratatui front end.
//!
//! One screen: a multi-line text editor (or the extracted text of an uploaded
//! PDF), the length selector in the header, collapsible summary and keyword
//! panels, a half-block word-cloud preview, and the notice area. The
//! Summarize action blocks the loop; the busy frame is drawn first.

pub mod sink;
pub mod widgets;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::animation::AnimationSet;
use crate::document::Document;
use crate::error::{BriefError, BriefResult};
use crate::export::{SummaryDownload, WORDCLOUD_FILE_NAME};
use crate::input;
use crate::message::{Notice, NoticeSink};
use crate::pipeline::{Pipeline, Session};
use crate::summarize::SummaryLengthProfile;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Summarize,
    Quit,
}

/// Where the input text comes from.
enum InputSource {
    Typed,
    Uploaded { name: String },
}

/// TUI application state.
pub struct BriefTui {
    pipeline: Pipeline,
    session: Session,
    sink: sink::TuiSink,
    animations: AnimationSet,
    output_dir: PathBuf,
    profile: SummaryLengthProfile,
    source: InputSource,
    editor: String,
    prompt: Option<String>,
    notices: Vec<Notice>,
    show_summary: bool,
    show_keywords: bool,
    started: Instant,
}

impl BriefTui {
    pub fn new(pipeline: Pipeline, animations: AnimationSet, output_dir: PathBuf) -> Self {
        Self {
            pipeline,
            session: Session::new(),
            sink: sink::TuiSink::new(),
            animations,
            output_dir,
            profile: SummaryLengthProfile::default(),
            source: InputSource::Typed,
            editor: String::new(),
            prompt: None,
            notices: vec![Notice::info(
                "Type text or press Ctrl-O to upload a PDF, then Ctrl-S to summarize.",
            )],
            show_summary: true,
            show_keywords: true,
            started: Instant::now(),
        }
    }

    /// Run the TUI event loop.
    pub fn run(&mut self) -> BriefResult<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> BriefResult<()> {
        loop {
            self.draw(terminal)?;

            if event::poll(Duration::from_millis(100)).map_err(BriefError::Terminal)? {
                if let Event::Key(key) = event::read().map_err(BriefError::Terminal)? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.handle_key(key.code, key.modifiers) {
                        Action::Quit => break,
                        Action::Summarize => self.summarize(terminal)?,
                        Action::None => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self, terminal: &mut ratatui::DefaultTerminal) -> BriefResult<()> {
        self.collect_notices();
        let editor_title = match &self.source {
            InputSource::Typed => "Or enter text to summarize".to_string(),
            InputSource::Uploaded { name } => format!("Extracted PDF Text: {name}"),
        };
        let view = widgets::View {
            profile: self.profile,
            editor_title: &editor_title,
            editor: &self.editor,
            stats: self.session.document().and_then(Document::stats),
            state: self.session.state(),
            notices: &self.notices,
            show_summary: self.show_summary,
            show_keywords: self.show_keywords,
            prompt: self.prompt.as_deref(),
            animations: &self.animations,
            elapsed: self.started.elapsed(),
        };
        terminal
            .draw(|frame| widgets::render(frame, &view))
            .map_err(BriefError::Terminal)?;
        Ok(())
    }

    /// The Summarize action: draw the busy frame, then block on the pipeline.
    fn summarize(&mut self, terminal: &mut ratatui::DefaultTerminal) -> BriefResult<()> {
        if !self.session.begin(&self.sink) {
            return Ok(());
        }
        self.draw(terminal)?;
        self.finish_run();
        Ok(())
    }

    /// Second half of a run started with `Session::begin`.
    fn finish_run(&mut self) {
        let result = match self.session.document() {
            Some(document) => self.pipeline.run(document, self.profile, &self.sink),
            None => Err(crate::pipeline::PipelineError::MissingInput),
        };
        self.session.complete(result);
    }

    fn collect_notices(&mut self) {
        self.notices.extend(self.sink.drain());
    }

    /// New input starts a fresh notice area.
    fn reset_notices(&mut self) {
        self.sink.drain();
        self.notices.clear();
    }

    /// Apply one key press to the state.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Action {
        if self.prompt.is_some() {
            self.handle_prompt_key(code);
            return Action::None;
        }

        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match code {
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('s') if ctrl => return Action::Summarize,
            KeyCode::Char('o') if ctrl => self.prompt = Some(String::new()),
            KeyCode::Char('x') if ctrl => {
                self.reset_notices();
                self.source = InputSource::Typed;
                self.editor.clear();
                self.session.set_document(Document::typed(""));
            }
            KeyCode::Char('d') if ctrl => self.download_summary(),
            KeyCode::Char('w') if ctrl => self.save_cloud(),
            KeyCode::F(2) => self.profile = self.profile.next(),
            KeyCode::F(3) => self.show_summary = !self.show_summary,
            KeyCode::F(4) => self.show_keywords = !self.show_keywords,
            KeyCode::Char(c) if !ctrl => self.edit(|buf| buf.push(c)),
            KeyCode::Enter => self.edit(|buf| buf.push('\n')),
            KeyCode::Tab => self.edit(|buf| buf.push('\t')),
            KeyCode::Backspace => self.edit(|buf| {
                buf.pop();
            }),
            _ => {}
        }
        Action::None
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        let Some(path) = self.prompt.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                let path = PathBuf::from(path.trim());
                self.prompt = None;
                if !path.as_os_str().is_empty() {
                    self.upload(&path);
                }
            }
            KeyCode::Backspace => {
                path.pop();
            }
            KeyCode::Char(c) => path.push(c),
            _ => {}
        }
    }

    /// Typed edits; an uploaded PDF is shown read-only.
    fn edit(&mut self, f: impl FnOnce(&mut String)) {
        if matches!(self.source, InputSource::Uploaded { .. }) {
            return;
        }
        f(&mut self.editor);
        self.reset_notices();
        self.session.set_document(Document::typed(self.editor.clone()));
    }

    fn upload(&mut self, path: &Path) {
        match input::load_file(path) {
            Ok(document) => {
                self.reset_notices();
                self.editor = document.text().to_string();
                self.source = InputSource::Uploaded {
                    name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string()),
                };
                self.session.ingest(document, &self.sink);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "upload failed");
                self.sink.emit(&Notice::from_diagnostic(&e));
            }
        }
    }

    fn download_summary(&mut self) {
        let Some(analysis) = self.session.analysis() else {
            return;
        };
        match SummaryDownload::of(&analysis.summary).write_to(&self.output_dir) {
            Ok(path) => self
                .sink
                .emit(&Notice::toast(format!("Saved {}", path.display()))),
            Err(e) => self.sink.emit(&Notice::from_diagnostic(&e)),
        }
    }

    fn save_cloud(&mut self) {
        let Some(cloud) = self.session.analysis().and_then(|a| a.cloud.as_ref()) else {
            return;
        };
        let path = self.output_dir.join(WORDCLOUD_FILE_NAME);
        match cloud.save_png(&path) {
            Ok(()) => self
                .sink
                .emit(&Notice::toast(format!("Saved {}", path.display()))),
            Err(e) => self.sink.emit(&Notice::from_diagnostic(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::RakeExtractor;
    use crate::pipeline::{MISSING_INPUT, SUMMARY_DONE, SessionState};
    use crate::summarize::{LengthBounds, SummarizeResult, Summarizer};
    use crate::wordcloud::{BitmapFace, WordCloudConfig, WordCloudRenderer};

    struct Fixed;

    impl Summarizer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn summarize(&self, _text: &str, _bounds: LengthBounds) -> SummarizeResult<String> {
            Ok("Crabs write safe systems code.".into())
        }
    }

    fn app(dir: &Path) -> BriefTui {
        let pipeline = Pipeline::new(
            Box::new(Fixed),
            Box::new(RakeExtractor::new()),
            WordCloudRenderer::with_face(WordCloudConfig::default(), Box::new(BitmapFace)),
        );
        BriefTui::new(pipeline, AnimationSet::none(), dir.to_path_buf())
    }

    /// Drive a Summarize key press the way the event loop does, minus the frame.
    fn press_summarize(app: &mut BriefTui) {
        assert_eq!(
            app.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Action::Summarize
        );
        if app.session.begin(&app.sink) {
            app.finish_run();
        }
        app.collect_notices();
    }

    fn type_text(app: &mut BriefTui, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn typing_fills_editor_and_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app(dir.path());
        type_text(&mut app, "Hi ferris");
        app.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.editor, "Hi ferri");
        assert_eq!(app.session.document().unwrap().text(), "Hi ferri");
    }

    #[test]
    fn key_actions() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app(dir.path());
        assert_eq!(
            app.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Action::Summarize
        );
        assert_eq!(app.handle_key(KeyCode::Esc, KeyModifiers::NONE), Action::Quit);
        assert_eq!(
            app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Action::Quit
        );
    }

    #[test]
    fn f2_cycles_length_profile() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app(dir.path());
        assert_eq!(app.profile, SummaryLengthProfile::Short);
        app.handle_key(KeyCode::F(2), KeyModifiers::NONE);
        assert_eq!(app.profile, SummaryLengthProfile::Medium);
        app.handle_key(KeyCode::F(2), KeyModifiers::NONE);
        app.handle_key(KeyCode::F(2), KeyModifiers::NONE);
        assert_eq!(app.profile, SummaryLengthProfile::Short);
    }

    #[test]
    fn summarize_blank_warns() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app(dir.path());
        press_summarize(&mut app);
        assert!(app.notices.iter().any(|n| n.text() == MISSING_INPUT));
        assert!(app.session.analysis().is_none());
    }

    #[test]
    fn summarize_then_download() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app(dir.path());
        type_text(&mut app, "Ferris the crab writes memory safe code.");
        press_summarize(&mut app);
        assert!(app.session.analysis().is_some());

        app.handle_key(KeyCode::Char('d'), KeyModifiers::CONTROL);
        app.handle_key(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("summary.txt")).unwrap(),
            "Crabs write safe systems code."
        );
        assert!(dir.path().join("wordcloud.png").is_file());
    }

    #[test]
    fn upload_prompt_loads_text_file_read_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "Uploaded notes.").unwrap();

        let mut app = app(dir.path());
        app.handle_key(KeyCode::Char('o'), KeyModifiers::CONTROL);
        type_text(&mut app, &file.display().to_string());
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.editor, "Uploaded notes.");

        type_text(&mut app, "more");
        assert_eq!(app.editor, "Uploaded notes.");

        app.handle_key(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(app.editor, "");
    }

    #[test]
    fn failed_upload_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app(dir.path());
        app.handle_key(KeyCode::Char('o'), KeyModifiers::CONTROL);
        type_text(&mut app, "/definitely/not/here.pdf");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.collect_notices();
        assert!(
            app.notices
                .iter()
                .any(|n| matches!(n, Notice::Error { .. }))
        );
    }

    #[test]
    fn new_input_clears_previous_notices() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app(dir.path());
        type_text(&mut app, "Ferris the crab writes memory safe code.");
        press_summarize(&mut app);
        assert!(app.notices.iter().any(|n| n.text() == SUMMARY_DONE));

        type_text(&mut app, " More.");
        app.collect_notices();
        assert!(app.notices.is_empty());
        assert!(matches!(app.session.state(), SessionState::Idle));

        press_summarize(&mut app);
        app.handle_key(KeyCode::Char('x'), KeyModifiers::CONTROL);
        app.collect_notices();
        assert!(app.notices.is_empty());
    }
}
