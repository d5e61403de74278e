//! The single interactive session: current input and the last run's outcome.

use crate::document::{Document, DocumentSource};
use crate::message::{Notice, NoticeSink};
use crate::pipeline::{
    Analysis, MISSING_INPUT, PDF_EXTRACTED, Pipeline, PipelineError, PipelineResult,
};
use crate::summarize::SummaryLengthProfile;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(Box<Analysis>),
    Failed(PipelineError),
}

/// Where the session is in its Idle → Processing → Resulted cycle.
#[derive(Debug, Default)]
pub enum SessionState {
    /// Waiting for the Summarize action.
    #[default]
    Idle,
    /// Pipeline running; the interaction is blocked.
    Processing,
    /// Last run finished, successfully or not.
    Resulted(RunOutcome),
}

impl SessionState {
    /// Short name for logs and observers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Resulted(RunOutcome::Completed(_)) => "completed",
            Self::Resulted(RunOutcome::Failed(_)) => "failed",
        }
    }
}

/// Notified after every state transition.
pub trait StateObserver {
    fn state_changed(&self, state: &SessionState);
}

/// One user session. Results never outlive the document they came from.
#[derive(Default)]
pub struct Session {
    document: Option<Document>,
    state: SessionState,
    observers: Vec<Box<dyn StateObserver>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Results of the last run, if it completed.
    pub fn analysis(&self) -> Option<&Analysis> {
        match &self.state {
            SessionState::Resulted(RunOutcome::Completed(analysis)) => Some(analysis),
            _ => None,
        }
    }

    /// Replace the input. Previous results are discarded.
    pub fn set_document(&mut self, document: Document) {
        self.document = Some(document);
        self.transition(SessionState::Idle);
    }

    /// Accept new input, announcing a successful PDF extraction.
    pub fn ingest(&mut self, document: Document, sink: &dyn NoticeSink) {
        if let DocumentSource::Pdf { name, pages } = document.source() {
            tracing::info!(name = %name, pages, "pdf accepted");
            sink.emit(&Notice::success(PDF_EXTRACTED));
        }
        self.set_document(document);
    }

    /// Enter Processing if there is non-blank input.
    ///
    /// Returns `false`, emitting the missing-input warning, when the input is
    /// blank; the state is left as it was.
    pub fn begin(&mut self, sink: &dyn NoticeSink) -> bool {
        if matches!(self.state, SessionState::Processing) {
            return false;
        }
        if self.document.as_ref().is_none_or(Document::is_blank) {
            sink.emit(&Notice::warning(MISSING_INPUT));
            return false;
        }
        self.transition(SessionState::Processing);
        true
    }

    /// Record the result of the run started by [`Session::begin`].
    ///
    /// A failure is kept in the state for the presentation layer to show; it
    /// is not emitted as a notice.
    pub fn complete(&mut self, result: PipelineResult<Analysis>) {
        let outcome = match result {
            Ok(analysis) => RunOutcome::Completed(Box::new(analysis)),
            Err(err) => {
                tracing::warn!(error = %err, "run failed");
                RunOutcome::Failed(err)
            }
        };
        self.transition(SessionState::Resulted(outcome));
    }

    /// The Summarize action: begin, run the pipeline, complete.
    pub fn summarize(
        &mut self,
        pipeline: &Pipeline,
        profile: SummaryLengthProfile,
        sink: &dyn NoticeSink,
    ) -> &SessionState {
        if !self.begin(sink) {
            return &self.state;
        }
        let result = match &self.document {
            Some(document) => pipeline.run(document, profile, sink),
            None => Err(PipelineError::MissingInput),
        };
        self.complete(result);
        &self.state
    }

    /// Consume the session, yielding the last run's outcome if there is one.
    pub fn into_outcome(self) -> Option<RunOutcome> {
        match self.state {
            SessionState::Resulted(outcome) => Some(outcome),
            _ => None,
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = self.state.label(), to = next.label(), "session state");
        self.state = next;
        for observer in &self.observers {
            observer.state_changed(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::keywords::RakeExtractor;
    use crate::message::VecSink;
    use crate::summarize::{LengthBounds, SummarizeResult, Summarizer};
    use crate::wordcloud::{BitmapFace, WordCloudConfig, WordCloudRenderer};

    struct Counting(Rc<RefCell<usize>>);

    impl Summarizer for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn summarize(&self, _text: &str, _bounds: LengthBounds) -> SummarizeResult<String> {
            *self.0.borrow_mut() += 1;
            Ok("A summary.".into())
        }
    }

    struct Labels(Rc<RefCell<Vec<&'static str>>>);

    impl StateObserver for Labels {
        fn state_changed(&self, state: &SessionState) {
            self.0.borrow_mut().push(state.label());
        }
    }

    fn pipeline(calls: Rc<RefCell<usize>>) -> Pipeline {
        Pipeline::new(
            Box::new(Counting(calls)),
            Box::new(RakeExtractor::new()),
            WordCloudRenderer::with_face(WordCloudConfig::default(), Box::new(BitmapFace)),
        )
    }

    #[test]
    fn blank_input_warns_and_stays_idle() {
        let calls = Rc::new(RefCell::new(0));
        let pipeline = pipeline(calls.clone());
        let sink = VecSink::new();
        let mut session = Session::new();

        session.summarize(&pipeline, SummaryLengthProfile::Short, &sink);
        session.set_document(Document::typed("   "));
        session.summarize(&pipeline, SummaryLengthProfile::Short, &sink);

        assert!(matches!(session.state(), SessionState::Idle));
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(sink.notices(), vec![Notice::warning(MISSING_INPUT); 2]);
    }

    #[test]
    fn transitions_are_observed() {
        let calls = Rc::new(RefCell::new(0));
        let pipeline = pipeline(calls.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = VecSink::new();
        let mut session = Session::new();
        session.subscribe(Box::new(Labels(seen.clone())));

        session.set_document(Document::typed("Ferris the crab writes safe code."));
        session.summarize(&pipeline, SummaryLengthProfile::Short, &sink);

        assert_eq!(*seen.borrow(), vec!["idle", "processing", "completed"]);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(session.analysis().unwrap().summary.text(), "A summary.");
    }

    #[test]
    fn new_input_discards_results() {
        let pipeline = pipeline(Rc::new(RefCell::new(0)));
        let sink = VecSink::new();
        let mut session = Session::new();
        session.set_document(Document::typed("Ferris the crab writes safe code."));
        session.summarize(&pipeline, SummaryLengthProfile::Short, &sink);
        assert!(session.analysis().is_some());

        session.set_document(Document::typed("Other text."));
        assert!(matches!(session.state(), SessionState::Idle));
        assert!(session.analysis().is_none());
    }

    #[test]
    fn pdf_ingest_announces_extraction() {
        let sink = VecSink::new();
        let mut session = Session::new();
        session.ingest(
            Document::new(
                "page one",
                DocumentSource::Pdf {
                    name: "a.pdf".into(),
                    pages: 1,
                },
            ),
            &sink,
        );
        session.ingest(Document::typed("typed"), &sink);
        assert_eq!(sink.notices(), vec![Notice::success(PDF_EXTRACTED)]);
    }

    #[test]
    fn failed_run_keeps_no_results() {
        let sink = VecSink::new();
        let mut session = Session::new();
        session.set_document(Document::typed("Some text."));
        assert!(session.begin(&sink));
        session.complete(Err(PipelineError::MissingInput));

        assert_eq!(session.state().label(), "failed");
        assert!(session.analysis().is_none());
        assert!(sink.is_empty());
        assert!(matches!(
            session.into_outcome(),
            Some(RunOutcome::Failed(PipelineError::MissingInput))
        ));
    }
}
