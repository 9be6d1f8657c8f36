use std::fmt;

use crate::domain::analysis::ChunkAnalysis;

/// Idle -> Fetching -> Ready -> Analyzing -> Done, with Done feeding back
/// into further analyses or a fresh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Ready,
    Analyzing,
    Done,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

#[derive(Debug, PartialEq)]
pub enum SessionError {
    FetchInProgress,
    AnalysisInProgress,
    NothingFetched,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::FetchInProgress => write!(f, "A fetch is already in progress"),
            SessionError::AnalysisInProgress => write!(f, "An analysis is already running"),
            SessionError::NothingFetched => {
                write!(f, "Scrape a website before requesting analysis")
            }
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug, Default)]
pub struct Session {
    phase: Phase,
    source_url: Option<String>,
    cleaned_content: Option<String>,
    results: Vec<ChunkAnalysis>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn cleaned_content(&self) -> Option<&str> {
        self.cleaned_content.as_deref()
    }

    pub fn results(&self) -> &[ChunkAnalysis] {
        &self.results
    }

    pub fn begin_fetch(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Fetching => Err(SessionError::FetchInProgress),
            Phase::Analyzing => Err(SessionError::AnalysisInProgress),
            Phase::Idle | Phase::Ready | Phase::Done => {
                self.phase = Phase::Fetching;
                Ok(())
            }
        }
    }

    // Results from a previous page no longer describe anything.
    pub fn complete_fetch(&mut self, url: String, cleaned_content: String) {
        self.phase = Phase::Ready;
        self.source_url = Some(url);
        self.cleaned_content = Some(cleaned_content);
        self.results.clear();
    }

    pub fn fail_fetch(&mut self) {
        self.phase = match self.cleaned_content {
            Some(_) => Phase::Ready,
            None => Phase::Idle,
        };
    }

    /// Hands back a copy of the content so no lock is held while the
    /// chunks are out being analyzed.
    pub fn begin_analysis(&mut self) -> Result<String, SessionError> {
        match self.phase {
            Phase::Ready | Phase::Done => match &self.cleaned_content {
                Some(content) => {
                    self.phase = Phase::Analyzing;
                    Ok(content.clone())
                }
                None => Err(SessionError::NothingFetched),
            },
            Phase::Analyzing => Err(SessionError::AnalysisInProgress),
            Phase::Fetching => Err(SessionError::FetchInProgress),
            Phase::Idle => Err(SessionError::NothingFetched),
        }
    }

    // Callers sort results by chunk index before handing them in.
    pub fn complete_analysis(&mut self, results: Vec<ChunkAnalysis>) {
        self.phase = Phase::Done;
        self.results = results;
    }
}
