pub const ERROR_MARKER: &str = "Error processing content:";

/// A failed chunk is data here, not an error to propagate; one bad chunk
/// must never abort its siblings.
#[derive(Debug, PartialEq, Clone)]
pub enum ChunkOutcome {
    Reply(String),
    Failed(String),
}

#[derive(Debug, PartialEq, Clone)]
pub struct ChunkAnalysis {
    // 1-based position of the chunk in the cleaned text.
    pub index: usize,
    pub outcome: ChunkOutcome,
}

impl ChunkAnalysis {
    pub fn display_text(&self) -> String {
        match &self.outcome {
            ChunkOutcome::Reply(reply) => reply.clone(),
            ChunkOutcome::Failed(reason) => format!("{} {}", ERROR_MARKER, reason),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Failed(_))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum AnalysisPrompt {
    Query(String),
    Listing,
}

const QUERY_INSTRUCTION: &str = "You are a helpful assistant that analyzes web content. \
    Extract and summarize relevant information based on the user's query.";

const LISTING_INSTRUCTION: &str = "You are a real estate data extraction assistant. \
    Extract exactly these five fields from the web content: Location, Price, Property Type, \
    Size, Developer. Reply with exactly five lines, one field per line, each formatted as \
    'Key: value'. If the content does not mention a field, keep its line and leave the value \
    blank. Extract only facts stated in the content; do not infer, summarize, or add extra \
    lines.";

impl AnalysisPrompt {
    pub fn system_instruction(&self) -> &'static str {
        match self {
            AnalysisPrompt::Query(_) => QUERY_INSTRUCTION,
            AnalysisPrompt::Listing => LISTING_INSTRUCTION,
        }
    }

    pub fn user_content(&self, chunk: &str) -> String {
        match self {
            AnalysisPrompt::Query(query) => format!(
                "Web Content: {}\n\nUser Query: {}\n\nPlease analyze the content and provide relevant information based on the query.",
                chunk, query
            ),
            AnalysisPrompt::Listing => format!("Web Content: {}", chunk),
        }
    }
}
