use crate::SentimentError;
use crate::payload::{self, AnalyzeReply};

/// The only label that gets the highlighted treatment.
pub const POSITIVE: &str = "Positive";

/// Styling applied to the sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub color: &'static str,
    pub font_size: &'static str,
}

impl Tone {
    pub const POSITIVE: Tone = Tone { color: "green", font_size: "24px" };
    pub const OTHER: Tone = Tone { color: "red", font_size: "20px" };

    /// Binary mapping: Positive versus everything else, Neutral included.
    pub fn for_sentiment(sentiment: Option<&serde_json::Value>) -> Tone {
        if payload::loosely_equals(sentiment, POSITIVE) {
            Tone::POSITIVE
        } else {
            Tone::OTHER
        }
    }
}

/// What to paint into the result container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendition {
    pub text: String,
    pub sentiment: String,
    pub tone: Tone,
}

impl Rendition {
    pub fn markup(&self) -> String {
        fragment(&self.text, &self.sentiment, self.tone.color, self.tone.font_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The exchange never produced a response.
    NoResponse,
    /// Anything other than 200.
    Status(u16),
    /// 200 with a well-formed body whose `sentiment` is absent or falsy.
    NoSentiment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Render(Rendition),
    Ignore(IgnoreReason),
}

/// Decides what one completed exchange does to the page.
///
/// Only a 200 body is ever parsed; a malformed one is returned as an error
/// rather than swallowed.
pub fn decide(status: u16, body: &[u8]) -> Result<Decision, SentimentError> {
    if status != 200 {
        return Ok(Decision::Ignore(IgnoreReason::Status(status)));
    }

    let reply = AnalyzeReply::parse(body)?;
    let sentiment = reply.sentiment();
    if !payload::is_truthy(sentiment) {
        return Ok(Decision::Ignore(IgnoreReason::NoSentiment));
    }

    Ok(Decision::Render(Rendition {
        text: payload::display(reply.text()),
        sentiment: payload::display(sentiment),
        tone: Tone::for_sentiment(sentiment),
    }))
}

/// The fixed result template. Values are interpolated without escaping.
pub fn fragment(text: &str, sentiment: &str, color: &str, size: &str) -> String {
    format!(
        "<h2>Sentiment Result</h2>\
         <p><strong>Text:</strong> {text}</p>\
         <p><strong>Sentiment:</strong> \
         <span style=\"color:{color};font-size:{size};\">{sentiment}</span></p>"
    )
}
