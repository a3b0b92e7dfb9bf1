use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::payload::AnalyzeRequest;
use crate::transport::{HttpReply, Transport, TransportError};
use crate::ui::UiPort;
use crate::verdict::{self, Decision, IgnoreReason, Rendition};
use crate::SentimentError;

pub const DEFAULT_ENDPOINT: &str = "/";

/// How one invocation settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Rendered(Rendition),
    Ignored(IgnoreReason),
}

/// Bound to the page's "analyze" action. Each call reads the input once,
/// fires one request and paints at most once.
pub struct SentimentRequestHandler<U, T> {
    ui: Arc<U>,
    transport: Arc<T>,
    endpoint: String,
}

impl<U, T> SentimentRequestHandler<U, T>
where
    U: UiPort + 'static,
    T: Transport + 'static,
{
    pub fn new(ui: Arc<U>, transport: Arc<T>) -> Self {
        Self { ui, transport, endpoint: DEFAULT_ENDPOINT.to_string() }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn ui(&self) -> &Arc<U> {
        &self.ui
    }

    /// Captures the input and fires the request, returning as soon as it is
    /// in flight. A missing input element fails here, before anything is
    /// sent. The handle may be dropped; the request still runs to
    /// completion and a malformed reply surfaces only through it.
    pub fn analyze_sentiment(
        &self,
    ) -> Result<JoinHandle<Result<Completion, SentimentError>>, SentimentError> {
        let text = self.ui.read_input_text()?;
        let body = AnalyzeRequest::new(text).to_json()?;

        let ui = Arc::clone(&self.ui);
        let transport = Arc::clone(&self.transport);
        let endpoint = self.endpoint.clone();

        Ok(tokio::spawn(async move {
            let reply = transport.post_json(&endpoint, body).await;
            complete(ui.as_ref(), reply)
        }))
    }
}

/// Completion handler for one exchange.
pub fn complete<U: UiPort + ?Sized>(
    ui: &U,
    reply: Result<HttpReply, TransportError>,
) -> Result<Completion, SentimentError> {
    let reply = match reply {
        Ok(reply) => reply,
        Err(e) => {
            tracing::debug!(error = %e, "no response; page left untouched");
            return Ok(Completion::Ignored(IgnoreReason::NoResponse));
        }
    };

    match verdict::decide(reply.status, &reply.body)? {
        Decision::Render(rendition) => {
            let tone = rendition.tone;
            ui.render_result(&rendition.text, &rendition.sentiment, tone.color, tone.font_size)?;
            tracing::debug!(sentiment = %rendition.sentiment, "result rendered");
            Ok(Completion::Rendered(rendition))
        }
        Decision::Ignore(reason) => {
            tracing::debug!(?reason, "reply ignored");
            Ok(Completion::Ignored(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Document, Element};
    use futures::future::BoxFuture;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Answers every request with the same reply and records what was sent.
    struct CannedTransport {
        reply: Option<HttpReply>,
        sent: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl CannedTransport {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self { reply: Some(HttpReply::new(status, body)), sent: Mutex::new(Vec::new()) })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self { reply: None, sent: Mutex::new(Vec::new()) })
        }

        fn sent(&self) -> Vec<(String, serde_json::Value)> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(path, body)| (path.clone(), serde_json::from_slice(body).unwrap()))
                .collect()
        }
    }

    impl Transport for CannedTransport {
        fn post_json<'a>(
            &'a self,
            path: &'a str,
            body: Vec<u8>,
        ) -> BoxFuture<'a, Result<HttpReply, TransportError>> {
            self.sent.lock().unwrap().push((path.to_string(), body));
            let reply = self
                .reply
                .clone()
                .ok_or_else(|| TransportError::InvalidUrl("http://nowhere".into()));
            Box::pin(async move { reply })
        }
    }

    /// Holds each request until the test releases the reply for its text.
    struct GatedTransport {
        gates: Mutex<HashMap<String, oneshot::Receiver<HttpReply>>>,
    }

    impl Transport for GatedTransport {
        fn post_json<'a>(
            &'a self,
            _path: &'a str,
            body: Vec<u8>,
        ) -> BoxFuture<'a, Result<HttpReply, TransportError>> {
            let request: AnalyzeRequest = serde_json::from_slice(&body).unwrap();
            let gate = self.gates.lock().unwrap().remove(&request.text).unwrap();
            Box::pin(async move {
                gate.await.map_err(|_| TransportError::InvalidUrl("gate dropped".into()))
            })
        }
    }

    fn handler(
        input: &str,
        transport: Arc<CannedTransport>,
    ) -> SentimentRequestHandler<Document, CannedTransport> {
        SentimentRequestHandler::new(Arc::new(Document::with_form(input)), transport)
    }

    #[tokio::test]
    async fn sends_exactly_one_request_with_the_raw_text() {
        for input in ["", " spaced ", "ünïcödé ✓", "line\nbreak", "{\"json\":true}"] {
            let transport = CannedTransport::replying(404, "");
            let h = handler(input, transport.clone());
            h.analyze_sentiment().unwrap().await.unwrap().unwrap();

            assert_eq!(
                transport.sent(),
                vec![("/".to_string(), serde_json::json!({ "text": input }))]
            );
        }
    }

    #[tokio::test]
    async fn positive_reply_renders_green() {
        let transport = CannedTransport::replying(200, r#"{"sentiment":"Positive","text":"great day"}"#);
        let h = handler("great day", transport);

        let done = h.analyze_sentiment().unwrap().await.unwrap().unwrap();
        assert!(matches!(done, Completion::Rendered(_)));
        assert_eq!(
            h.ui().result_html().unwrap(),
            "<h2>Sentiment Result</h2><p><strong>Text:</strong> great day</p>\
             <p><strong>Sentiment:</strong> \
             <span style=\"color:green;font-size:24px;\">Positive</span></p>"
        );
    }

    #[tokio::test]
    async fn negative_and_neutral_render_red() {
        for label in ["Negative", "Neutral"] {
            let body = format!(r#"{{"sentiment":"{}","text":"X"}}"#, label);
            let h = handler("X", CannedTransport::replying(200, &body));
            h.analyze_sentiment().unwrap().await.unwrap().unwrap();

            let html = h.ui().result_html().unwrap();
            assert!(html.contains("color:red;font-size:20px;"), "{}", html);
            assert!(html.contains(&format!(">{}</span>", label)));
        }
    }

    #[tokio::test]
    async fn failures_leave_the_container_untouched() {
        let cases = [
            (CannedTransport::replying(404, r#"{"sentiment":"Positive","text":"X"}"#), IgnoreReason::Status(404)),
            (CannedTransport::replying(200, r#"{"text":"X"}"#), IgnoreReason::NoSentiment),
            (CannedTransport::replying(200, r#"{"sentiment":"","text":"X"}"#), IgnoreReason::NoSentiment),
            (CannedTransport::unreachable(), IgnoreReason::NoResponse),
        ];

        for (transport, reason) in cases {
            let h = handler("X", transport);
            h.ui().insert("result", Element { inner_html: "previous".into(), ..Element::default() });

            let done = h.analyze_sentiment().unwrap().await.unwrap().unwrap();
            assert_eq!(done, Completion::Ignored(reason));
            assert_eq!(h.ui().result_html().unwrap(), "previous");
        }
    }

    #[tokio::test]
    async fn malformed_reply_faults_and_leaves_the_container_untouched() {
        let h = handler("X", CannedTransport::replying(200, "<html>oops</html>"));
        h.ui().insert("result", Element { inner_html: "previous".into(), ..Element::default() });

        let outcome = h.analyze_sentiment().unwrap().await.unwrap();
        assert!(matches!(outcome, Err(SentimentError::MalformedBody(_))));
        assert_eq!(h.ui().result_html().unwrap(), "previous");
    }

    #[tokio::test]
    async fn missing_input_fails_before_sending() {
        let transport = CannedTransport::replying(200, "{}");
        let h = SentimentRequestHandler::new(Arc::new(Document::new("text", "result")), transport.clone());

        assert!(matches!(h.analyze_sentiment(), Err(SentimentError::Ui(_))));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn endpoint_is_configurable() {
        let transport = CannedTransport::replying(404, "");
        let h = handler("X", transport.clone()).with_endpoint("/predict");
        h.analyze_sentiment().unwrap().await.unwrap().unwrap();
        assert_eq!(transport.sent()[0].0, "/predict");
    }

    #[tokio::test]
    async fn identical_exchanges_render_identical_markup() {
        let transport = CannedTransport::replying(200, r#"{"sentiment":"Negative","text":"again"}"#);
        let h = handler("again", transport);

        h.analyze_sentiment().unwrap().await.unwrap().unwrap();
        let first = h.ui().result_html().unwrap();
        h.analyze_sentiment().unwrap().await.unwrap().unwrap();
        assert_eq!(h.ui().result_html().unwrap(), first);
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent_and_last_arrival_wins() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let transport = Arc::new(GatedTransport {
            gates: Mutex::new(HashMap::from([
                ("first".to_string(), first_rx),
                ("second".to_string(), second_rx),
            ])),
        });
        let doc = Arc::new(Document::with_form("first"));
        let h = SentimentRequestHandler::new(doc.clone(), transport);

        let first = h.analyze_sentiment().unwrap();
        doc.set_value("text", "second").unwrap();
        let second = h.analyze_sentiment().unwrap();

        second_tx
            .send(HttpReply::new(200, r#"{"sentiment":"Positive","text":"second"}"#))
            .unwrap();
        second.await.unwrap().unwrap();
        assert!(doc.result_html().unwrap().contains("second"));

        first_tx
            .send(HttpReply::new(200, r#"{"sentiment":"Negative","text":"first"}"#))
            .unwrap();
        first.await.unwrap().unwrap();

        let html = doc.result_html().unwrap();
        assert!(html.contains("<strong>Text:</strong> first</p>"));
        assert!(html.contains("color:red;"));
    }
}
