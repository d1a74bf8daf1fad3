//! Input line parsing.

/// How a request must be processed relative to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Inline, in strict arrival order.
    Ordered,
    /// On an independent worker; the peer correlates by id.
    Concurrent,
}

/// One request parsed from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// No correlation token: the answer must keep input order.
    Plain { url: String },
    /// Carries the peer's integer channel id, echoed back verbatim.
    Identified { id: String, url: String },
}

impl Request {
    /// Parse one input line.
    ///
    /// A first token that parses as an integer and is followed by a URL makes
    /// the identified form. Otherwise the first token is the URL. A blank line
    /// yields a plain request with an empty URL.
    pub fn parse(line: &str) -> Self {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(first), Some(second)) if is_integer(first) => Request::Identified {
                id: first.to_string(),
                url: second.to_string(),
            },
            (Some(first), _) => Request::Plain {
                url: first.to_string(),
            },
            (None, _) => Request::Plain { url: String::new() },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Request::Plain { url } | Request::Identified { url, .. } => url,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Request::Plain { .. } => None,
            Request::Identified { id, .. } => Some(id.as_str()),
        }
    }

    pub fn mode(&self) -> ProcessingMode {
        match self {
            Request::Plain { .. } => ProcessingMode::Ordered,
            Request::Identified { .. } => ProcessingMode::Concurrent,
        }
    }

    /// Split into the correlation id and the URL.
    pub fn into_parts(self) -> (Option<String>, String) {
        match self {
            Request::Plain { url } => (None, url),
            Request::Identified { id, url } => (Some(id), url),
        }
    }
}

fn is_integer(token: &str) -> bool {
    token.parse::<i64>().is_ok()
}
