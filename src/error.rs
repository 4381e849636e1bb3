//! Fatal failure taxonomy for the index pipeline.
//!
//! "Not found" is deliberately absent: the source client reports a missing
//! resource as `Ok(None)`, and callers decide whether that skips an id or
//! leaves a reference unresolved. Everything in [`DexError`] aborts the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DexError {
    /// The request could not be sent or its body could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any response other than 200 or 404.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// The body was not JSON of the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A reference URL did not contain `/<segment>/<digits>/`.
    #[error("malformed {segment} reference: {url}")]
    MalformedReference { url: String, segment: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_names_url_and_code() {
        let err = DexError::Status {
            url: "https://pokeapi.co/api/v2/item/1/".to_string(),
            status: 500,
        };
        assert_eq!(
            err.to_string(),
            "unexpected status 500 from https://pokeapi.co/api/v2/item/1/"
        );
    }

    #[test]
    fn malformed_reference_message() {
        let err = DexError::MalformedReference {
            url: "https://example.com/nope".to_string(),
            segment: "machine".to_string(),
        };
        assert!(err.to_string().contains("malformed machine reference"));
    }
}
