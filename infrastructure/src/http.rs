use domain::{CompletionEndpointError, SpeechEndpointError};
use reqwest::Client;
use std::time::Duration;

pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

pub fn completion_status_error(status: u16, body: String) -> CompletionEndpointError {
    match status {
        401 | 403 => CompletionEndpointError::Authentication(body),
        429 => CompletionEndpointError::RateLimited(body),
        500..=599 => CompletionEndpointError::Server { status, body },
        _ => CompletionEndpointError::Rejected { status, body },
    }
}

pub fn completion_transport_error(err: reqwest::Error) -> CompletionEndpointError {
    if err.is_timeout() {
        CompletionEndpointError::Timeout
    } else if err.is_decode() {
        CompletionEndpointError::MalformedResponse(err.to_string())
    } else {
        CompletionEndpointError::Network(err.to_string())
    }
}

pub fn speech_status_error(status: u16, body: String) -> SpeechEndpointError {
    match status {
        401 | 403 => SpeechEndpointError::Authentication(body),
        429 => SpeechEndpointError::RateLimited(body),
        500..=599 => SpeechEndpointError::Network(format!("upstream {}: {}", status, body)),
        _ => SpeechEndpointError::Rejected { status, body },
    }
}

pub fn speech_transport_error(err: reqwest::Error) -> SpeechEndpointError {
    if err.is_timeout() {
        SpeechEndpointError::Timeout
    } else if err.is_decode() {
        SpeechEndpointError::MalformedResponse(err.to_string())
    } else {
        SpeechEndpointError::Network(err.to_string())
    }
}
