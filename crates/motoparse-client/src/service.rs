use std::future::Future;

use motoparse_core::ParseResult;

use crate::client::ParseClient;
use crate::error::ClientError;

/// The remote collaborator that turns a normalized URL into a
/// [`ParseResult`].
///
/// [`crate::ParsingOrchestrator`] is generic over this so tests can swap the
/// HTTP client for an in-process fake.
pub trait ParseService {
    fn parse_url(&self, url: &str) -> impl Future<Output = Result<ParseResult, ClientError>>;
}

impl ParseService for ParseClient {
    fn parse_url(&self, url: &str) -> impl Future<Output = Result<ParseResult, ClientError>> {
        ParseClient::parse_url(self, url)
    }
}

impl<S: ParseService + ?Sized> ParseService for &S {
    fn parse_url(&self, url: &str) -> impl Future<Output = Result<ParseResult, ClientError>> {
        (**self).parse_url(url)
    }
}
