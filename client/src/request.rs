use std::fmt::{self, Display};
use std::str::FromStr;

use url::Url;

use crate::{ClientError, Result};

/// Resource families exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    User,
    Faction,
    Company,
    Property,
    Market,
    /// Aggregate game data. Has no default selection.
    Torn,
    Key,
}

impl Endpoint {
    pub const ALL: [Endpoint; 7] = [
        Endpoint::User,
        Endpoint::Faction,
        Endpoint::Company,
        Endpoint::Property,
        Endpoint::Market,
        Endpoint::Torn,
        Endpoint::Key,
    ];

    /// Path segment used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::User => "user",
            Endpoint::Faction => "faction",
            Endpoint::Company => "company",
            Endpoint::Property => "property",
            Endpoint::Market => "market",
            Endpoint::Torn => "torn",
            Endpoint::Key => "key",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ClientError::InvalidRequest(
                "endpoint cannot be empty".to_string(),
            ));
        }
        Endpoint::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ClientError::InvalidRequest(format!("unknown endpoint `{}`", name)))
    }
}

/// Parameters of a single API call.
///
/// Rendered by [`RequestSpec::build`] as
/// `{endpoint}/{resource_id}?selections={csv}&key={key}[&comment={comment}]`.
/// The query order is fixed: `selections`, `key`, then `comment`.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestSpec {
    endpoint: Endpoint,
    resource_id: Option<String>,
    selections: Vec<String>,
    key: String,
    comment: Option<String>,
}

impl RequestSpec {
    pub fn new<K: Into<String>>(endpoint: Endpoint, key: K) -> Self {
        Self {
            endpoint,
            resource_id: None,
            selections: Vec::new(),
            key: key.into(),
            comment: None,
        }
    }

    /// Same as [`RequestSpec::new`] with the endpoint given by name
    pub fn parse<K: Into<String>>(endpoint: &str, key: K) -> Result<Self> {
        Ok(Self::new(endpoint.parse()?, key))
    }

    pub fn resource<S: Into<String>>(mut self, resource_id: S) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Replace the selections. Order is kept as given.
    pub fn selections<I, S>(mut self, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections = selections.into_iter().map(Into::into).collect();
        self
    }

    pub fn selection<S: Into<String>>(mut self, selection: S) -> Self {
        self.selections.push(selection.into());
        self
    }

    pub fn comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn selection_list(&self) -> &[String] {
        &self.selections
    }

    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Check the invariants that must hold before anything goes on the wire.
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "API key cannot be empty".to_string(),
            ));
        }
        if self.endpoint == Endpoint::Torn && self.selections.iter().all(|s| s.trim().is_empty()) {
            return Err(ClientError::InvalidRequest(
                "selections for the torn endpoint cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the relative URL for this request.
    pub fn build(&self) -> Result<String> {
        self.validate()?;

        let resource = match self.resource_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => urlencoding::encode(id).into_owned(),
            _ => String::new(),
        };
        let selections = self
            .selections
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join(",");

        let mut url = format!(
            "{}/{}?selections={}&key={}",
            self.endpoint,
            resource,
            selections,
            urlencoding::encode(&self.key)
        );
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.trim().is_empty()) {
            url.push_str(&format!("&comment={}", urlencoding::encode(comment)));
        }
        Ok(url)
    }
}

impl fmt::Debug for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpec")
            .field("endpoint", &self.endpoint)
            .field("resource_id", &self.resource_id)
            .field("selections", &self.selections)
            .field("key", &"<redacted>")
            .field("comment", &self.comment)
            .finish()
    }
}

/// Copy of `url` with the `key` query value replaced, safe to log.
pub fn redact_key(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pull the selections back out of a built URL.
    fn parse_selections(url: &str) -> Vec<String> {
        let (_, query) = url.split_once('?').unwrap();
        let raw = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("selections="))
            .unwrap();
        raw.split(',')
            .map(|s| urlencoding::decode(s).unwrap().into_owned())
            .collect()
    }

    #[test]
    fn test_build_basic() {
        let url = RequestSpec::new(Endpoint::User, "abc123")
            .resource("1")
            .selections(["basic", "profile"])
            .build()
            .unwrap();
        assert_eq!(url, "user/1?selections=basic,profile&key=abc123");
    }

    #[test]
    fn test_build_without_resource_keeps_empty_segment() {
        let url = RequestSpec::new(Endpoint::Faction, "abc123")
            .selection("basic")
            .build()
            .unwrap();
        assert_eq!(url, "faction/?selections=basic&key=abc123");

        let url = RequestSpec::new(Endpoint::Faction, "abc123")
            .resource("   ")
            .build()
            .unwrap();
        assert_eq!(url, "faction/?selections=&key=abc123");
    }

    #[test]
    fn test_build_with_comment() {
        let url = RequestSpec::new(Endpoint::Company, "abc123")
            .selection("profile")
            .comment("my tool")
            .build()
            .unwrap();
        assert_eq!(
            url,
            "company/?selections=profile&key=abc123&comment=my%20tool"
        );
    }

    #[test]
    fn test_build_blank_comment_is_omitted() {
        let url = RequestSpec::new(Endpoint::Market, "abc123")
            .resource("206")
            .selection("itemmarket")
            .comment("  ")
            .build()
            .unwrap();
        assert!(!url.contains("comment"));
    }

    #[test]
    fn test_build_keeps_selection_order_and_duplicates() {
        let url = RequestSpec::new(Endpoint::User, "k")
            .selections(["profile", "basic", "profile"])
            .build()
            .unwrap();
        assert!(url.contains("selections=profile,basic,profile&"));
    }

    #[test]
    fn test_selections_round_trip() {
        let selections = vec![
            "timestamp".to_string(),
            "items".to_string(),
            "a,b".to_string(),
            "with space".to_string(),
        ];
        let url = RequestSpec::new(Endpoint::Torn, "k")
            .selections(selections.clone())
            .build()
            .unwrap();
        assert_eq!(parse_selections(&url), selections);
    }

    #[test]
    fn test_empty_key_fails() {
        let err = RequestSpec::new(Endpoint::User, " ").build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_torn_requires_selections() {
        let err = RequestSpec::new(Endpoint::Torn, "k").build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));

        let err = RequestSpec::new(Endpoint::Torn, "k")
            .selections([" ", ""])
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));

        // Other endpoints have server-side defaults.
        assert!(RequestSpec::new(Endpoint::User, "k").build().is_ok());
    }

    #[test]
    fn test_empty_endpoint_fails() {
        let err = RequestSpec::parse("", "k").unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
        let err = "   ".parse::<Endpoint>().unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_endpoint_parse() {
        assert_eq!("user".parse::<Endpoint>().unwrap(), Endpoint::User);
        assert_eq!(" Torn ".parse::<Endpoint>().unwrap(), Endpoint::Torn);
        assert!("racing".parse::<Endpoint>().is_err());
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.to_string().parse::<Endpoint>().unwrap(), endpoint);
        }
    }

    #[test]
    fn test_debug_hides_key() {
        let spec = RequestSpec::new(Endpoint::User, "secret-key");
        assert!(!format!("{:?}", spec).contains("secret-key"));
    }

    #[test]
    fn test_redact_key() {
        let url = Url::parse("https://api.torn.com/user/1?selections=basic&key=abc&comment=x").unwrap();
        assert_eq!(
            redact_key(&url),
            "https://api.torn.com/user/1?selections=basic&key=REDACTED&comment=x"
        );

        let url = Url::parse("https://api.torn.com/user/1").unwrap();
        assert_eq!(redact_key(&url), "https://api.torn.com/user/1");
    }
}
