use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::{Envelope, ErrorInfo};
use crate::request::Endpoint;

/// Declares a response envelope: the `error` slot plus every other top-level
/// field kept as an opaque selection map.
macro_rules! envelope {
    ($(#[$meta:meta])* $name:ident => $endpoint:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub error: Option<ErrorInfo>,
            #[serde(flatten)]
            pub data: Map<String, Value>,
        }

        impl $name {
            pub const ENDPOINT: Endpoint = $endpoint;

            /// Raw JSON of a top-level field, if the response carried it
            pub fn get(&self, field: &str) -> Option<&Value> {
                self.data.get(field)
            }

            /// Deserialize a single top-level field into a caller-defined type.
            pub fn field<T: DeserializeOwned>(&self, field: &str) -> serde_json::Result<Option<T>> {
                self.data
                    .get(field)
                    .map(|value| T::deserialize(value))
                    .transpose()
            }

            /// Deserialize the whole payload into a caller-defined type.
            pub fn parse<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
                T::deserialize(Value::Object(self.data.clone()))
            }
        }

        impl Envelope for $name {
            fn error_info(&self) -> Option<&ErrorInfo> {
                self.error.as_ref()
            }

            fn error_info_mut(&mut self) -> &mut Option<ErrorInfo> {
                &mut self.error
            }
        }
    };
}

envelope!(
    /// Response of the `user` endpoint.
    UserResponse => Endpoint::User
);
envelope!(
    /// Response of the `faction` endpoint.
    FactionResponse => Endpoint::Faction
);
envelope!(
    /// Response of the `company` endpoint.
    CompanyResponse => Endpoint::Company
);
envelope!(
    /// Response of the `property` endpoint.
    PropertyResponse => Endpoint::Property
);
envelope!(
    /// Response of the `market` endpoint (item market listings).
    MarketResponse => Endpoint::Market
);
envelope!(
    /// Response of the aggregate `torn` endpoint.
    TornResponse => Endpoint::Torn
);
envelope!(
    /// Response of the `key` endpoint.
    KeyResponse => Endpoint::Key
);
