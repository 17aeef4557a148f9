//! Helpers for using the figment config parsing library

use figment::providers::Format;
use json5 as json;

/// A figment provider that can parse JSON5.
pub struct JsonProvider;

impl Format for JsonProvider {
    type Error = json::Error;

    const NAME: &'static str = "JSON5";

    fn from_str<T: serde::de::DeserializeOwned>(string: &str) -> Result<T, Self::Error> {
        json::from_str(string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::{Figment, providers::Serialized};
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_json5_over_defaults() {
        let sample: Sample = Figment::from(Serialized::defaults(Sample::default()))
            .merge(JsonProvider::string("{ count: 3, /* no name */ }"))
            .extract()
            .unwrap();
        assert_eq!(
            sample,
            Sample {
                name: String::new(),
                count: 3,
            }
        );
    }

    #[test]
    fn test_invalid_json5() {
        let result: Result<Sample, _> = Figment::from(JsonProvider::string("{ count: ")).extract();
        assert!(result.is_err());
    }
}
