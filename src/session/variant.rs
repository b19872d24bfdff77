//! App identity variants recognized by the upstream session service.

// self
use crate::_prelude::*;

/// Upstream app identity under which sessions are issued and cached.
///
/// Each variant carries its fixed `Ubi-AppId` header value plus the storage and
/// override keys derived from its label. Tokens issued under one variant are not
/// interchangeable with the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppVariant {
	/// Second-generation app identity.
	V2,
	/// Third-generation app identity.
	V3,
}
impl AppVariant {
	/// Every variant in refresh order; `V2` is always processed before `V3`.
	pub const ALL: [Self; 2] = [Self::V2, Self::V3];

	/// Returns the stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::V2 => "v2",
			Self::V3 => "v3",
		}
	}

	/// Returns the fixed `Ubi-AppId` header value for the variant.
	pub const fn app_id(self) -> &'static str {
		match self {
			Self::V2 => "39baebad-39e5-4552-8c25-2c9b919064e2",
			Self::V3 => "3587dcbb-7f81-457c-9781-0e3f29f6f56a",
		}
	}

	/// Returns the store key under which the variant's token is cached.
	pub const fn storage_key(self) -> &'static str {
		match self {
			Self::V2 => "auth_token_v2",
			Self::V3 => "auth_token_v3",
		}
	}

	/// Returns the environment key that can override the variant's token.
	pub const fn env_key(self) -> &'static str {
		match self {
			Self::V2 => "UBI_TOKEN_V2",
			Self::V3 => "UBI_TOKEN_V3",
		}
	}
}
impl Display for AppVariant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for AppVariant {
	type Err = VariantParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"v2" => Ok(Self::V2),
			"v3" => Ok(Self::V3),
			other => Err(VariantParseError { raw: other.to_owned() }),
		}
	}
}

/// Error returned when a variant label fails to parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
#[error("Unknown app variant `{raw}`; expected `v2` or `v3`.")]
pub struct VariantParseError {
	/// Rejected input value.
	pub raw: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn refresh_order_starts_with_v2() {
		assert_eq!(AppVariant::ALL, [AppVariant::V2, AppVariant::V3]);
	}

	#[test]
	fn derived_keys_follow_the_label() {
		assert_eq!(AppVariant::V2.storage_key(), "auth_token_v2");
		assert_eq!(AppVariant::V3.storage_key(), "auth_token_v3");
		assert_eq!(AppVariant::V2.env_key(), "UBI_TOKEN_V2");
		assert_eq!(AppVariant::V3.env_key(), "UBI_TOKEN_V3");
	}

	#[test]
	fn variants_parse_from_lowercase_labels() {
		assert_eq!("v2".parse::<AppVariant>(), Ok(AppVariant::V2));
		assert_eq!("v3".parse::<AppVariant>(), Ok(AppVariant::V3));
		assert_eq!(
			"v4".parse::<AppVariant>(),
			Err(VariantParseError { raw: "v4".into() }),
			"Unknown labels must be rejected."
		);
	}

	#[test]
	fn serde_uses_lowercase_labels() {
		let payload = serde_json::to_string(&AppVariant::V2)
			.expect("Variant should serialize to a JSON string.");

		assert_eq!(payload, "\"v2\"");

		let round_trip: AppVariant = serde_json::from_str(&payload)
			.expect("Serialized variant should deserialize from JSON.");

		assert_eq!(round_trip, AppVariant::V2);
	}
}
