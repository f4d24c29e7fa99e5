//! Bias handling mode shared by trainability selection and checkpoint extraction

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which bias parameters train alongside (and are saved with) the LoRA matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoraBias {
    /// No bias parameters
    #[default]
    None,
    /// Every parameter whose name contains `bias`
    All,
    /// Only the biases of LoRA-adapted modules
    LoraOnly,
}

impl LoraBias {
    /// Canonical configuration name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::All => "all",
            Self::LoraOnly => "lora_only",
        }
    }
}

impl FromStr for LoraBias {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "all" => Ok(Self::All),
            "lora_only" => Ok(Self::LoraOnly),
            other => Err(Error::UnsupportedBias(other.to_string())),
        }
    }
}

impl fmt::Display for LoraBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_known_modes() {
        assert_eq!("none".parse::<LoraBias>().unwrap(), LoraBias::None);
        assert_eq!("all".parse::<LoraBias>().unwrap(), LoraBias::All);
        assert_eq!("lora_only".parse::<LoraBias>().unwrap(), LoraBias::LoraOnly);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(matches!("None".parse::<LoraBias>(), Err(Error::UnsupportedBias(s)) if s == "None"));
        assert!("ALL".parse::<LoraBias>().is_err());
        assert!("lora-only".parse::<LoraBias>().is_err());
        assert!("".parse::<LoraBias>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for bias in [LoraBias::None, LoraBias::All, LoraBias::LoraOnly] {
            assert_eq!(bias.to_string().parse::<LoraBias>().unwrap(), bias);
        }
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(LoraBias::default(), LoraBias::None);
    }

    #[test]
    fn test_serde_uses_config_names() {
        assert_eq!(serde_json::to_string(&LoraBias::LoraOnly).unwrap(), "\"lora_only\"");
        let parsed: LoraBias = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, LoraBias::All);
        assert!(serde_json::from_str::<LoraBias>("\"some\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_unknown_strings_rejected(s in "[a-z_]{0,12}") {
            prop_assume!(s != "none" && s != "all" && s != "lora_only");
            prop_assert!(s.parse::<LoraBias>().is_err());
        }
    }
}
