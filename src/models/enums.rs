use serde::{Deserialize, Serialize};

/// Unknown string value for a string-backed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Gender {
    Male => "male",
    Female => "female",
});

str_enum!(MessageRole {
    User => "user",
    Assistant => "assistant",
});

str_enum!(ReplyKind {
    Answer => "answer",
    ConfigurationError => "configuration_error",
    BackendError => "backend_error",
});

str_enum!(ReportTab {
    Payroll => "payroll",
    Billing => "billing",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn gender_round_trip() {
        for variant in [Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_str(variant.as_str()).unwrap(), variant);
        }
    }

    #[test]
    fn report_tab_parses_lowercase_only() {
        assert_eq!(ReportTab::from_str("payroll").unwrap(), ReportTab::Payroll);
        assert_eq!(ReportTab::from_str("billing").unwrap(), ReportTab::Billing);
        let err = ReportTab::from_str("Payroll").unwrap_err();
        assert_eq!(err.field, "ReportTab");
        assert_eq!(err.value, "Payroll");
    }

    #[test]
    fn message_role_serializes_snake_case() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, MessageRole::User);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ReportTab::Billing.to_string(), "billing");
        assert_eq!(Gender::Female.to_string(), "female");
    }
}
