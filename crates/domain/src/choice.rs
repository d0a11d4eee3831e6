//! Closed choice enums with a stable upper-case wire and storage form.

/// Returned when a string does not name any variant of a choice enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! define_choice {
    ($(#[doc = $doc:expr])* $name:ident { $($variant:ident => $text:literal),+ $(,)? } default $default:ident) => {
        $crate::choice::define_choice!($(#[doc = $doc])* $name { $($variant => $text),+ });

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }
    };
    ($(#[doc = $doc:expr])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The upper-case form used on the wire and in storage.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::choice::UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::choice::UnknownChoice {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use define_choice;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    define_choice!(
        /// Test-only choice.
        Color { Red => "RED", Green => "GREEN" } default Green
    );

    #[test]
    fn should_parse_known_values() {
        assert_eq!(Color::from_str("GREEN").unwrap(), Color::Green);
        assert_eq!(Color::Red.as_str(), "RED");
    }

    #[test]
    fn should_report_kind_for_unknown_values() {
        let err = Color::from_str("green").unwrap_err();
        assert_eq!(err.kind, "Color");
        assert_eq!(err.to_string(), "unknown Color value: green");
    }

    #[test]
    fn should_use_upper_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&Color::Red).unwrap(), "\"RED\"");
        let parsed: Color = serde_json::from_str("\"GREEN\"").unwrap();
        assert_eq!(parsed, Color::Green);
        assert_eq!(Color::ALL.len(), 2);
        assert_eq!(Color::default(), Color::Green);
    }
}
