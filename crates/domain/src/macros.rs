//! Macro for implementing Display and FromStr for wire-coded enums
//!
//! The backend speaks Portuguese choice codes (`pendente`, `alta`, ...). This
//! macro gives each enum a `Display` that prints the wire code and a
//! case-insensitive `FromStr` that accepts the wire code plus any number of
//! aliases (typically the English name used on the command line).
//!
//! # Example
//!
//! ```rust
//! use maintrack_domain::impl_wire_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Shift {
//!     Morning,
//!     Night,
//! }
//!
//! impl_wire_code_conversions!(Shift {
//!     Morning => "manha" | "morning",
//!     Night => "noite" | "night",
//! });
//!
//! assert_eq!(Shift::Night.to_string(), "noite");
//! assert_eq!("MORNING".parse::<Shift>().unwrap(), Shift::Morning);
//! ```

/// Implements Display and FromStr traits for wire-coded enums
///
/// This macro generates:
/// - Display trait: prints the wire code (first string of each arm)
/// - FromStr trait: parses the wire code or any alias, case-insensitively
///
/// Parse errors are plain strings naming the enum, which reads well as a
/// `clap` value-parser message.
#[macro_export]
macro_rules! impl_wire_code_conversions {
    ($enum_name:ident { $($variant:ident => $code:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $enum_name {
            /// Wire code understood by the backend.
            pub const fn as_code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_code())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($code $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestLevel {
        Low,
        High,
    }

    impl_wire_code_conversions!(TestLevel {
        Low => "baixa" | "low",
        High => "alta" | "high" | "hi",
    });

    #[test]
    fn test_display_prints_wire_code() {
        assert_eq!(TestLevel::Low.to_string(), "baixa");
        assert_eq!(TestLevel::High.to_string(), "alta");
    }

    #[test]
    fn test_fromstr_accepts_code_and_aliases() {
        assert_eq!(TestLevel::from_str("baixa").unwrap(), TestLevel::Low);
        assert_eq!(TestLevel::from_str("low").unwrap(), TestLevel::Low);
        assert_eq!(TestLevel::from_str("hi").unwrap(), TestLevel::High);
    }

    #[test]
    fn test_fromstr_mixed_case_and_whitespace() {
        assert_eq!(TestLevel::from_str(" ALTA ").unwrap(), TestLevel::High);
        assert_eq!(TestLevel::from_str("LoW").unwrap(), TestLevel::Low);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = TestLevel::from_str("medium");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid TestLevel: medium"));
    }

    #[test]
    fn test_fromstr_empty() {
        assert!(TestLevel::from_str("").is_err());
    }
}
