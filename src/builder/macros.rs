//! Macros for ergonomic token declarations.

/// Declare an enum usable as a state or event token.
///
/// Derives the traits `Token` needs and implements both `Token` (the variant
/// name) and `Enumerable` (every variant, in declaration order).
///
/// # Example
///
/// ```
/// use flying_fsm::core::{Enumerable, Token};
/// use flying_fsm::token_enum;
///
/// token_enum! {
///     pub enum Weather {
///         Sunny,
///         Rainy,
///         Foggy,
///     }
/// }
///
/// assert_eq!(Weather::Rainy.name(), "Rainy");
/// assert_eq!(Weather::all().len(), 3);
/// ```
#[macro_export]
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Token for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl $crate::core::Enumerable for $name {
            fn all() -> ::std::vec::Vec<Self> {
                ::std::vec![$(Self::$variant),*]
            }
        }
    };
}
