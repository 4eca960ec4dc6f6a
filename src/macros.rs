//! Internal macros.

/// Declares a fieldless enum decoded from a numeric code.
///
/// `from_code` never fails: codes without a mapping decode to the variant named
/// after `default`, since real files carry codes outside the published tables.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident (default = $default:ident) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant
            ),+
        }

        impl $name {
            /// Decodes a raw code, falling back to the documented default.
            pub fn from_code(code: u32) -> Self {
                $(
                    if code == $code {
                        return Self::$variant;
                    }
                )+
                Self::$default
            }

            /// Returns the raw code of this variant.
            pub fn code(self) -> u32 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }
    };
}
