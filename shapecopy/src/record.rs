//! Record adapters.
//!
//! Rust has no runtime field enumeration, so records opt in through
//! [`record!`](crate::record), which declares the struct unchanged and
//! generates its [`Shaped`](crate::Shaped), [`Describe`](crate::Describe) and
//! [`Record`](crate::Record) impls. Field visibility is read from the
//! declaration: a bare `pub` field is public, anything else is private and
//! can only be read by the engine.

/// Declare a struct the copy engine can read and write by field name.
///
/// The struct must derive (or implement) `Clone`, `Debug` and `Default`, and
/// every field type must implement [`Shaped`](crate::Shaped).
///
/// ```
/// shapecopy::record! {
///     #[derive(Clone, Debug, Default, PartialEq)]
///     pub struct Server {
///         pub host: String,
///         pub port: i32,
///         secret: String,
///     }
/// }
///
/// let mut server = Server::default();
/// let source = shapecopy::Value::from([
///     ("host", shapecopy::Value::from("localhost")),
///     ("port", shapecopy::Value::from(8080i32)),
/// ]);
/// shapecopy::copy(&source, &mut server).unwrap();
/// assert_eq!(server.host, "localhost");
/// assert_eq!(server.port, 8080);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Shaped for $name {
            const SHAPE: &'static $crate::Shape = &$crate::Shape {
                type_identifier: ::core::stringify!($name),
                def: $crate::Def::Record,
                zero: $crate::zero_of::<$name>,
            };
        }

        impl $crate::Describe for $name {
            $crate::__describe_common!();

            fn is_zero(&self) -> bool {
                true $(&& $crate::Describe::is_zero(&self.$field))*
            }

            fn peek(&self) -> $crate::Peek<'_> {
                $crate::Peek::Record(self)
            }

            fn poke(&mut self) -> $crate::Poke<'_> {
                $crate::Poke::Record(self)
            }
        }

        impl $crate::Record for $name {
            fn fields(&self) -> &'static [$crate::Field] {
                const FIELDS: &[$crate::Field] = &[
                    $($crate::Field::new(
                        ::core::stringify!($field),
                        ::core::stringify!($field_vis),
                    ),)*
                ];
                FIELDS
            }

            fn field(&self, name: &str) -> ::core::option::Option<&dyn $crate::Describe> {
                match name {
                    $(::core::stringify!($field) => {
                        ::core::option::Option::Some(&self.$field as &dyn $crate::Describe)
                    })*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(
                &mut self,
                name: &str,
            ) -> ::core::option::Option<&mut dyn $crate::Describe> {
                match name {
                    $(::core::stringify!($field) => {
                        ::core::option::Option::Some(&mut self.$field as &mut dyn $crate::Describe)
                    })*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };
}
