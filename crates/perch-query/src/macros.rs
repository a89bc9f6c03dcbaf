//! Macros for defining property sets.
//!
//! The [`define_properties!`] macro generates [`Property`](crate::Property)
//! constants for a type, tying property names to their type tags and
//! getters.

/// Defines typed property constants for a queryable type.
///
/// # Syntax
///
/// ```ignore
/// define_properties!(Entry {
///     NAME: Str => "name", get_name,
///     DOWNLOADS: Int => "downloads", get_downloads,
/// });
/// ```
///
/// This expands to:
///
/// ```ignore
/// pub const NAME: perch_query::Property<Entry> =
///     perch_query::Property::new("name", perch_query::TypeTag::Str, get_name);
/// pub const DOWNLOADS: perch_query::Property<Entry> =
///     perch_query::Property::new("downloads", perch_query::TypeTag::Int, get_downloads);
/// ```
///
/// Each getter is a `fn(&T) -> Value` whose result matches the declared
/// tag; the constants live in the module the macro is invoked in.
#[macro_export]
macro_rules! define_properties {
    (
        $ty:ty {
            $($prop_name:ident: $tag:ident => $name:literal, $getter:expr),* $(,)?
        }
    ) => {
        $(
            pub const $prop_name: $crate::property::Property<$ty> =
                $crate::property::Property::new(
                    $name,
                    $crate::property::TypeTag::$tag,
                    $getter,
                );
        )*
    };
}
