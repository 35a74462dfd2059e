//! Format-agnostic object mapping.
//!
//! Typed objects are converted to and from [`GenericValue`] trees by an [`ObjectMapper`].
//! Wire formats only ever see generic values, through the [`Serializer`] trait.
//!
//! # Example
//!
//! ```
//! use data_mapper::{impl_mappable, GenericValue, ObjectMapper};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl_mappable! {
//!     User {
//!         name: String,
//!         age: i64,
//!     }
//! }
//!
//! let mapper = ObjectMapper::new();
//! let user = User { name: "Alice".to_string(), age: 30 };
//!
//! let value = mapper.serialize(&user);
//! assert_eq!(value.get_path("name"), Some(&GenericValue::from("Alice")));
//!
//! let back: User = mapper.deserialize(&value).unwrap();
//! assert_eq!(back, user);
//! ```

pub mod codable;
pub mod de;
pub mod error;
pub mod macros;
mod mapper;
mod number;
pub mod polymorph;
pub mod ser;
mod serializer;
pub mod transformation;
mod value;

pub use de::{Deserializable, DeserializableData};
pub use error::{DeserializationError, Result};
pub use mapper::ObjectMapper;
pub use number::SupportedNumber;
pub use polymorph::{Polymorph, Polymorphic, PolymorphicInfo, PolymorphicType, StaticPolymorph};
pub use ser::{Serializable, SerializableData};
pub use serializer::Serializer;
pub use transformation::{
    AnyTransformation, BoolTransformation, ComposedTransformation, DeserializableTransformation,
    DoubleTransformation, EnumTransformation, IntTransformation, RawRepresentable,
    Rfc3339DateTransformation, SerializableTransformation, StringTransformation,
    SupportedTypeConvertible, TimestampDateTransformation, Transformation, TransformationRegistry,
    UrlTransformation,
};
pub use value::{GenericValue, RawType};
