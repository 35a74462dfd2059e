//! Runtime selection of concrete types for polymorphic values.

use crate::de::{Deserializable, DeserializableData};
use crate::error::Result;
use crate::value::GenericValue;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Constructor = dyn Fn(&DeserializableData<'_>) -> Result<Box<dyn Any>> + Send + Sync;

/// Chooses concrete types while deserializing and stamps type information while serializing.
pub trait Polymorph: Send + Sync {
    /// The subtype to build when `requested` is deserialized from `value`.
    ///
    /// `None` keeps the requested type. A returned subtype must construct a value of the
    /// requested type, usually by upcasting into it.
    fn polymorph_type(&self, requested: TypeId, value: &GenericValue) -> Option<&PolymorphicType>;

    /// Adds type information for the concrete type `of` into its serialized `value`.
    ///
    /// Returns true if anything was written.
    fn write_type_info(&self, value: &mut GenericValue, of: TypeId) -> bool;
}

/// A named subtype that deserializes itself and upcasts into its base type.
#[derive(Clone)]
pub struct PolymorphicType {
    name: String,
    subtype_id: TypeId,
    constructor: Arc<Constructor>,
}

impl PolymorphicType {
    /// A subtype `Sub` of `Base` registered as `name`.
    pub fn new<Base, Sub>(name: impl Into<String>, upcast: fn(Sub) -> Base) -> Self
    where
        Base: 'static,
        Sub: Deserializable,
    {
        Self {
            name: name.into(),
            subtype_id: TypeId::of::<Sub>(),
            constructor: Arc::new(move |data: &DeserializableData<'_>| {
                let sub = Sub::deserialize(data)?;
                Ok(Box::new(upcast(sub)) as Box<dyn Any>)
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `TypeId` of the subtype itself, before upcasting.
    pub fn subtype_id(&self) -> TypeId {
        self.subtype_id
    }

    /// Deserializes the subtype and returns it upcast into the base type.
    pub fn construct(&self, data: &DeserializableData<'_>) -> Result<Box<dyn Any>> {
        (self.constructor)(data)
    }
}

impl fmt::Debug for PolymorphicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphicType")
            .field("name", &self.name)
            .finish()
    }
}

/// A base type, the key holding the discriminator, and its named subtypes.
///
/// # Examples
///
/// ```
/// use data_mapper::{impl_mappable, PolymorphicInfo, StaticPolymorph, ObjectMapper};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Circle { radius: f64 }
/// impl_mappable!(Circle { radius: f64 });
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Square { side: f64 }
/// impl_mappable!(Square { side: f64 });
///
/// #[derive(Debug, PartialEq)]
/// enum Shape { Circle(Circle), Square(Square) }
///
/// impl data_mapper::Deserializable for Shape {
///     fn deserialize(data: &data_mapper::DeserializableData<'_>) -> data_mapper::Result<Self> {
///         Err(data_mapper::DeserializationError::custom("shape without a type"))
///     }
/// }
///
/// let polymorph = StaticPolymorph::new().register(
///     PolymorphicInfo::<Shape>::new("type")
///         .with_subtype("circle", Shape::Circle)
///         .with_subtype("square", Shape::Square),
/// );
/// let mapper = ObjectMapper::with_polymorph(polymorph);
///
/// let value = mapper.serialize(&Circle { radius: 2.0 });
/// assert_eq!(value.get("type").and_then(|v| v.as_string()), Some("circle"));
///
/// let shape: Shape = mapper.deserialize(&value).unwrap();
/// assert_eq!(shape, Shape::Circle(Circle { radius: 2.0 }));
/// ```
pub struct PolymorphicInfo<Base> {
    key: String,
    subtypes: Vec<PolymorphicType>,
    _base: PhantomData<fn() -> Base>,
}

impl<Base: 'static> PolymorphicInfo<Base> {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            subtypes: Vec::new(),
            _base: PhantomData,
        }
    }

    pub fn with_subtype<Sub: Deserializable>(
        mut self,
        name: impl Into<String>,
        upcast: fn(Sub) -> Base,
    ) -> Self {
        self.subtypes.push(PolymorphicType::new(name, upcast));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn subtypes(&self) -> &[PolymorphicType] {
        &self.subtypes
    }
}

/// Types that describe their own polymorphic family.
pub trait Polymorphic: Sized + 'static {
    fn polymorphic_info() -> PolymorphicInfo<Self>;
}

#[derive(Debug)]
struct Family {
    key: String,
    subtypes: HashMap<String, PolymorphicType>,
}

/// A [`Polymorph`] built from registered [`PolymorphicInfo`] families.
///
/// Reading looks up the family of the requested type, reads the name under the family key and
/// picks the matching subtype. Missing or unknown names keep the requested type. Writing adds
/// `key: name` to map results of registered subtypes.
#[derive(Debug, Default)]
pub struct StaticPolymorph {
    families: HashMap<TypeId, Family>,
    tags: HashMap<TypeId, (String, String)>,
}

impl StaticPolymorph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a family. Registering the same base again replaces it.
    pub fn register<Base: 'static>(mut self, info: PolymorphicInfo<Base>) -> Self {
        let mut subtypes = HashMap::with_capacity(info.subtypes.len());
        for subtype in info.subtypes {
            self.tags
                .insert(subtype.subtype_id(), (info.key.clone(), subtype.name.clone()));
            subtypes.insert(subtype.name.clone(), subtype);
        }
        self.families.insert(
            TypeId::of::<Base>(),
            Family {
                key: info.key,
                subtypes,
            },
        );
        self
    }

    pub fn register_polymorphic<Base: Polymorphic>(self) -> Self {
        self.register(Base::polymorphic_info())
    }

    /// Returns true if `Base` has a registered family.
    pub fn is_registered<Base: 'static>(&self) -> bool {
        self.families.contains_key(&TypeId::of::<Base>())
    }
}

impl Polymorph for StaticPolymorph {
    fn polymorph_type(&self, requested: TypeId, value: &GenericValue) -> Option<&PolymorphicType> {
        let family = self.families.get(&requested)?;
        let name = value.get(&family.key)?.as_string()?;
        family.subtypes.get(name)
    }

    fn write_type_info(&self, value: &mut GenericValue, of: TypeId) -> bool {
        match (self.tags.get(&of), value.as_map_mut()) {
            (Some((key, name)), Some(map)) => {
                map.insert(key.clone(), GenericValue::String(name.clone()));
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeserializationError;
    use crate::mapper::ObjectMapper;
    use crate::ser::{Serializable, SerializableData};

    #[derive(Debug, PartialEq)]
    struct Dog {
        name: String,
    }

    #[derive(Debug, PartialEq)]
    struct Cat {
        lives: i64,
    }

    #[derive(Debug, PartialEq)]
    enum Animal {
        Dog(Dog),
        Cat(Cat),
        Unknown,
    }

    impl Serializable for Dog {
        fn serialize(&self, data: &mut SerializableData<'_>) {
            data.set("name", &self.name);
        }
    }

    impl Deserializable for Dog {
        fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
            Ok(Dog {
                name: data.at("name").get()?,
            })
        }
    }

    impl Serializable for Cat {
        fn serialize(&self, data: &mut SerializableData<'_>) {
            data.set("lives", &self.lives);
        }
    }

    impl Deserializable for Cat {
        fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
            Ok(Cat {
                lives: data.at("lives").get()?,
            })
        }
    }

    impl Deserializable for Animal {
        fn deserialize(_data: &DeserializableData<'_>) -> Result<Self> {
            Ok(Animal::Unknown)
        }
    }

    impl Polymorphic for Animal {
        fn polymorphic_info() -> PolymorphicInfo<Self> {
            PolymorphicInfo::new("kind")
                .with_subtype("dog", Animal::Dog)
                .with_subtype("cat", Animal::Cat)
        }
    }

    fn mapper() -> ObjectMapper {
        ObjectMapper::with_polymorph(StaticPolymorph::new().register_polymorphic::<Animal>())
    }

    #[test]
    fn test_write_type_info_stamps_registered_subtypes() {
        let mapper = mapper();
        let value = mapper.serialize(&Dog {
            name: "Rex".to_string(),
        });
        assert_eq!(value.get("kind"), Some(&GenericValue::from("dog")));

        // Unregistered types and non-map values are left alone.
        assert_eq!(mapper.serialize(&5i64), GenericValue::Int(5));
    }

    #[test]
    fn test_polymorphic_round_trip() {
        let mapper = mapper();
        let value = mapper.serialize(&Cat { lives: 9 });
        let animal: Animal = mapper.deserialize(&value).unwrap();
        assert_eq!(animal, Animal::Cat(Cat { lives: 9 }));
    }

    #[test]
    fn test_unknown_or_missing_name_keeps_requested_type() {
        let mapper = mapper();
        let mut value = GenericValue::empty_map();
        assert_eq!(mapper.deserialize::<Animal>(&value).unwrap(), Animal::Unknown);

        value.set("kind", GenericValue::from("bird"));
        assert_eq!(mapper.deserialize::<Animal>(&value).unwrap(), Animal::Unknown);
    }

    #[test]
    fn test_subtype_errors_propagate() {
        let mapper = mapper();
        let mut value = GenericValue::empty_map();
        value.set("kind", GenericValue::from("cat"));
        value.set("lives", GenericValue::from("nine"));

        let err = mapper.deserialize::<Animal>(&value).unwrap_err();
        assert!(matches!(err, DeserializationError::WrongType { .. }));
    }

    #[test]
    fn test_nested_values_get_their_own_tag() {
        let mapper = mapper();
        let value = mapper.serialize(&vec![
            Dog {
                name: "Rex".to_string(),
            },
            Dog {
                name: "Fido".to_string(),
            },
        ]);
        let array = value.as_array().unwrap();
        assert!(array.iter().all(|item| item.get("kind") == Some(&GenericValue::from("dog"))));

        let animals: Vec<Animal> = mapper.deserialize(&value).unwrap();
        assert_eq!(animals.len(), 2);
    }

    #[test]
    fn test_resolution_is_logged() {
        let (logger, log) = logging::Logger::memory(logging::LogLevel::Debug);
        let mapper = mapper().with_logger(logger);
        let value = mapper.serialize(&Cat { lives: 3 });
        let _: Animal = mapper.deserialize(&value).unwrap();

        assert!(log.contains("Wrote type information"));
        assert!(log.contains("to polymorphic type 'cat'"));
    }

    struct Mismatched;

    impl Polymorph for Mismatched {
        fn polymorph_type(&self, _: TypeId, _: &GenericValue) -> Option<&PolymorphicType> {
            static DOG: std::sync::OnceLock<PolymorphicType> = std::sync::OnceLock::new();
            Some(DOG.get_or_init(|| PolymorphicType::new::<Dog, Dog>("dog", |dog| dog)))
        }

        fn write_type_info(&self, _: &mut GenericValue, _: TypeId) -> bool {
            false
        }
    }

    #[test]
    fn test_unassignable_subtype_is_an_error() {
        let mapper = ObjectMapper::with_polymorph(Mismatched);
        let mut value = GenericValue::empty_map();
        value.set("lives", GenericValue::Int(1));
        value.set("name", GenericValue::from("Rex"));

        let err = mapper.deserialize::<Cat>(&value).unwrap_err();
        assert!(err.to_string().contains("not assignable"));
    }
}
