// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased access to the host's collection.
//!
//! A [`SliceView`](crate::SliceView) never knows the concrete element type of
//! the collection it shows. It goes through the object-safe [`Collection`]
//! trait, which is implemented for `Vec<T>` (resizable) and `[T; N]` (fixed
//! size) for every `T: SliceElement`.
//!
//! Elements travel through the clipboard as [`MimeData`] records holding one
//! pretty-printed JSON document each.

use std::any::{Any, TypeId, type_name};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::SliceError;

/// MIME type of a JSON-encoded element record.
pub const MIME_JSON: &str = "application/json";

/// A single tagged clipboard record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MimeData {
    /// Format tag, for example [`MIME_JSON`].
    pub mime: String,
    /// Encoded bytes.
    pub data: Vec<u8>,
}

impl MimeData {
    /// Wraps JSON bytes in a [`MIME_JSON`] record.
    #[must_use]
    pub fn json(data: Vec<u8>) -> Self {
        Self {
            mime: MIME_JSON.to_owned(),
            data,
        }
    }
}

/// A sequence of clipboard records, one element per record.
pub type Payload = Vec<MimeData>;

/// Runtime identifier of an element's type, used to pick a value adapter.
///
/// Most element types have a single kind, [`ElementKind::of`]. Types whose
/// values need different widgets (for example the variants of an enum) can
/// return [`ElementKind::tagged`] kinds from [`SliceElement::element_kind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementKind {
    type_id: TypeId,
    tag: u32,
    name: &'static str,
}

impl ElementKind {
    /// The default kind of type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            tag: 0,
            name: type_name::<T>(),
        }
    }

    /// A distinct kind of type `T`, told apart from other kinds of `T` by `tag`.
    #[must_use]
    pub fn tagged<T: ?Sized + 'static>(tag: u32, name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            tag,
            name,
        }
    }

    /// Human-readable name, for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The tag distinguishing kinds of the same type.
    #[must_use]
    pub const fn tag(&self) -> u32 {
        self.tag
    }
}

/// An element type a [`SliceView`](crate::SliceView) can show and edit.
///
/// `Default` supplies the blank element for inserts, `PartialEq` backs
/// select-by-value, and serde provides the clipboard encoding.
pub trait SliceElement: Clone + Default + PartialEq + Serialize + DeserializeOwned + 'static {
    /// Kind used to resolve the value adapter for this particular value.
    fn element_kind(&self) -> ElementKind {
        ElementKind::of::<Self>()
    }
}

macro_rules! plain_elements {
    ($($ty:ty),* $(,)?) => {
        $(impl SliceElement for $ty {})*
    };
}

plain_elements!(bool, i32, i64, u32, u64, usize, f32, f64, String);

/// Object-safe, type-erased view of a host collection.
///
/// Implementations must keep elements of a single Rust type; values handed
/// back through [`Collection::assign`] and [`Collection::insert`] are
/// downcast to it.
pub trait Collection {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether elements can be inserted and removed.
    fn is_resizable(&self) -> bool;

    /// Element at `index`.
    fn element(&self, index: usize) -> Option<&dyn Any>;

    /// Mutable element at `index`.
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Any>;

    /// Adapter kind of the element at `index`.
    fn kind_at(&self, index: usize) -> Option<ElementKind>;

    /// Inserts a default element at `index`, or appends when `index >= len`.
    ///
    /// Returns the position the element landed at.
    fn insert_default(&mut self, index: usize) -> Result<usize, SliceError>;

    /// Inserts `value` at `index`, or appends when `index >= len`.
    ///
    /// Returns the position the element landed at.
    fn insert(&mut self, index: usize, value: Box<dyn Any>) -> Result<usize, SliceError>;

    /// Overwrites the element at `index` with `value`.
    fn assign(&mut self, index: usize, value: Box<dyn Any>) -> Result<(), SliceError>;

    /// Removes the element at `index`.
    fn remove(&mut self, index: usize) -> Result<(), SliceError>;

    /// Encodes the element at `index` as a clipboard record.
    fn encode(&self, index: usize) -> Result<MimeData, SliceError>;

    /// Decodes a clipboard record into a value suitable for [`Collection::insert`].
    fn decode(&self, record: &MimeData) -> Result<Box<dyn Any>, SliceError>;

    /// First index whose element equals `value`.
    fn position_of(&self, value: &dyn Any) -> Option<usize>;
}

fn out_of_range(index: usize, len: usize) -> SliceError {
    SliceError::OutOfRange { index, len }
}

fn downcast<T: SliceElement>(value: Box<dyn Any>) -> Result<T, SliceError> {
    value
        .downcast::<T>()
        .map(|v| *v)
        .map_err(|_| SliceError::TypeMismatch {
            expected: type_name::<T>(),
        })
}

fn element_of<T: SliceElement>(items: &[T], index: usize) -> Option<&dyn Any> {
    items.get(index).map(|v| v as &dyn Any)
}

fn element_mut_of<T: SliceElement>(items: &mut [T], index: usize) -> Option<&mut dyn Any> {
    items.get_mut(index).map(|v| v as &mut dyn Any)
}

fn assign_at<T: SliceElement>(
    items: &mut [T],
    index: usize,
    value: Box<dyn Any>,
) -> Result<(), SliceError> {
    let len = items.len();
    let slot = items.get_mut(index).ok_or(out_of_range(index, len))?;
    *slot = downcast::<T>(value)?;
    Ok(())
}

fn encode_at<T: SliceElement>(items: &[T], index: usize) -> Result<MimeData, SliceError> {
    let value = items
        .get(index)
        .ok_or(out_of_range(index, items.len()))?;
    serde_json::to_vec_pretty(value)
        .map(MimeData::json)
        .map_err(SliceError::Encode)
}

fn decode_as<T: SliceElement>(record: &MimeData) -> Result<Box<dyn Any>, SliceError> {
    if record.mime != MIME_JSON {
        return Err(SliceError::UnsupportedFormat(record.mime.clone()));
    }
    let value: T = serde_json::from_slice(&record.data).map_err(SliceError::Decode)?;
    Ok(Box::new(value))
}

fn position_in<T: SliceElement>(items: &[T], value: &dyn Any) -> Option<usize> {
    let value = value.downcast_ref::<T>()?;
    items.iter().position(|v| v == value)
}

impl<T: SliceElement> Collection for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_resizable(&self) -> bool {
        true
    }

    fn element(&self, index: usize) -> Option<&dyn Any> {
        element_of(self, index)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Any> {
        element_mut_of(self, index)
    }

    fn kind_at(&self, index: usize) -> Option<ElementKind> {
        self.get(index).map(SliceElement::element_kind)
    }

    fn insert_default(&mut self, index: usize) -> Result<usize, SliceError> {
        let at = index.min(self.as_slice().len());
        Self::insert(self, at, T::default());
        Ok(at)
    }

    fn insert(&mut self, index: usize, value: Box<dyn Any>) -> Result<usize, SliceError> {
        let value = downcast::<T>(value)?;
        let at = index.min(self.as_slice().len());
        Self::insert(self, at, value);
        Ok(at)
    }

    fn assign(&mut self, index: usize, value: Box<dyn Any>) -> Result<(), SliceError> {
        assign_at(self, index, value)
    }

    fn remove(&mut self, index: usize) -> Result<(), SliceError> {
        let len = self.as_slice().len();
        if index >= len {
            return Err(out_of_range(index, len));
        }
        Self::remove(self, index);
        Ok(())
    }

    fn encode(&self, index: usize) -> Result<MimeData, SliceError> {
        encode_at(self, index)
    }

    fn decode(&self, record: &MimeData) -> Result<Box<dyn Any>, SliceError> {
        decode_as::<T>(record)
    }

    fn position_of(&self, value: &dyn Any) -> Option<usize> {
        position_in(self, value)
    }
}

impl<T: SliceElement, const N: usize> Collection for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn is_resizable(&self) -> bool {
        false
    }

    fn element(&self, index: usize) -> Option<&dyn Any> {
        element_of(self, index)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Any> {
        element_mut_of(self, index)
    }

    fn kind_at(&self, index: usize) -> Option<ElementKind> {
        self.get(index).map(SliceElement::element_kind)
    }

    fn insert_default(&mut self, _index: usize) -> Result<usize, SliceError> {
        Err(SliceError::FixedSize)
    }

    fn insert(&mut self, _index: usize, _value: Box<dyn Any>) -> Result<usize, SliceError> {
        Err(SliceError::FixedSize)
    }

    fn assign(&mut self, index: usize, value: Box<dyn Any>) -> Result<(), SliceError> {
        assign_at(self, index, value)
    }

    fn remove(&mut self, _index: usize) -> Result<(), SliceError> {
        Err(SliceError::FixedSize)
    }

    fn encode(&self, index: usize) -> Result<MimeData, SliceError> {
        encode_at(self, index)
    }

    fn decode(&self, record: &MimeData) -> Result<Box<dyn Any>, SliceError> {
        decode_as::<T>(record)
    }

    fn position_of(&self, value: &dyn Any) -> Option<usize> {
        position_in(self, value)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::{Collection, ElementKind, MIME_JSON, MimeData, SliceElement};
    use crate::SliceError;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    enum Shape {
        #[default]
        Dot,
        Circle(f64),
    }

    impl SliceElement for Shape {
        fn element_kind(&self) -> ElementKind {
            match self {
                Self::Dot => ElementKind::tagged::<Self>(0, "Shape::Dot"),
                Self::Circle(_) => ElementKind::tagged::<Self>(1, "Shape::Circle"),
            }
        }
    }

    #[test]
    fn vec_insert_default_clamps_to_append() {
        let mut items = vec![1_i32, 2, 3];
        assert_eq!(Collection::insert_default(&mut items, 1).unwrap(), 1);
        assert_eq!(items, vec![1, 0, 2, 3]);
        assert_eq!(Collection::insert_default(&mut items, 99).unwrap(), 4);
        assert_eq!(items, vec![1, 0, 2, 3, 0]);
    }

    #[test]
    fn vec_remove_checks_range() {
        let mut items = vec![String::from("a"), String::from("b")];
        Collection::remove(&mut items, 0).unwrap();
        assert_eq!(items, vec![String::from("b")]);
        assert!(matches!(
            Collection::remove(&mut items, 5),
            Err(SliceError::OutOfRange { index: 5, len: 1 })
        ));
    }

    #[test]
    fn arrays_refuse_structural_changes() {
        let mut items = [1_u32, 2, 3];
        assert!(!items.is_resizable());
        assert!(matches!(
            Collection::insert_default(&mut items, 0),
            Err(SliceError::FixedSize)
        ));
        assert!(matches!(
            Collection::remove(&mut items, 0),
            Err(SliceError::FixedSize)
        ));
        // In-place assignment is still allowed.
        items.assign(1, Box::new(7_u32)).unwrap();
        assert_eq!(items, [1, 7, 3]);
    }

    #[test]
    fn encode_decode_through_json_records() {
        let items = vec![Shape::Circle(2.5), Shape::Dot];
        let record = items.encode(0).unwrap();
        assert_eq!(record.mime, MIME_JSON);
        let value = items.decode(&record).unwrap();
        assert_eq!(value.downcast_ref::<Shape>(), Some(&Shape::Circle(2.5)));
    }

    #[test]
    fn decode_rejects_foreign_and_malformed_records() {
        let items = vec![1_i64];
        let foreign = MimeData {
            mime: String::from("text/plain"),
            data: b"1".to_vec(),
        };
        assert!(matches!(
            items.decode(&foreign),
            Err(SliceError::UnsupportedFormat(_))
        ));
        let garbage = MimeData::json(b"{not json".to_vec());
        assert!(matches!(items.decode(&garbage), Err(SliceError::Decode(_))));
    }

    #[test]
    fn wrong_value_type_is_a_mismatch() {
        let mut items = vec![1_i32];
        assert!(matches!(
            items.assign(0, Box::new("nope")),
            Err(SliceError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn tagged_kinds_tell_variants_apart() {
        let items = vec![Shape::Dot, Shape::Circle(1.0), Shape::Dot];
        assert_eq!(items.kind_at(0), items.kind_at(2));
        assert_ne!(items.kind_at(0), items.kind_at(1));
        assert_eq!(items.kind_at(1).map(|k| k.name()), Some("Shape::Circle"));
        assert_eq!(items.kind_at(3), None);
        assert_ne!(ElementKind::of::<i32>(), ElementKind::of::<i64>());
    }

    #[test]
    fn position_of_uses_equality() {
        let items = vec![String::from("x"), String::from("y")];
        assert_eq!(items.position_of(&String::from("y")), Some(1));
        assert_eq!(items.position_of(&String::from("z")), None);
        assert_eq!(items.position_of(&3_i32), None);
    }
}
