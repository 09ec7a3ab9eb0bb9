use indexmap::IndexMap;
use indexmap::map::Entry;
use logbridge_core::IncludedData;
use logbridge_core::model::{ConvertedValue, PropertyValue, Scalar, StructureValue};
use tracing::trace;

use crate::semconv::TYPE_TAG;

pub fn convert_value(value: &PropertyValue, included: IncludedData) -> ConvertedValue {
    match value {
        PropertyValue::Scalar(scalar) => convert_scalar(scalar),
        PropertyValue::Structure(structure) => convert_structure(structure, included),
        PropertyValue::Sequence(elements) => convert_sequence(elements, included),
        PropertyValue::KeyedMap(entries) => convert_keyed_map(entries, included),
        // Shapes added to the event model later pass through untouched
        // instead of failing the whole record.
        other => {
            trace!("passing through unrecognized property value shape");
            ConvertedValue::Opaque(other.clone())
        }
    }
}

pub fn convert_scalar(scalar: &Scalar) -> ConvertedValue {
    ConvertedValue::Primitive(scalar.clone())
}

/// Converts a structure into a map. The `$type` tag, when kept, comes first;
/// on duplicate names the first entry wins.
pub fn convert_structure(structure: &StructureValue, included: IncludedData) -> ConvertedValue {
    let mut map = IndexMap::with_capacity(structure.properties.len() + 1);

    if included.structure_value_type_tags() {
        if let Some(tag) = structure.type_tag.as_deref().filter(|t| !t.is_empty()) {
            map.insert(TYPE_TAG.to_string(), ConvertedValue::from(tag));
        }
    }

    for (name, value) in &structure.properties {
        insert_if_absent(&mut map, name.clone(), || convert_value(value, included));
    }

    ConvertedValue::Map(map)
}

pub fn convert_sequence(elements: &[PropertyValue], included: IncludedData) -> ConvertedValue {
    ConvertedValue::List(
        elements
            .iter()
            .map(|element| convert_value(element, included))
            .collect(),
    )
}

/// Converts a keyed map into a map keyed by each key's literal text; on
/// duplicate key text the first entry wins.
pub fn convert_keyed_map(
    entries: &[(Scalar, PropertyValue)],
    included: IncludedData,
) -> ConvertedValue {
    let mut map = IndexMap::with_capacity(entries.len());
    for (key, value) in entries {
        insert_if_absent(&mut map, key.to_string(), || convert_value(value, included));
    }
    ConvertedValue::Map(map)
}

fn insert_if_absent(
    map: &mut IndexMap<String, ConvertedValue>,
    key: String,
    value: impl FnOnce() -> ConvertedValue,
) {
    if let Entry::Vacant(slot) = map.entry(key) {
        slot.insert(value());
    }
}
