use serde_core::ser::{SerializeMap, SerializeSeq};
use serde_core::{Serialize, Serializer};

use super::object_serializer::ObjectSerializer;
use super::state::SerializeState;

use crate::format::format_iso;
use crate::value::Value;

/// Writes any [`Value`], dispatching objects to [`ObjectSerializer`].
pub(super) struct ValueSerializer<'a> {
    pub value: &'a Value,
    pub state: &'a SerializeState<'a>,
}

impl Serialize for ValueSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::DateTime(value) => serializer.serialize_str(&format_iso(value)),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for (index, item) in items.iter().enumerate() {
                    self.state.path.borrow_mut().push_index(index);
                    seq.serialize_element(&ValueSerializer {
                        value: item,
                        state: self.state,
                    })?;
                    self.state.path.borrow_mut().pop();
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    self.state.path.borrow_mut().push_key(key);
                    map.serialize_entry(key, &ValueSerializer {
                        value,
                        state: self.state,
                    })?;
                    self.state.path.borrow_mut().pop();
                }
                map.end()
            }
            Value::Object(object) => ObjectSerializer {
                object,
                state: self.state,
            }
            .serialize(serializer),
        }
    }
}
