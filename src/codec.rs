//! Session log entry codec.
//!
//! Each event is persisted as a single-key object whose key is the variant name and
//! whose value holds the variant's fields in their declared order:
//!
//! ```json
//! {"KeyPressed": {"alt": false, "control": true, "system": false, "shift": false, "key": {"keycode": 3}}}
//! {"TimeElapsed": {"elapsed": {"nanoseconds": 1500000}}}
//! {"WindowClosed": {}}
//! ```
//!
//! Decoding resolves the key against [`EventKind::ALL`]; the variant name is the only
//! discriminator, so variants with identical field layouts (`KeyPressed`/`KeyReleased`,
//! ...) can never be confused. A wrong field count for the named variant is a hard
//! failure for that entry.

use crate::error::CodecError;
use crate::event::{
    Event, EventKind, JoystickAxisInput, JoystickButtonInput, KeyInput, MouseButtonInput,
    MousePosition,
};
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::time::Duration;

/// `WindowClosed` payload: serializes as `{}`.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoFields {}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ElapsedFields {
    #[serde(with = "nanoseconds")]
    elapsed: Duration,
}

/// `Duration` as `{ "nanoseconds": <int> }`.
pub mod nanoseconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Nanoseconds {
        nanoseconds: u64,
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanoseconds = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        Nanoseconds { nanoseconds }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let repr = Nanoseconds::deserialize(deserializer)?;
        Ok(Duration::from_nanos(repr.nanoseconds))
    }
}

fn single_entry<S, T>(serializer: S, name: &str, fields: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(name, fields)?;
    map.end()
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let name = self.name();
        match self {
            Event::Empty => Err(S::Error::custom(CodecError::EmptyEvent)),
            Event::KeyPressed(key) | Event::KeyReleased(key) => {
                single_entry(serializer, name, key)
            }
            Event::JoystickButtonPressed(joy) | Event::JoystickButtonReleased(joy) => {
                single_entry(serializer, name, joy)
            }
            Event::JoystickAxisMoved(joy) => single_entry(serializer, name, joy),
            Event::MouseMoved(pos) => single_entry(serializer, name, pos),
            Event::MouseButtonPressed(mouse) | Event::MouseButtonReleased(mouse) => {
                single_entry(serializer, name, mouse)
            }
            Event::WindowClosed => single_entry(serializer, name, &NoFields {}),
            Event::TimeElapsed(elapsed) => single_entry(
                serializer,
                name,
                &ElapsedFields {
                    elapsed: *elapsed,
                },
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_entry(&value).map_err(D::Error::custom)
    }
}

/// Encode one event as a log entry.
///
/// Payload fields keep their declared order in the returned value.
pub fn encode_entry(event: &Event) -> Result<Value, CodecError> {
    if event.is_empty() {
        return Err(CodecError::EmptyEvent);
    }
    Ok(serde_json::to_value(event)?)
}

/// Decode one log entry.
pub fn decode_entry(value: &Value) -> Result<Event, CodecError> {
    let entry = value.as_object().ok_or(CodecError::NotAnObject)?;
    let (name, fields) = match entry.iter().next() {
        Some(pair) if entry.len() == 1 => pair,
        _ => return Err(CodecError::KeyCount(entry.len())),
    };

    let kind = EventKind::from_name(name)
        .ok_or_else(|| CodecError::UnknownVariant(name.clone()))?;
    let found = match fields.as_object() {
        Some(object) => object.len(),
        None => {
            return Err(CodecError::InvalidField {
                variant: kind.name(),
                source: <serde_json::Error as serde::de::Error>::custom(
                    "expected an object of fields",
                ),
            })
        }
    };
    if found != kind.fields().len() {
        return Err(CodecError::FieldCount {
            variant: kind.name(),
            expected: kind.fields().len(),
            found,
        });
    }

    let event = match kind {
        EventKind::KeyPressed => Event::KeyPressed(decode_fields::<KeyInput>(kind, fields)?),
        EventKind::KeyReleased => Event::KeyReleased(decode_fields::<KeyInput>(kind, fields)?),
        EventKind::JoystickButtonPressed => {
            Event::JoystickButtonPressed(decode_fields::<JoystickButtonInput>(kind, fields)?)
        }
        EventKind::JoystickButtonReleased => {
            Event::JoystickButtonReleased(decode_fields::<JoystickButtonInput>(kind, fields)?)
        }
        EventKind::JoystickAxisMoved => {
            Event::JoystickAxisMoved(decode_fields::<JoystickAxisInput>(kind, fields)?)
        }
        EventKind::MouseMoved => Event::MouseMoved(decode_fields::<MousePosition>(kind, fields)?),
        EventKind::MouseButtonPressed => {
            Event::MouseButtonPressed(decode_fields::<MouseButtonInput>(kind, fields)?)
        }
        EventKind::MouseButtonReleased => {
            Event::MouseButtonReleased(decode_fields::<MouseButtonInput>(kind, fields)?)
        }
        EventKind::WindowClosed => Event::WindowClosed,
        EventKind::TimeElapsed => {
            Event::TimeElapsed(decode_fields::<ElapsedFields>(kind, fields)?.elapsed)
        }
    };
    Ok(event)
}

fn decode_fields<T: DeserializeOwned>(kind: EventKind, fields: &Value) -> Result<T, CodecError> {
    T::deserialize(fields).map_err(|source| CodecError::InvalidField {
        variant: kind.name(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyCode;
    use serde_json::json;

    fn round_trip(event: Event) {
        let value = encode_entry(&event).expect("encodable");
        assert_eq!(decode_entry(&value).expect("decodable"), event, "{value}");
    }

    #[test]
    fn every_variant_round_trips() {
        round_trip(Event::KeyPressed(KeyInput {
            alt: true,
            control: true,
            system: false,
            shift: true,
            key: KeyCode::Q,
        }));
        round_trip(Event::KeyReleased(KeyInput::plain(KeyCode::UNKNOWN)));
        round_trip(Event::JoystickButtonPressed(JoystickButtonInput { id: 0, button: 2 }));
        round_trip(Event::JoystickButtonReleased(JoystickButtonInput {
            id: 7,
            button: 31,
        }));
        round_trip(Event::JoystickAxisMoved(JoystickAxisInput {
            id: 1,
            axis: 4,
            position: -99.25,
        }));
        round_trip(Event::MouseMoved(MousePosition::new(-20, 1080)));
        round_trip(Event::MouseButtonPressed(MouseButtonInput {
            button: 0,
            mouse: MousePosition::new(3, 4),
        }));
        round_trip(Event::MouseButtonReleased(MouseButtonInput {
            button: 2,
            mouse: MousePosition::new(5, 6),
        }));
        round_trip(Event::WindowClosed);
        round_trip(Event::TimeElapsed(Duration::from_nanos(123_456_789_012)));
    }

    #[test]
    fn window_closed_is_an_empty_object() {
        let value = encode_entry(&Event::WindowClosed).unwrap();
        assert_eq!(value, json!({"WindowClosed": {}}));
    }

    #[test]
    fn time_elapsed_uses_nanoseconds() {
        let event = Event::TimeElapsed(Duration::from_nanos(1_500_000));
        let value = encode_entry(&event).unwrap();
        assert_eq!(
            value,
            json!({"TimeElapsed": {"elapsed": {"nanoseconds": 1500000}}})
        );
        assert_eq!(decode_entry(&value).unwrap(), event);
    }

    #[test]
    fn key_fields_are_written_in_declared_order() {
        let event = Event::KeyPressed(KeyInput::plain(KeyCode::D));
        let text = serde_json::to_string(&event).unwrap();
        assert_eq!(
            text,
            r#"{"KeyPressed":{"alt":false,"control":false,"system":false,"shift":false,"key":{"keycode":3}}}"#
        );
    }

    #[test]
    fn encoded_entry_keeps_declared_field_order() {
        let event = Event::KeyPressed(KeyInput::plain(KeyCode::D));
        let value = encode_entry(&event).unwrap();
        assert_eq!(
            value.to_string(),
            r#"{"KeyPressed":{"alt":false,"control":false,"system":false,"shift":false,"key":{"keycode":3}}}"#
        );

        let fields: Vec<&str> = value["KeyPressed"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(fields, EventKind::KeyPressed.fields());

        let axis = Event::JoystickAxisMoved(JoystickAxisInput {
            id: 2,
            axis: 5,
            position: 1.5,
        });
        assert_eq!(
            encode_entry(&axis).unwrap().to_string(),
            r#"{"JoystickAxisMoved":{"id":2,"axis":5,"position":1.5}}"#
        );
    }

    #[test]
    fn same_layout_variants_are_told_apart_by_name() {
        let pressed = json!({"JoystickButtonPressed": {"id": 1, "button": 2}});
        let released = json!({"JoystickButtonReleased": {"id": 1, "button": 2}});
        assert!(matches!(
            decode_entry(&pressed).unwrap(),
            Event::JoystickButtonPressed(_)
        ));
        assert!(matches!(
            decode_entry(&released).unwrap(),
            Event::JoystickButtonReleased(_)
        ));
    }

    #[test]
    fn empty_cannot_be_encoded() {
        assert!(matches!(
            encode_entry(&Event::Empty),
            Err(CodecError::EmptyEvent)
        ));
        assert!(serde_json::to_string(&Event::Empty).is_err());
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let err = decode_entry(&json!({"Empty": {}})).unwrap_err();
        assert!(matches!(err, CodecError::UnknownVariant(ref name) if name == "Empty"));
    }

    #[test]
    fn field_count_mismatch_is_a_hard_failure() {
        let missing = json!({"MouseMoved": {"x": 1}});
        assert!(matches!(
            decode_entry(&missing),
            Err(CodecError::FieldCount {
                variant: "MouseMoved",
                expected: 2,
                found: 1
            })
        ));

        let extra = json!({"WindowClosed": {"why": "because"}});
        assert!(matches!(
            decode_entry(&extra),
            Err(CodecError::FieldCount { expected: 0, found: 1, .. })
        ));
    }

    #[test]
    fn wrong_field_names_or_types_are_rejected() {
        let renamed = json!({"MouseMoved": {"x": 1, "z": 2}});
        assert!(matches!(
            decode_entry(&renamed),
            Err(CodecError::InvalidField { variant: "MouseMoved", .. })
        ));

        let mistyped = json!({"JoystickButtonPressed": {"id": "zero", "button": 1}});
        assert!(matches!(
            decode_entry(&mistyped),
            Err(CodecError::InvalidField { .. })
        ));
    }

    #[test]
    fn entry_shape_is_checked() {
        assert!(matches!(
            decode_entry(&json!([1, 2])),
            Err(CodecError::NotAnObject)
        ));
        assert!(matches!(decode_entry(&json!({})), Err(CodecError::KeyCount(0))));
        assert!(matches!(
            decode_entry(&json!({"WindowClosed": {}, "MouseMoved": {"x": 0, "y": 0}})),
            Err(CodecError::KeyCount(2))
        ));
    }
}
