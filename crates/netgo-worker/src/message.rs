//! Messages exchanged between the host thread and the worker.
//!
//! Host to worker messages carry a `type` tag and a `value` payload. Only the
//! [`SCORE_TAG`] tag is routed to the scoring module. Worker to host messages
//! are the raw scored payload with no envelope, so they have no type here.

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

/// Tag of the only message the bridge forwards.
pub const SCORE_TAG: &str = "score";

/// A message posted by the host thread.
///
/// Both fields are optional on the wire. A missing or non-string `type` is
/// treated like any other unrecognized tag. A `value` that is present is kept
/// whatever it holds, `null` included; only an absent field is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMessage<G> {
    /// Discriminant selecting what the worker should do.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "string_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag: Option<String>,
    /// Payload, opaque to the bridge.
    #[serde(
        default,
        deserialize_with = "present_value",
        bound(deserialize = "G: Deserialize<'de>"),
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<G>,
}

fn string_tag<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tag {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Tag::deserialize(deserializer)? {
        Tag::Text(tag) => Some(tag),
        Tag::Other(_) => None,
    })
}

fn present_value<'de, D, G>(deserializer: D) -> Result<Option<G>, D::Error>
where
    D: Deserializer<'de>,
    G: Deserialize<'de>,
{
    G::deserialize(deserializer).map(Some)
}

/// Field access on a message object posted by the host.
///
/// Lets the `{ type, value }` split run against host values that serde does
/// not own, such as JavaScript objects.
pub trait PostedData {
    /// A single field value.
    type Field;

    /// Reads field `name`. `None` means the data cannot be read as an object;
    /// an absent field is whatever the host uses for "undefined".
    fn field(&self, name: &str) -> Option<Self::Field>;

    /// Returns the field as a string, if it is one.
    fn field_string(field: &Self::Field) -> Option<String>;
}

impl<G> HostMessage<G> {
    /// Builds a `score` request for `game`.
    #[must_use]
    pub fn score(game: G) -> Self {
        Self {
            tag: Some(SCORE_TAG.to_owned()),
            value: Some(game),
        }
    }

    /// Builds a message with an arbitrary tag and no payload.
    #[must_use]
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            value: None,
        }
    }

    /// Splits a posted object into tag and payload without touching the payload.
    ///
    /// A non-string `type` becomes a missing tag. The `value` field is kept as
    /// the host reports it, so an absent value travels as the host's
    /// "undefined".
    #[must_use]
    pub fn read<D>(data: &D) -> Self
    where
        D: PostedData<Field = G>,
    {
        let tag = data.field("type").as_ref().and_then(D::field_string);
        let value = data.field("value");
        Self { tag, value }
    }

    /// Returns how the bridge routes this message.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        MessageKind::classify(self.tag.as_deref())
    }
}

/// Routing decision for a host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Forward the payload to the scoring module.
    Score,
    /// Drop the message and record a diagnostic.
    Unrecognized,
}

impl MessageKind {
    /// Classifies a message by its tag. Matching is exact.
    #[must_use]
    pub fn classify(tag: Option<&str>) -> Self {
        match tag {
            Some(SCORE_TAG) => MessageKind::Score,
            _ => MessageKind::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(MessageKind::classify(Some("score")), MessageKind::Score);
        assert_eq!(
            MessageKind::classify(Some("Score")),
            MessageKind::Unrecognized
        );
        assert_eq!(
            MessageKind::classify(Some("noop")),
            MessageKind::Unrecognized
        );
        assert_eq!(MessageKind::classify(None), MessageKind::Unrecognized);
    }

    #[test]
    fn test_score_message_wire_shape() {
        let msg = HostMessage::score(json!({ "id": 1, "state": "X" }));
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "type": "score", "value": { "id": 1, "state": "X" } })
        );
    }

    #[test]
    fn test_message_without_type_or_value_parses() {
        let msg: HostMessage<Value> = serde_json::from_value(json!({})).unwrap();
        assert!(msg.tag.is_none());
        assert!(msg.value.is_none());
        assert_eq!(msg.kind(), MessageKind::Unrecognized);

        let msg: HostMessage<Value> = serde_json::from_value(json!({ "type": "noop" })).unwrap();
        assert_eq!(msg, HostMessage::tagged("noop"));
    }

    #[test]
    fn test_null_value_is_kept() {
        let msg: HostMessage<Value> =
            serde_json::from_value(json!({ "type": "score", "value": null })).unwrap();
        assert_eq!(msg.value, Some(Value::Null));
        assert_eq!(msg.kind(), MessageKind::Score);
    }

    #[test]
    fn test_non_string_type_parses_as_missing_tag() {
        let msg: HostMessage<Value> =
            serde_json::from_value(json!({ "type": 5, "value": 1 })).unwrap();
        assert!(msg.tag.is_none());
        assert_eq!(msg.value, Some(json!(1)));
        assert_eq!(msg.kind(), MessageKind::Unrecognized);
    }

    /// A posted object the way a JavaScript host reports it.
    #[derive(Debug, Clone, PartialEq)]
    enum JsLike {
        Undefined,
        Number(f64),
        Text(String),
        Object(Vec<(&'static str, JsLike)>),
    }

    impl PostedData for JsLike {
        type Field = JsLike;

        fn field(&self, name: &str) -> Option<JsLike> {
            let JsLike::Object(fields) = self else {
                return None;
            };
            let value = fields
                .iter()
                .find(|(key, _)| *key == name)
                .map_or(JsLike::Undefined, |(_, value)| value.clone());
            Some(value)
        }

        fn field_string(field: &JsLike) -> Option<String> {
            match field {
                JsLike::Text(text) => Some(text.clone()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_read_score_object() {
        let data = JsLike::Object(vec![
            ("type", JsLike::Text("score".to_owned())),
            ("value", JsLike::Number(1.0)),
        ]);
        let msg = HostMessage::read(&data);
        assert_eq!(msg.kind(), MessageKind::Score);
        assert_eq!(msg.value, Some(JsLike::Number(1.0)));
    }

    #[test]
    fn test_read_non_string_type_is_unrecognized() {
        let data = JsLike::Object(vec![("type", JsLike::Number(3.0))]);
        let msg = HostMessage::read(&data);
        assert!(msg.tag.is_none());
        assert_eq!(msg.kind(), MessageKind::Unrecognized);
    }

    #[test]
    fn test_read_missing_value_travels_as_undefined() {
        let data = JsLike::Object(vec![("type", JsLike::Text("score".to_owned()))]);
        let msg = HostMessage::read(&data);
        assert_eq!(msg.kind(), MessageKind::Score);
        assert_eq!(msg.value, Some(JsLike::Undefined));
    }

    #[test]
    fn test_read_non_object_has_no_fields() {
        let msg = HostMessage::read(&JsLike::Number(7.0));
        assert!(msg.tag.is_none());
        assert!(msg.value.is_none());
    }
}
