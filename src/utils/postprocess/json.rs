//! Getting the answer object back out of model output.

use serde_json::{Deserializer, Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvalidJson {
    #[error("no JSON object in: {0}")]
    NoObject(String),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(Value),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// Parses the first JSON object in `text`, ignoring prose before it and anything after it closes.
///
/// Models tend to wrap the object they were asked for in commentary or repeat it, so only the first
/// complete object counts.
///
/// # Example
/// ```
/// use form_assistant::utils::postprocess::json::extract_object;
/// let answer = extract_object("合併的答案: {\"姓名\":\"王小明\"} <EOS>").expect("object after prose");
/// assert_eq!(answer["姓名"], "王小明");
///
/// assert!(extract_object("合併的答案: \"姓名\":\"王小明\"}").is_err());
/// ```
pub fn extract_object(text: &str) -> Result<Map<String, Value>, InvalidJson> {
    let start = text.find('{').ok_or_else(|| InvalidJson::NoObject(text.to_string()))?;
    let mut values = Deserializer::from_str(&text[start..]).into_iter::<Value>();
    match values.next() {
        Some(Ok(Value::Object(object))) => Ok(object),
        Some(Ok(other)) => Err(InvalidJson::NotAnObject(other)),
        Some(Err(err)) => Err(err.into()),
        None => Err(InvalidJson::NoObject(text.to_string())),
    }
}

/// Pretty-prints the answer object for display, falling back to the text as given.
pub fn display_json(text: &str) -> String {
    extract_object(text)
        .ok()
        .and_then(|object| serde_json::to_string_pretty(&object).ok())
        .unwrap_or_else(|| text.to_string())
}

#[cfg(test)]
mod test_json {
    use super::{display_json, extract_object, InvalidJson};

    #[test]
    fn test_extract_object() {
        let object = extract_object("{\"姓名\":\"王小明\"}").expect("plain json");
        assert_eq!(object["姓名"], "王小明");

        let object = extract_object("Here is the merged answer: {\"身分證號碼\":\"A123456789\"} <EOS>").expect("wrapped json");
        assert_eq!(object["身分證號碼"], "A123456789");
    }

    #[test]
    fn test_first_object_wins() {
        // outermost braces would span both objects here
        let object = extract_object("{\"姓名\":\"王\"}\n再次確認: {\"姓名\":\"李\"}").expect("first object");
        assert_eq!(object["姓名"], "王");
        assert_eq!(1, object.len());

        let object = extract_object("{\"備註\":\"含有}符號\"} 結束}").expect("brace inside a string");
        assert_eq!(object["備註"], "含有}符號");
    }

    #[test]
    fn test_extract_object_errors() {
        assert!(matches!(extract_object("沒有答案"), Err(InvalidJson::NoObject(_))));
        assert!(matches!(extract_object("} nothing {"), Err(InvalidJson::Parse(_))));
        assert!(matches!(extract_object("answer: {\"姓名\":\"王\""), Err(InvalidJson::Parse(_))));
        assert!(matches!(extract_object("{{}}"), Err(InvalidJson::Parse(_))));
    }

    #[test]
    fn test_display_json() {
        assert_eq!("{\n  \"姓名\": \"王\"\n}", display_json("answer: {\"姓名\":\"王\"}"));
        assert_eq!("not json at all", display_json("not json at all"));
        assert_eq!("", display_json(""));
    }
}
